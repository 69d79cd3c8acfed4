//! Declaration modifiers
//!
//! A closed set of tags. Declarations hold a `BTreeSet<Modifier>`, so a
//! modifier is either present or absent and iteration order is stable.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modifier {
    Public,
    Protected,
    Private,
    Static,
    Final,
    Abstract,
    Synchronized,
    Native,
    Transient,
    Volatile,
    Strictfp,
    Default,
}

impl Modifier {
    pub const ALL: [Modifier; 12] = [
        Modifier::Public,
        Modifier::Protected,
        Modifier::Private,
        Modifier::Static,
        Modifier::Final,
        Modifier::Abstract,
        Modifier::Synchronized,
        Modifier::Native,
        Modifier::Transient,
        Modifier::Volatile,
        Modifier::Strictfp,
        Modifier::Default,
    ];

    pub fn keyword(self) -> &'static str {
        match self {
            Modifier::Public => "public",
            Modifier::Protected => "protected",
            Modifier::Private => "private",
            Modifier::Static => "static",
            Modifier::Final => "final",
            Modifier::Abstract => "abstract",
            Modifier::Synchronized => "synchronized",
            Modifier::Native => "native",
            Modifier::Transient => "transient",
            Modifier::Volatile => "volatile",
            Modifier::Strictfp => "strictfp",
            Modifier::Default => "default",
        }
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl FromStr for Modifier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Modifier::ALL
            .into_iter()
            .find(|m| m.keyword() == s)
            .ok_or_else(|| format!("unknown modifier `{s}`"))
    }
}

/// Set helpers used by the mapper and planner.
pub trait ModifierSet {
    /// `static` and `final` together: a class-level constant.
    fn is_constant(&self) -> bool;
    fn is_static(&self) -> bool;
    fn is_private(&self) -> bool;
    fn is_abstract(&self) -> bool;
}

impl ModifierSet for BTreeSet<Modifier> {
    fn is_constant(&self) -> bool {
        self.contains(&Modifier::Static) && self.contains(&Modifier::Final)
    }

    fn is_static(&self) -> bool {
        self.contains(&Modifier::Static)
    }

    fn is_private(&self) -> bool {
        self.contains(&Modifier::Private)
    }

    fn is_abstract(&self) -> bool {
        self.contains(&Modifier::Abstract)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_parse_roundtrip() {
        for m in Modifier::ALL {
            assert_eq!(m.keyword().parse::<Modifier>(), Ok(m));
        }
        assert!("sealed".parse::<Modifier>().is_err());
    }

    #[test]
    fn test_constant_requires_static_and_final() {
        let mods: BTreeSet<_> = [Modifier::Private, Modifier::Static, Modifier::Final].into();
        assert!(mods.is_constant());
        assert!(mods.is_private());

        let only_final: BTreeSet<_> = [Modifier::Final].into();
        assert!(!only_final.is_constant());
    }

    #[test]
    fn test_serializes_lowercase() {
        let json = serde_json::to_string(&Modifier::Synchronized).unwrap();
        assert_eq!(json, "\"synchronized\"");
    }
}
