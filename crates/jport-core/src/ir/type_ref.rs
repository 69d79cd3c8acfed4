//! Type references
//!
//! A [`TypeRef`] is a navigable tree: `Map<String, List<int[]>>` is a
//! reference to `Map` with two arguments, the second of which has its own
//! argument `int` carrying one array dimension.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A reference to a named type, possibly generic and possibly an array.
///
/// Fields are private so a value cannot change after construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeRef {
    name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    generic_args: Vec<TypeRef>,
    #[serde(default, skip_serializing_if = "is_zero")]
    array_depth: u32,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    is_wildcard: bool,
}

fn is_zero(n: &u32) -> bool {
    *n == 0
}

/// Name used for an unbounded wildcard (`?`).
pub const WILDCARD: &str = "?";

impl TypeRef {
    pub fn new(name: impl Into<String>, generic_args: Vec<TypeRef>, array_depth: u32) -> Self {
        Self {
            name: name.into(),
            generic_args,
            array_depth,
            is_wildcard: false,
        }
    }

    /// A plain, non-generic, non-array reference.
    pub fn simple(name: impl Into<String>) -> Self {
        Self::new(name, Vec::new(), 0)
    }

    /// An unbounded wildcard, `?`.
    pub fn wildcard() -> Self {
        Self {
            name: WILDCARD.to_string(),
            generic_args: Vec::new(),
            array_depth: 0,
            is_wildcard: true,
        }
    }

    /// The same reference used as a wildcard bound (`? extends T`, `? super T`).
    pub fn into_wildcard(self) -> Self {
        Self {
            is_wildcard: true,
            ..self
        }
    }

    /// The same reference with `extra` more array dimensions.
    pub fn with_extra_dims(self, extra: u32) -> Self {
        Self {
            array_depth: self.array_depth + extra,
            ..self
        }
    }

    /// The element type of an array reference: one dimension removed.
    pub fn element(&self) -> Option<TypeRef> {
        (self.array_depth > 0).then(|| Self {
            array_depth: self.array_depth - 1,
            ..self.clone()
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The last segment of a qualified name (`java.util.List` → `List`).
    pub fn simple_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }

    pub fn generic_args(&self) -> &[TypeRef] {
        &self.generic_args
    }

    pub fn array_depth(&self) -> u32 {
        self.array_depth
    }

    pub fn is_wildcard(&self) -> bool {
        self.is_wildcard
    }

    /// True for an unbounded `?`.
    pub fn is_unbounded_wildcard(&self) -> bool {
        self.is_wildcard && self.name == WILDCARD
    }

    /// True when this reference is applied to generic arguments. Nested
    /// arguments can only be generic when this one is.
    pub fn is_generic(&self) -> bool {
        !self.generic_args.is_empty()
    }

    /// Number of generic applications in this tree (`Map<K, List<V>>` → 2).
    pub fn generic_usage(&self) -> usize {
        let own = usize::from(self.is_generic());
        own + self
            .generic_args
            .iter()
            .map(TypeRef::generic_usage)
            .sum::<usize>()
    }

    /// Visit every name in this tree, outermost first.
    pub fn for_each_name<'a>(&'a self, f: &mut impl FnMut(&'a str)) {
        f(&self.name);
        for arg in &self.generic_args {
            arg.for_each_name(f);
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_wildcard && self.name != WILDCARD {
            write!(f, "? extends ")?;
        }
        write!(f, "{}", self.name)?;
        if !self.generic_args.is_empty() {
            write!(f, "<")?;
            for (i, arg) in self.generic_args.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{arg}")?;
            }
            write!(f, ">")?;
        }
        for _ in 0..self.array_depth {
            write!(f, "[]")?;
        }
        Ok(())
    }
}
