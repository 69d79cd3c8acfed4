//! Identifier renaming
//!
//! [`rename`] is a pure function of `(identifier, kind)`: no caches, no
//! counters. Applying it to its own output returns that output unchanged.

use serde::{Deserialize, Serialize};

/// What an identifier names, which decides its Python spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IdentKind {
    Method,
    Field,
    Param,
    /// `static final` field: upper snake case.
    Constant,
    /// `private` method: lower snake case with a leading underscore.
    PrivateMethod,
    /// `private` non-constant field.
    PrivateField,
}

impl IdentKind {
    /// Kind of a field given its modifiers. A constant stays public-looking
    /// even when private (`private static final int count` becomes `COUNT`).
    pub fn for_field(is_constant: bool, is_private: bool) -> Self {
        match (is_constant, is_private) {
            (true, _) => IdentKind::Constant,
            (false, true) => IdentKind::PrivateField,
            (false, false) => IdentKind::Field,
        }
    }

    pub fn for_method(is_private: bool) -> Self {
        if is_private {
            IdentKind::PrivateMethod
        } else {
            IdentKind::Method
        }
    }
}

/// Reserved words of Python 3.10.
pub const PYTHON_KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global", "if",
    "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return", "try",
    "while", "with", "yield",
];

pub fn is_python_keyword(name: &str) -> bool {
    PYTHON_KEYWORDS.contains(&name)
}

/// Receiver names the generator puts first in every parameter list.
pub const RECEIVER_NAMES: &[&str] = &["self", "cls"];

/// Rename a Java identifier to its Python spelling for the given kind.
pub fn rename(name: &str, kind: IdentKind) -> String {
    let core = name.trim_start_matches(['_', '$']);
    if core.is_empty() {
        return name.to_string();
    }

    let words = split_words(core);
    let cased = match kind {
        IdentKind::Constant => words.join("_").to_uppercase(),
        _ => words.join("_").to_lowercase(),
    };

    let renamed = match kind {
        IdentKind::PrivateMethod | IdentKind::PrivateField => format!("_{cased}"),
        _ => cased,
    };

    let reserved = match kind {
        IdentKind::Param => {
            is_python_keyword(&renamed) || RECEIVER_NAMES.contains(&renamed.as_str())
        }
        _ => is_python_keyword(&renamed),
    };
    if reserved {
        format!("{renamed}_")
    } else {
        renamed
    }
}

/// True when `name` is already in the form [`rename`] produces for `kind`.
pub fn conforms(name: &str, kind: IdentKind) -> bool {
    rename(name, kind) == name
}

/// True for `PascalCase` names: leading uppercase letter, no underscores.
pub fn is_pascal_case(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_uppercase() => {
            chars.all(|c| c.is_ascii_alphanumeric())
        }
        _ => false,
    }
}

/// Split an identifier into words.
///
/// `_` and `$` separate words. An uppercase letter starts a new word after a
/// lowercase letter or digit, and ends an acronym when a lowercase letter
/// follows it (`parseHTTPResponse` → `parse`, `HTTP`, `Response`).
fn split_words(name: &str) -> Vec<String> {
    let chars: Vec<char> = name.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if c == '_' || c == '$' {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }

        if c.is_uppercase() && !current.is_empty() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_is_lower)
            {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push(c);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}
