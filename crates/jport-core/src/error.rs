//! Error taxonomy shared by the stages
//!
//! [`SyntaxError`] and [`CyclicDependencyError`] abort a unit's pipeline.
//! [`MapperWarning`] is collected and returned next to successful output.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The input is not a Java declaration unit the parser accepts.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("syntax error at {line}:{column}: {message}")]
pub struct SyntaxError {
    /// 1-based.
    pub line: usize,
    /// 1-based, in characters.
    pub column: usize,
    /// Byte offset into the source.
    pub offset: usize,
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub expected: Vec<String>,
    pub found: Option<String>,
}

impl SyntaxError {
    /// Build an error at `offset`, computing line and column from `source`.
    pub fn at(source: &str, offset: usize, message: impl Into<String>) -> Self {
        let (line, column) = line_column(source, offset);
        Self {
            line,
            column,
            offset,
            message: message.into(),
            expected: Vec::new(),
            found: None,
        }
    }
}

/// 1-based line and column of a byte offset.
pub fn line_column(source: &str, offset: usize) -> (usize, usize) {
    let offset = offset.min(source.len());
    let before = source.get(..offset).unwrap_or(source);
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
    let column = before[line_start..].chars().count() + 1;
    (line, column)
}

/// Inheritance edges among the unit's classes form a cycle.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("cyclic inheritance: {}", cycle.join(" -> "))]
pub struct CyclicDependencyError {
    /// Classes along the cycle; the first name is repeated at the end.
    pub cycle: Vec<String>,
}

/// Non-fatal finding of the mapper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapperWarning {
    /// `Class`, `Class.member` or `import`.
    pub location: String,
    pub message: String,
}

impl std::fmt::Display for MapperWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.location, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_column_counts_from_one() {
        let src = "class A {\n  int x;\n}";
        assert_eq!(line_column(src, 0), (1, 1));
        assert_eq!(line_column(src, 12), (2, 3));
        assert_eq!(line_column(src, src.len()), (3, 2));
    }

    #[test]
    fn test_cycle_display() {
        let err = CyclicDependencyError {
            cycle: vec!["A".into(), "B".into(), "A".into()],
        };
        assert_eq!(err.to_string(), "cyclic inheritance: A -> B -> A");
    }
}
