//! Validation report

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub severity: Severity,
    pub message: String,
    pub location: Option<String>,
}

impl Issue {
    pub fn error(message: impl Into<String>, location: Option<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
            location,
        }
    }

    pub fn warning(message: impl Into<String>, location: Option<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
            location,
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        match &self.location {
            Some(loc) => write!(f, "{tag}: {} ({loc})", self.message),
            None => write!(f, "{tag}: {}", self.message),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub passed: bool,
    pub issues: Vec<Issue>,
}

impl ValidationReport {
    /// Build a report; `passed` is derived from the issues.
    pub fn from_issues(issues: Vec<Issue>) -> Self {
        let passed = !issues.iter().any(|i| i.severity == Severity::Error);
        Self { passed, issues }
    }

    pub fn errors(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(|i| i.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Issue> {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Warning)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_passed_ignores_warnings() {
        let report = ValidationReport::from_issues(vec![Issue::warning("naming", None)]);
        assert!(report.passed);
        assert_eq!(report.warnings().count(), 1);

        let report = ValidationReport::from_issues(vec![
            Issue::warning("naming", None),
            Issue::error("count mismatch", Some("Calculator".into())),
        ]);
        assert!(!report.passed);
        assert_eq!(report.errors().count(), 1);
    }

    #[test]
    fn test_issue_display() {
        let issue = Issue::error("missing class", Some("Shape".into()));
        assert_eq!(issue.to_string(), "error: missing class (Shape)");
    }
}
