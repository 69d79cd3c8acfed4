//! Migration plan records

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Part of a class a step migrates. Steps of one class always appear in
/// this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Component {
    Class,
    Fields,
    Constructor,
    Methods,
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Component::Class => "class",
            Component::Fields => "fields",
            Component::Constructor => "constructor",
            Component::Methods => "methods",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    Low,
    Medium,
    High,
}

impl fmt::Display for Complexity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Complexity::Low => "low",
            Complexity::Medium => "medium",
            Complexity::High => "high",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanStep {
    /// Position in the plan, starting at 1.
    pub id: u32,
    pub target_class: String,
    pub component: Component,
    pub complexity: Complexity,
    pub depends_on: BTreeSet<u32>,
    pub warnings: Vec<String>,
}

impl fmt::Display for PlanStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:>3}. {} {} [{}]",
            self.id, self.target_class, self.component, self.complexity
        )?;
        if !self.depends_on.is_empty() {
            let deps: Vec<String> = self.depends_on.iter().map(u32::to_string).collect();
            write!(f, " after {}", deps.join(", "))?;
        }
        Ok(())
    }
}

/// Totals and a coarse difficulty estimate over a whole plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanSummary {
    pub total_steps: usize,
    pub classes: usize,
    pub fields: usize,
    pub constructors: usize,
    pub methods: usize,
    pub has_inheritance: bool,
    pub has_interfaces: bool,
    pub has_generics: bool,
    pub warning_count: usize,
    pub difficulty: Complexity,
    pub recommendations: Vec<String>,
}
