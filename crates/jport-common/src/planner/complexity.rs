//! Complexity scoring policy

use jport_core::{Complexity, MappedClass, MappedParam, TypeRef};
use serde::{Deserialize, Serialize};

/// Weights and thresholds a plan is scored with.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComplexityPolicy {
    pub weights: Weights,
    pub thresholds: Thresholds,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Weights {
    /// Per method.
    pub method: u32,
    /// Per field.
    pub field: u32,
    /// Per level of inheritance depth.
    pub inheritance: u32,
    /// Per type parameter or generic application.
    pub generic: u32,
    /// Per source constructor.
    pub constructor: u32,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            method: 1,
            field: 1,
            inheritance: 2,
            generic: 1,
            constructor: 2,
        }
    }
}

/// Scores up to `low_max` are low, up to `medium_max` medium, above that high.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub low_max: u32,
    pub medium_max: u32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            low_max: 3,
            medium_max: 7,
        }
    }
}

impl Thresholds {
    pub fn bucket(&self, score: u32) -> Complexity {
        if score <= self.low_max {
            Complexity::Low
        } else if score <= self.medium_max {
            Complexity::Medium
        } else {
            Complexity::High
        }
    }
}

fn generic_usage<'a>(types: impl IntoIterator<Item = &'a TypeRef>) -> u32 {
    types.into_iter().map(|t| t.generic_usage() as u32).sum()
}

fn param_types(params: &[MappedParam]) -> impl Iterator<Item = &TypeRef> {
    params.iter().map(|p| &p.ty)
}

impl ComplexityPolicy {
    /// Class shell: inheritance depth and type parameters.
    pub fn class_score(&self, class: &MappedClass, depth: u32) -> u32 {
        let w = &self.weights;
        w.inheritance * depth + w.generic * class.type_params.len() as u32
    }

    pub fn fields_score(&self, class: &MappedClass) -> u32 {
        let w = &self.weights;
        w.field * class.fields.len() as u32
            + w.generic * generic_usage(class.fields.iter().map(|f| &f.ty))
    }

    pub fn constructor_score(&self, class: &MappedClass) -> u32 {
        let w = &self.weights;
        let generics: u32 = class
            .constructors
            .iter()
            .map(|c| generic_usage(param_types(&c.params)))
            .sum();
        w.constructor * class.constructors.len() as u32 + w.generic * generics
    }

    pub fn methods_score(&self, class: &MappedClass) -> u32 {
        let w = &self.weights;
        let generics: u32 = class
            .methods
            .iter()
            .map(|m| {
                m.type_params.len() as u32
                    + generic_usage(param_types(&m.params).chain([&m.return_type]))
            })
            .sum();
        w.method * class.methods.len() as u32 + w.generic * generics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, Complexity::Low)]
    #[case(3, Complexity::Low)]
    #[case(4, Complexity::Medium)]
    #[case(7, Complexity::Medium)]
    #[case(8, Complexity::High)]
    fn test_default_buckets(#[case] score: u32, #[case] expected: Complexity) {
        assert_eq!(Thresholds::default().bucket(score), expected);
    }

    #[test]
    fn test_custom_thresholds() {
        let thresholds = Thresholds {
            low_max: 0,
            medium_max: 1,
        };
        assert_eq!(thresholds.bucket(1), Complexity::Medium);
        assert_eq!(thresholds.bucket(2), Complexity::High);
    }
}
