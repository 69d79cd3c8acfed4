//! Validator: generated Python checked against the mapped IR
//!
//! Never fails. A text that does not read back, or whose declaration counts
//! differ from the mapped IR, yields `error` issues. Naming drift, missing
//! annotations and hollow classes yield `warning` issues.

use crate::reader::{ClassOutline, read_outline};
use jport_core::naming::{IdentKind, conforms, is_pascal_case};
use jport_core::{Issue, MappedClass, MappedIr, ValidationReport};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorOptions {
    /// Report naming-convention drift.
    pub naming: bool,
    /// Report missing type annotations and classes without an initializer
    /// or members.
    pub annotations: bool,
}

impl Default for ValidatorOptions {
    fn default() -> Self {
        Self {
            naming: true,
            annotations: true,
        }
    }
}

pub fn validate(text: &str, ir: &MappedIr, options: &ValidatorOptions) -> ValidationReport {
    let outline = match read_outline(text) {
        Ok(outline) => outline,
        Err(err) => {
            debug!(line = err.line, "generated text does not read back");
            return ValidationReport::from_issues(vec![Issue::error(
                format!("Python syntax error: {}", err.message),
                Some(format!("line {}", err.line)),
            )]);
        }
    };

    let mut issues = Vec::new();

    if outline.classes.len() != ir.classes.len() {
        issues.push(Issue::error(
            format!(
                "expected {} classes, found {}",
                ir.classes.len(),
                outline.classes.len()
            ),
            None,
        ));
    }

    for class in &ir.classes {
        match outline.class(&class.name) {
            Some(found) => compare_class(class, found, &mut issues),
            None => issues.push(Issue::error(
                format!("class `{}` is missing", class.name),
                Some(class.name.clone()),
            )),
        }
    }
    for found in &outline.classes {
        if !ir.classes.iter().any(|c| c.name == found.name) {
            issues.push(Issue::error(
                format!("unexpected class `{}`", found.name),
                Some(format!("line {}", found.line)),
            ));
        }
    }

    if options.naming {
        for found in &outline.classes {
            check_naming(found, &mut issues);
        }
    }
    if options.annotations {
        for found in &outline.classes {
            check_structure(found, &mut issues);
            check_annotations(found, &mut issues);
        }
    }

    let report = ValidationReport::from_issues(issues);
    debug!(
        passed = report.passed,
        issues = report.issues.len(),
        "validated module"
    );
    report
}

fn compare_class(expected: &MappedClass, found: &ClassOutline, issues: &mut Vec<Issue>) {
    let location = || Some(format!("{} (line {})", expected.name, found.line));
    let mut count = |what: &str, expected_count: usize, found_count: usize| {
        if expected_count != found_count {
            issues.push(Issue::error(
                format!(
                    "`{}`: expected {expected_count} {what}, found {found_count}",
                    expected.name
                ),
                location(),
            ));
        }
    };

    count("fields", expected.fields.len(), found.fields.len());
    count("methods", expected.methods.len(), found.methods.len());
    // Any number of source constructors becomes exactly one `__init__`.
    count(
        "constructors",
        expected.constructors.len().min(1),
        found.inits.len(),
    );

    for field in &expected.fields {
        if !found.fields.iter().any(|f| f.name == field.name) {
            issues.push(Issue::error(
                format!("field `{}` is missing", field.name),
                Some(format!("{}.{}", expected.name, field.name)),
            ));
        }
    }
    for method in &expected.methods {
        if !found.methods.iter().any(|m| m.name == method.name) {
            issues.push(Issue::error(
                format!("method `{}` is missing", method.name),
                Some(format!("{}.{}", expected.name, method.name)),
            ));
        }
    }
}

fn field_kind(name: &str) -> IdentKind {
    let has_letters = name.chars().any(|c| c.is_ascii_alphabetic());
    if has_letters && !name.chars().any(|c| c.is_ascii_lowercase()) {
        IdentKind::Constant
    } else if name.starts_with('_') {
        IdentKind::PrivateField
    } else {
        IdentKind::Field
    }
}

fn is_dunder(name: &str) -> bool {
    name.len() > 4 && name.starts_with("__") && name.ends_with("__")
}

fn check_structure(class: &ClassOutline, issues: &mut Vec<Issue>) {
    let location = || Some(format!("{} (line {})", class.name, class.line));
    if class.fields.is_empty() && class.methods.is_empty() && class.inits.is_empty() {
        issues.push(Issue::warning(
            format!("class `{}` has no methods or fields", class.name),
            location(),
        ));
    } else if !class.fields.is_empty() && class.inits.is_empty() {
        issues.push(Issue::warning(
            format!("class `{}` has fields but no constructor", class.name),
            location(),
        ));
    }
}

fn check_annotations(class: &ClassOutline, issues: &mut Vec<Issue>) {
    for method in class.inits.iter().chain(&class.methods) {
        let location = Some(format!("{}.{} (line {})", class.name, method.name, method.line));
        for param in &method.unannotated {
            issues.push(Issue::warning(
                format!("parameter `{param}` of `{}` has no type annotation", method.name),
                location.clone(),
            ));
        }
        if !method.returns_annotated && method.name != "__init__" {
            issues.push(Issue::warning(
                format!("`{}` has no return type annotation", method.name),
                location,
            ));
        }
    }
}

fn check_naming(class: &ClassOutline, issues: &mut Vec<Issue>) {
    let at = |member: &str, line: usize| Some(format!("{}.{member} (line {line})", class.name));

    if !is_pascal_case(&class.name) {
        issues.push(Issue::warning(
            format!("class name `{}` is not PascalCase", class.name),
            Some(format!("line {}", class.line)),
        ));
    }

    for field in &class.fields {
        if is_dunder(&field.name) {
            continue;
        }
        let kind = field_kind(&field.name);
        if !conforms(&field.name, kind) {
            let style = match kind {
                IdentKind::Constant => "UPPER_SNAKE_CASE",
                _ => "snake_case",
            };
            issues.push(Issue::warning(
                format!("field `{}` is not {style}", field.name),
                at(&field.name, field.line),
            ));
        }
    }

    for method in &class.methods {
        if !is_dunder(&method.name) {
            let kind = IdentKind::for_method(method.name.starts_with('_'));
            if !conforms(&method.name, kind) {
                issues.push(Issue::warning(
                    format!("method `{}` is not snake_case", method.name),
                    at(&method.name, method.line),
                ));
            }
        }
        for param in &method.params {
            if matches!(param.as_str(), "self" | "cls") {
                continue;
            }
            if !conforms(param, IdentKind::Param) {
                issues.push(Issue::warning(
                    format!("parameter `{param}` of `{}` is not snake_case", method.name),
                    at(&method.name, method.line),
                ));
            }
        }
    }
}
