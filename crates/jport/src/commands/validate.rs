//! Validate command: check an existing Python module against the Java
//! source it was migrated from.

use super::{CommandStatus, load_config, read_source, report_syntax_error};
use crate::output::{OutputFormat, print_issue, print_json, print_status};
use jport_java_binding::parse_java;
use jport_python_binding::{Mapper, validate};
use std::path::Path;
use tracing::info;

pub fn run_validate(
    java: &Path,
    python: &Path,
    config: Option<&Path>,
    json: bool,
) -> anyhow::Result<CommandStatus> {
    let config = load_config(config)?;
    let format = OutputFormat::from_json_flag(json);
    let java_source = read_source(java)?;
    let python_source = read_source(python)?;

    let structural = match parse_java(&java_source) {
        Ok(ir) => ir,
        Err(err) => {
            report_syntax_error(java, &java_source, &err);
            return Ok(CommandStatus::Failure);
        }
    };
    let mapping = Mapper::new(config.mapper_policy()).map(&structural);
    let report = validate(&python_source, &mapping.ir, &config.validator);
    info!(
        python = %python.display(),
        passed = report.passed,
        issues = report.issues.len(),
        "validated"
    );

    match format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Human => {
            print_status(report.passed, &python.display().to_string());
            for issue in &report.issues {
                print_issue(issue);
            }
        }
    }
    Ok(CommandStatus::from_passed(report.passed))
}
