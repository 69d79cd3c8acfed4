//! Migrate command
//!
//! Runs the whole pipeline over every input and writes one `<Stem>.py` per
//! Java file. A unit that fails to parse or plan writes nothing, and so does
//! a later input whose module path an earlier input already took.

use super::{CommandStatus, load_config, read_source, report_syntax_error};
use crate::error::CliError;
use crate::inputs::{collect_inputs, python_path};
use crate::output::{OutputFormat, print_issue, print_json, print_plan, print_status, print_warning};
use jport_common::{MigrationOutcome, Pipeline, PipelineError, SourceUnit};
use jport_core::{Issue, MapperWarning, PlanStep, PlanSummary};
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

#[derive(Debug, Clone, Default)]
pub struct MigrateArgs {
    pub inputs: Vec<String>,
    pub output: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub json: bool,
    /// Include the plan in the report.
    pub plan: bool,
}

/// JSON output for one input
#[derive(Serialize)]
struct UnitResult {
    input: String,
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    output: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    mapper_warnings: Vec<MapperWarning>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    generator_warnings: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    issues: Vec<Issue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    plan: Option<Vec<PlanStep>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<PlanSummary>,
}

impl UnitResult {
    fn failed(input: &Path, error: String) -> Self {
        Self {
            input: input.display().to_string(),
            success: false,
            output: None,
            error: Some(error),
            mapper_warnings: Vec::new(),
            generator_warnings: Vec::new(),
            issues: Vec::new(),
            plan: None,
            summary: None,
        }
    }

    fn migrated(input: &Path, output: &Path, outcome: MigrationOutcome, with_plan: bool) -> Self {
        Self {
            input: input.display().to_string(),
            success: outcome.passed(),
            output: Some(output.display().to_string()),
            error: None,
            mapper_warnings: outcome.mapper_warnings,
            generator_warnings: outcome.code.warnings,
            issues: outcome.report.issues,
            plan: with_plan.then_some(outcome.plan),
            summary: with_plan.then_some(outcome.summary),
        }
    }

    fn print(&self) {
        match (&self.output, &self.error) {
            (Some(output), _) => print_status(self.success, &format!("{} -> {output}", self.input)),
            (None, Some(error)) => print_status(false, &format!("{}: {error}", self.input)),
            (None, None) => print_status(self.success, &self.input),
        }
        for warning in &self.mapper_warnings {
            print_warning(&warning.to_string());
        }
        for warning in &self.generator_warnings {
            print_warning(warning);
        }
        for issue in &self.issues {
            print_issue(issue);
        }
        if let (Some(plan), Some(summary)) = (&self.plan, &self.summary) {
            print_plan(plan, summary);
        }
    }
}

/// Write one module, refusing a target an earlier input already produced.
fn write_module(
    written: &mut HashMap<PathBuf, PathBuf>,
    input: &Path,
    target: &Path,
    text: &str,
) -> Result<(), CliError> {
    if let Some(first) = written.get(target) {
        return Err(CliError::OutputCollision {
            output: target.to_path_buf(),
            first: first.clone(),
        });
    }
    std::fs::write(target, text).map_err(|source| CliError::Write {
        path: target.to_path_buf(),
        source,
    })?;
    written.insert(target.to_path_buf(), input.to_path_buf());
    Ok(())
}

/// Run the migrate command.
pub fn run_migrate(args: &MigrateArgs, cancel: &CancellationToken) -> anyhow::Result<CommandStatus> {
    let config = load_config(args.config.as_deref())?;
    let pipeline = Pipeline::new(&config);
    let format = OutputFormat::from_json_flag(args.json);
    let paths = collect_inputs(&args.inputs)?;

    if let Some(dir) = &args.output {
        std::fs::create_dir_all(dir).map_err(|source| CliError::Write {
            path: dir.clone(),
            source,
        })?;
    }

    let texts: Vec<Result<String, CliError>> = paths.iter().map(|p| read_source(p)).collect();
    let units: Vec<SourceUnit> = paths
        .iter()
        .zip(&texts)
        .filter_map(|(path, text)| {
            let source = text.as_ref().ok()?;
            Some(SourceUnit::new(path.display().to_string(), source.clone()))
        })
        .collect();
    let mut outcomes = pipeline.run_batch(&units, cancel).into_iter();

    let mut results = Vec::with_capacity(paths.len());
    let mut written = HashMap::new();
    for (path, text) in paths.iter().zip(texts) {
        let source = match text {
            Ok(source) => source,
            Err(err) => {
                results.push(UnitResult::failed(path, err.to_string()));
                continue;
            }
        };
        let outcome = outcomes
            .next()
            .ok_or_else(|| anyhow::anyhow!("no pipeline result for {}", path.display()))?;

        let result = match outcome {
            Ok(outcome) => {
                let target = python_path(path, args.output.as_deref());
                if let Err(err) = write_module(&mut written, path, &target, &outcome.code.text) {
                    warn!(input = %path.display(), error = %err, "module not written");
                    let result = UnitResult::failed(path, err.to_string());
                    if format == OutputFormat::Human {
                        result.print();
                    }
                    results.push(result);
                    continue;
                }
                for warning in &outcome.mapper_warnings {
                    warn!(input = %path.display(), location = %warning.location, "{}", warning.message);
                }
                info!(
                    input = %path.display(),
                    output = %target.display(),
                    passed = outcome.passed(),
                    "migrated"
                );
                UnitResult::migrated(path, &target, outcome, args.plan)
            }
            Err(PipelineError::Syntax(err)) => {
                if format == OutputFormat::Human {
                    report_syntax_error(path, &source, &err);
                }
                info!(input = %path.display(), "syntax error");
                UnitResult::failed(path, err.to_string())
            }
            Err(err) => {
                info!(input = %path.display(), error = %err, "failed");
                UnitResult::failed(path, err.to_string())
            }
        };

        if format == OutputFormat::Human {
            result.print();
        }
        results.push(result);
    }

    if format == OutputFormat::Json {
        print_json(&results)?;
    }
    Ok(CommandStatus::from_passed(results.iter().all(|r| r.success)))
}
