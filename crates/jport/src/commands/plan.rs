//! Plan command: print the ordered migration plan for one Java file.

use super::{CommandStatus, load_config, read_source, report_syntax_error};
use crate::output::{OutputFormat, print_json, print_plan};
use jport_common::{plan, summarize};
use jport_core::{PlanStep, PlanSummary};
use jport_java_binding::parse_java;
use jport_python_binding::Mapper;
use owo_colors::{OwoColorize, Stream};
use serde::Serialize;
use std::path::Path;
use tokio_util::sync::CancellationToken;

#[derive(Serialize)]
struct PlanOutput<'a> {
    input: String,
    steps: &'a [PlanStep],
    summary: &'a PlanSummary,
}

pub fn run_plan(
    input: &Path,
    config: Option<&Path>,
    json: bool,
    cancel: &CancellationToken,
) -> anyhow::Result<CommandStatus> {
    let config = load_config(config)?;
    let format = OutputFormat::from_json_flag(json);
    let source = read_source(input)?;

    let structural = match parse_java(&source) {
        Ok(ir) => ir,
        Err(err) => {
            report_syntax_error(input, &source, &err);
            return Ok(CommandStatus::Failure);
        }
    };
    if cancel.is_cancelled() {
        anyhow::bail!("interrupted");
    }
    let mapping = Mapper::new(config.mapper_policy()).map(&structural);

    let steps = match plan(&mapping.ir, &config.planner) {
        Ok(steps) => steps,
        Err(err) => {
            eprintln!(
                "{} {}: {err}",
                "error:".if_supports_color(Stream::Stderr, |t| t.red()),
                input.display()
            );
            return Ok(CommandStatus::Failure);
        }
    };
    let summary = summarize(&mapping.ir, &steps);

    match format {
        OutputFormat::Json => print_json(&PlanOutput {
            input: input.display().to_string(),
            steps: &steps,
            summary: &summary,
        })?,
        OutputFormat::Human => print_plan(&steps, &summary),
    }
    Ok(CommandStatus::Success)
}
