//! Human and JSON output

use jport_core::{Issue, PlanStep, PlanSummary, Severity};
use owo_colors::{OwoColorize, Stream};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Human,
    Json,
}

impl OutputFormat {
    pub fn from_json_flag(json: bool) -> Self {
        if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// `ok  Calculator.java -> out/Calculator.py` or `FAIL Broken.java`.
pub fn print_status(ok: bool, line: &str) {
    if ok {
        println!(
            "{} {line}",
            "ok  ".if_supports_color(Stream::Stdout, |t| t.green())
        );
    } else {
        println!(
            "{} {line}",
            "FAIL".if_supports_color(Stream::Stdout, |t| t.red())
        );
    }
}

pub fn print_issue(issue: &Issue) {
    let tag = match issue.severity {
        Severity::Error => format!("{}", "error".if_supports_color(Stream::Stdout, |t| t.red())),
        Severity::Warning => format!(
            "{}",
            "warning".if_supports_color(Stream::Stdout, |t| t.yellow())
        ),
    };
    match &issue.location {
        Some(location) => println!("    {tag}: {} ({location})", issue.message),
        None => println!("    {tag}: {}", issue.message),
    }
}

pub fn print_warning(message: &str) {
    println!(
        "    {}: {message}",
        "warning".if_supports_color(Stream::Stdout, |t| t.yellow())
    );
}

pub fn print_plan(steps: &[PlanStep], summary: &PlanSummary) {
    for step in steps {
        println!("{step}");
        for warning in &step.warnings {
            print_warning(warning);
        }
    }
    println!();
    println!(
        "{} {} steps over {} classes ({} fields, {} constructors, {} methods)",
        "summary:".if_supports_color(Stream::Stdout, |t| t.bold()),
        summary.total_steps,
        summary.classes,
        summary.fields,
        summary.constructors,
        summary.methods
    );
    println!(
        "  difficulty {}, {} warnings",
        summary.difficulty, summary.warning_count
    );
    for recommendation in &summary.recommendations {
        println!("  - {recommendation}");
    }
}
