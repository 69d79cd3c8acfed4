//! Migration pipeline
//!
//! Runs one Java unit through parse, map, plan, generate and validate. Plan
//! and generate only read the mapped IR and run side by side on the rayon
//! pool. A batch runs its units in parallel; each unit succeeds or fails on
//! its own.

use crate::config::JportConfig;
use crate::planner::{Planner, summarize};
use jport_core::{
    CyclicDependencyError, MappedIr, MapperWarning, PlanStep, PlanSummary, StructuralIr,
    SyntaxError, ValidationReport,
};
use jport_java_binding::parse_java;
use jport_python_binding::{
    GeneratedCode, GeneratorOptions, Mapper, ValidatorOptions, generate, validate,
};
use rayon::prelude::*;
use serde::Serialize;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, debug_span};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    #[error(transparent)]
    Cycle(#[from] CyclicDependencyError),
    #[error("cancelled before the {stage} stage")]
    Cancelled { stage: &'static str },
}

/// One named piece of Java source, usually a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUnit {
    pub name: String,
    pub source: String,
}

impl SourceUnit {
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
        }
    }
}

/// Everything one successful run produced.
#[derive(Debug, Clone, Serialize)]
pub struct MigrationOutcome {
    pub structural: StructuralIr,
    pub mapped: MappedIr,
    pub mapper_warnings: Vec<MapperWarning>,
    pub plan: Vec<PlanStep>,
    pub summary: PlanSummary,
    pub code: GeneratedCode,
    pub report: ValidationReport,
}

impl MigrationOutcome {
    /// True when validation found no error.
    pub fn passed(&self) -> bool {
        self.report.passed
    }
}

#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    mapper: Mapper,
    planner: Planner,
    generator: GeneratorOptions,
    validator: ValidatorOptions,
}

impl Pipeline {
    pub fn new(config: &JportConfig) -> Self {
        Self {
            mapper: Mapper::new(config.mapper_policy()),
            planner: Planner::new(config.planner.clone()),
            generator: config.generator.clone(),
            validator: config.validator.clone(),
        }
    }

    pub fn mapper(&self) -> &Mapper {
        &self.mapper
    }

    pub fn validator_options(&self) -> &ValidatorOptions {
        &self.validator
    }

    /// Run every stage over `source`. The token is checked before each stage;
    /// a cancelled run returns no partial output.
    pub fn run(
        &self,
        source: &str,
        cancel: &CancellationToken,
    ) -> Result<MigrationOutcome, PipelineError> {
        checkpoint(cancel, "parse")?;
        let structural = parse_java(source)?;
        debug!(classes = structural.classes.len(), "parsed");

        checkpoint(cancel, "map")?;
        let mapping = self.mapper.map(&structural);
        debug!(warnings = mapping.warnings.len(), "mapped");

        checkpoint(cancel, "plan")?;
        let (plan, code) = rayon::join(
            || self.planner.plan(&mapping.ir),
            || generate(&mapping.ir, &self.generator),
        );
        let plan = plan?;
        let summary = summarize(&mapping.ir, &plan);
        debug!(steps = plan.len(), bytes = code.text.len(), "planned and generated");

        checkpoint(cancel, "validate")?;
        let report = validate(&code.text, &mapping.ir, &self.validator);
        debug!(passed = report.passed, issues = report.issues.len(), "validated");

        Ok(MigrationOutcome {
            structural,
            mapped: mapping.ir,
            mapper_warnings: mapping.warnings,
            plan,
            summary,
            code,
            report,
        })
    }

    /// Run every unit on the rayon pool. Results come back in input order.
    pub fn run_batch(
        &self,
        units: &[SourceUnit],
        cancel: &CancellationToken,
    ) -> Vec<Result<MigrationOutcome, PipelineError>> {
        units
            .par_iter()
            .map(|unit| {
                let _span = debug_span!("unit", name = %unit.name).entered();
                self.run(&unit.source, cancel)
            })
            .collect()
    }
}

fn checkpoint(cancel: &CancellationToken, stage: &'static str) -> Result<(), PipelineError> {
    if cancel.is_cancelled() {
        debug!(stage, "cancelled");
        Err(PipelineError::Cancelled { stage })
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = r#"
public class Greeter {
    private final String greeting;
    public Greeter(String greeting) { this.greeting = greeting; }
    public String greet(String name) { return greeting + name; }
}
"#;

    #[test]
    fn test_run_produces_every_output() {
        let outcome = Pipeline::default()
            .run(SOURCE, &CancellationToken::new())
            .unwrap();
        assert!(outcome.passed(), "{:#?}", outcome.report.issues);
        assert_eq!(outcome.structural.shape(), outcome.mapped.shape());
        assert_eq!(outcome.plan.len(), 4);
        assert_eq!(outcome.summary.total_steps, 4);
        assert!(outcome.code.text.contains("class Greeter:\n"));
    }

    #[test]
    fn test_cancelled_run_returns_nothing() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let err = Pipeline::default().run(SOURCE, &cancel).unwrap_err();
        assert!(matches!(err, PipelineError::Cancelled { stage: "parse" }));
    }

    #[test]
    fn test_errors_keep_their_kind() {
        let pipeline = Pipeline::default();
        let cancel = CancellationToken::new();

        let syntax = pipeline.run("class Open {", &cancel).unwrap_err();
        assert!(matches!(syntax, PipelineError::Syntax(ref e) if e.line >= 1));

        let cycle = pipeline
            .run("class A extends B {}\nclass B extends A {}", &cancel)
            .unwrap_err();
        assert_eq!(cycle.to_string(), "cyclic inheritance: A -> B -> A");
    }
}
