//! Pipeline runs over the shared Java fixtures.

use jport_common::{JportConfig, Pipeline, PipelineError, SourceUnit};
use jport_core::Component;
use rstest::rstest;
use tokio_util::sync::CancellationToken;

const CALCULATOR: &str = include_str!("../../../fixtures/java/Calculator.java");
const SHAPES: &str = include_str!("../../../fixtures/java/Shapes.java");
const BROKEN: &str = include_str!("../../../fixtures/java/Broken.java");
const CYCLE: &str = include_str!("../../../fixtures/java/Cycle.java");

#[rstest]
#[case::calculator(CALCULATOR, 1, 4)]
#[case::shapes(SHAPES, 4, 14)]
fn fixture_passes(#[case] source: &str, #[case] classes: usize, #[case] steps: usize) {
    let outcome = Pipeline::default()
        .run(source, &CancellationToken::new())
        .unwrap();
    assert!(outcome.passed(), "{:#?}", outcome.report.issues);
    assert_eq!(outcome.mapped.classes.len(), classes);
    assert_eq!(outcome.plan.len(), steps);
    assert_eq!(outcome.summary.total_steps, steps);
}

#[test]
fn shapes_plan_orders_supertypes_first() {
    let outcome = Pipeline::default()
        .run(SHAPES, &CancellationToken::new())
        .unwrap();
    let classes: Vec<_> = outcome
        .plan
        .iter()
        .filter(|s| s.component == Component::Class)
        .map(|s| s.target_class.as_str())
        .collect();
    assert_eq!(classes, ["Shape", "AbstractShape", "Circle", "ShapeRegistry"]);

    let circle_ctor = outcome
        .plan
        .iter()
        .find(|s| s.target_class == "Circle" && s.component == Component::Constructor)
        .unwrap();
    assert_eq!(
        circle_ctor.warnings,
        ["2 constructors must merge into a single __init__"]
    );
}

#[test]
fn batch_isolates_failures_and_keeps_order() {
    let units = vec![
        SourceUnit::new("Calculator.java", CALCULATOR),
        SourceUnit::new("Broken.java", BROKEN),
        SourceUnit::new("Cycle.java", CYCLE),
        SourceUnit::new("Shapes.java", SHAPES),
    ];
    let results = Pipeline::default().run_batch(&units, &CancellationToken::new());

    assert_eq!(results.len(), 4);
    assert!(results[0].as_ref().is_ok_and(|o| o.passed()));
    assert!(matches!(results[1], Err(PipelineError::Syntax(_))));
    assert!(matches!(results[2], Err(PipelineError::Cycle(_))));
    assert!(results[3].as_ref().is_ok_and(|o| o.passed()));
}

#[test]
fn cancelled_batch_yields_no_outcomes() {
    let cancel = CancellationToken::new();
    cancel.cancel();
    let units = vec![SourceUnit::new("Calculator.java", CALCULATOR)];
    let results = Pipeline::default().run_batch(&units, &cancel);
    assert!(matches!(results[0], Err(PipelineError::Cancelled { .. })));
}

#[test]
fn config_file_changes_output() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("jport.toml");
    std::fs::write(
        &path,
        r#"
[generator]
indent = 2
docstrings = false

[planner.thresholds]
low_max = 0
medium_max = 1
"#,
    )?;
    let config = JportConfig::load(&path)?;
    let outcome = Pipeline::new(&config).run(CALCULATOR, &CancellationToken::new())?;

    assert!(outcome.code.text.contains("\n  def add(self, a: int, b: int) -> int:\n"));
    assert!(!outcome.code.text.contains("Migrated from Java class"));
    assert!(outcome.passed(), "{:#?}", outcome.report.issues);

    let methods = outcome
        .plan
        .iter()
        .find(|s| s.component == Component::Methods)
        .unwrap();
    assert_eq!(methods.complexity, jport_core::Complexity::High);
    Ok(())
}

#[test]
fn outcome_serializes() {
    let outcome = Pipeline::default()
        .run(CALCULATOR, &CancellationToken::new())
        .unwrap();
    let json = serde_json::to_value(&outcome).unwrap();
    assert_eq!(json["plan"][0]["component"], "class");
    assert_eq!(json["report"]["passed"], true);
    assert_eq!(json["mapped"]["classes"][0]["name"], "Calculator");
}
