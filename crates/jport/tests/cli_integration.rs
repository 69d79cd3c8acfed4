//! CLI integration tests for jport
//!
//! Each test runs the built binary inside a temporary directory.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../fixtures/java")
        .join(name)
}

fn project(fixtures: &[&str]) -> TempDir {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    for name in fixtures {
        std::fs::copy(fixture(name), dir.path().join(name)).expect("Failed to copy fixture");
    }
    dir
}

fn jport(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_jport"))
        .args(args)
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to run jport")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn migrate_writes_python_module() {
    let dir = project(&["Calculator.java"]);
    let output = jport(dir.path(), &["migrate", "Calculator.java", "-o", "out"]);

    assert!(output.status.success(), "{}", stderr(&output));
    let text = std::fs::read_to_string(dir.path().join("out/Calculator.py")).unwrap();
    assert!(text.contains("class Calculator:\n"));
    assert!(text.contains("raise NotImplementedError(\"body pending translation\")"));
    assert!(stdout(&output).contains("Calculator.java -> out/Calculator.py"));
}

#[test]
fn migrate_directory_reports_failures_as_json() {
    let dir = project(&["Calculator.java", "Broken.java"]);
    let output = jport(dir.path(), &["migrate", ".", "--json"]);

    assert_eq!(output.status.code(), Some(1));
    let results: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let results = results.as_array().unwrap();
    assert_eq!(results.len(), 2);

    // Walked in file-name order.
    assert_eq!(results[0]["input"], "./Broken.java");
    assert_eq!(results[0]["success"], false);
    assert!(results[0]["error"].as_str().unwrap().starts_with("syntax error at"));
    assert_eq!(results[1]["success"], true);

    assert!(!dir.path().join("Broken.py").exists());
    assert!(dir.path().join("Calculator.py").exists());
}

#[test]
fn migrate_syntax_error_is_rendered() {
    let dir = project(&["Broken.java"]);
    let output = jport(dir.path(), &["migrate", "Broken.java"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("syntax error"), "{}", stderr(&output));
    assert!(stdout(&output).contains("FAIL"));
}

#[test]
fn migrate_uses_config_file() {
    let dir = project(&["Calculator.java"]);
    std::fs::write(dir.path().join("jport.toml"), "[generator]\nindent = 2\n").unwrap();

    let output = jport(dir.path(), &["migrate", "Calculator.java"]);
    assert!(output.status.success(), "{}", stderr(&output));
    let text = std::fs::read_to_string(dir.path().join("Calculator.py")).unwrap();
    assert!(text.contains("\n  def add(self, a: int, b: int) -> int:\n"));
}

#[test]
fn migrate_refuses_to_overwrite_a_module_from_another_input() {
    let dir = project(&[]);
    for package in ["a", "b"] {
        let pkg = dir.path().join(package);
        std::fs::create_dir_all(&pkg).unwrap();
        std::fs::write(
            pkg.join("Widget.java"),
            format!("public class Widget {{\n    public String origin() {{ return \"{package}\"; }}\n}}\n"),
        )
        .unwrap();
    }

    let output = jport(
        dir.path(),
        &["migrate", "a/Widget.java", "b/Widget.java", "-o", "out", "--json"],
    );
    assert_eq!(output.status.code(), Some(1));
    let results: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let results = results.as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["success"], true);
    assert_eq!(results[1]["success"], false);
    let error = results[1]["error"].as_str().unwrap();
    assert!(error.contains("already written from a/Widget.java"), "{error}");
    assert!(dir.path().join("out/Widget.py").exists());
}

#[test]
fn plan_lists_steps_in_order() {
    let dir = project(&["Shapes.java"]);
    let output = jport(dir.path(), &["plan", "Shapes.java", "--json"]);

    assert!(output.status.success(), "{}", stderr(&output));
    let plan: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let steps = plan["steps"].as_array().unwrap();
    assert_eq!(steps[0]["target_class"], "Shape");
    assert_eq!(steps[0]["component"], "class");
    assert_eq!(plan["summary"]["total_steps"], steps.len());
}

#[test]
fn plan_reports_cycles() {
    let dir = project(&["Cycle.java"]);
    let output = jport(dir.path(), &["plan", "Cycle.java"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("cyclic inheritance: A -> B -> A"));
}

#[test]
fn validate_flags_edited_module() {
    let dir = project(&["Calculator.java"]);
    let migrated = jport(dir.path(), &["migrate", "Calculator.java"]);
    assert!(migrated.status.success(), "{}", stderr(&migrated));

    let module = dir.path().join("Calculator.py");
    let ok = jport(dir.path(), &["validate", "Calculator.java", "Calculator.py"]);
    assert!(ok.status.success(), "{}", stdout(&ok));

    let text = std::fs::read_to_string(&module).unwrap();
    std::fs::write(&module, text.replace("    def divide", "    def _gone")).unwrap();
    let edited = jport(
        dir.path(),
        &["validate", "Calculator.java", "Calculator.py", "--json"],
    );
    assert_eq!(edited.status.code(), Some(1));
    let report: serde_json::Value = serde_json::from_str(&stdout(&edited)).unwrap();
    assert_eq!(report["passed"], false);
}

#[test]
fn missing_input_is_an_operational_error() {
    let dir = project(&[]);
    let output = jport(dir.path(), &["migrate", "Absent.java"]);
    // Unreadable input is a unit failure, not a crash.
    assert_eq!(output.status.code(), Some(1));

    let output = jport(dir.path(), &["migrate", "*.java"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("glob pattern matched no files"));
}
