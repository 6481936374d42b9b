//! CLI integration tests
//!
//! Drive the `stablex` binary end to end. `cat` plays the tutorial runner by
//! printing a prepared bindings document.

#![cfg(unix)]
#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

const BINDINGS: &str = r#"{
  "bindings": {
    "mode_x": {"kind": "array", "value": {"shape": [2], "data": {"dtype": "float", "values": [0.5, "nan"]}}},
    "nobs": {"kind": "scalar", "value": {"kind": "int", "value": 40}}
  }
}"#;

fn setup_project(dir: &Path) {
    fs::write(dir.join("bindings.json"), BINDINGS).unwrap();
    fs::write(
        dir.join("stablex.toml"),
        r#"
[workflow]
program = "cat"
args = ["{workflow}"]
path = "bindings.json"

[baseline]
path = "stable.json.gz"
"#,
    )
    .unwrap();
}

fn stablex(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_stablex"))
        .current_dir(dir)
        .env_remove("STABLEX_CONFIG")
        .args(["--log", "test"])
        .args(args)
        .output()
        .expect("Failed to execute CLI")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_export_then_check_passes() {
    let temp_dir = TempDir::new().unwrap();
    setup_project(temp_dir.path());

    let export = stablex(temp_dir.path(), &["export"]);
    assert!(export.status.success(), "Stderr: {}", stderr(&export));
    assert!(stdout(&export).contains("keys: 2"));
    assert!(temp_dir.path().join("stable.json.gz").exists());

    let check = stablex(temp_dir.path(), &["check"]);
    assert!(check.status.success(), "Stderr: {}", stderr(&check));
    let out = stdout(&check);
    assert!(out.contains("## Tutorial Output Stability"));
    assert!(out.contains("_No differences detected._"));
}

#[test]
fn test_changed_value_fails_check() {
    let temp_dir = TempDir::new().unwrap();
    setup_project(temp_dir.path());
    assert!(stablex(temp_dir.path(), &["export"]).status.success());
    fs::write(
        temp_dir.path().join("bindings.json"),
        BINDINGS.replace("0.5", "0.5000001"),
    )
    .unwrap();

    let check = stablex(temp_dir.path(), &["check"]);

    assert_eq!(check.status.code(), Some(1));
    assert!(stdout(&check).contains("### Value Mismatches"));
    assert!(stderr(&check).contains("ERR_VALUE_MISMATCH"));
    assert!(stderr(&check).contains("mode_x"));
}

#[test]
fn test_only_structure_ignores_value_changes() {
    let temp_dir = TempDir::new().unwrap();
    setup_project(temp_dir.path());
    assert!(stablex(temp_dir.path(), &["export"]).status.success());
    fs::write(
        temp_dir.path().join("bindings.json"),
        BINDINGS.replace("\"value\": 40", "\"value\": 41"),
    )
    .unwrap();

    let check = stablex(temp_dir.path(), &["check", "--only", "structure"]);

    assert!(check.status.success(), "Stderr: {}", stderr(&check));
}

#[test]
fn test_check_json_report() {
    let temp_dir = TempDir::new().unwrap();
    setup_project(temp_dir.path());
    assert!(stablex(temp_dir.path(), &["export"]).status.success());

    let check = stablex(temp_dir.path(), &["check", "--json"]);

    assert!(check.status.success(), "Stderr: {}", stderr(&check));
    let report: serde_json::Value = serde_json::from_str(&stdout(&check)).unwrap();
    assert_eq!(report["report_schema_version"], 1);
    assert_eq!(report["values"]["compared"], serde_json::json!(["mode_x", "nobs"]));
}

#[test]
fn test_check_reports_each_key_once() {
    let temp_dir = TempDir::new().unwrap();
    setup_project(temp_dir.path());
    assert!(stablex(temp_dir.path(), &["export"]).status.success());

    let check = Command::new(env!("CARGO_BIN_EXE_stablex"))
        .current_dir(temp_dir.path())
        .env_remove("STABLEX_CONFIG")
        .env_remove("RUST_LOG")
        .args(["--log", "development", "check"])
        .output()
        .unwrap();

    assert!(check.status.success(), "Stderr: {}", stderr(&check));
    let err = stderr(&check);
    assert_eq!(err.matches("comparing shared key").count(), 2);
    assert_eq!(
        err.matches("If test_content_of_outputs fails").count(),
        1
    );
    assert_eq!(
        err.matches("If test_what_output_is_there fails").count(),
        1
    );
}

#[test]
fn test_check_without_baseline_fails() {
    let temp_dir = TempDir::new().unwrap();
    setup_project(temp_dir.path());

    let check = stablex(temp_dir.path(), &["check"]);

    assert_eq!(check.status.code(), Some(1));
    assert!(stderr(&check).contains("ERR_BASELINE_MISSING"));
}

#[test]
fn test_inspect_lists_keys_and_kinds() {
    let temp_dir = TempDir::new().unwrap();
    setup_project(temp_dir.path());
    assert!(stablex(temp_dir.path(), &["export"]).status.success());

    let inspect = stablex(temp_dir.path(), &["inspect", "stable.json.gz"]);

    assert!(inspect.status.success(), "Stderr: {}", stderr(&inspect));
    let out = stdout(&inspect);
    assert!(out.contains("format: stablex.baseline/v1"));
    assert!(out.contains("keys: 2"));
    let mode_x = out.lines().find(|l| l.trim_start().starts_with("mode_x")).unwrap();
    assert!(mode_x.contains("array"));
    assert!(mode_x.contains("numeric"));
}

#[test]
fn test_export_to_explicit_output() {
    let temp_dir = TempDir::new().unwrap();
    setup_project(temp_dir.path());

    let export = stablex(temp_dir.path(), &["export", "--output", "elsewhere/b.json.gz"]);

    assert!(export.status.success(), "Stderr: {}", stderr(&export));
    assert!(temp_dir.path().join("elsewhere/b.json.gz").exists());
    assert!(!temp_dir.path().join("stable.json.gz").exists());
}

#[test]
fn test_unknown_log_profile_rejected() {
    let temp_dir = TempDir::new().unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_stablex"))
        .current_dir(temp_dir.path())
        .args(["--log", "loud", "inspect", "x"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("unknown log profile"));
}
