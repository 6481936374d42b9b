//! Script workflow and export tests. `cat` stands in for the tutorial
//! runner: it prints a prepared bindings document.

#![cfg(unix)]
#![allow(clippy::unwrap_used, clippy::expect_used)]

use stablex_core::errors::ExErrorKind;
use stablex_core::{TracingDiagnostics, Value};
use stablex_engine::{
    build_fixture_from_config, export_baseline, produce_fresh_snapshot, RegressionSuite,
    ScriptWorkflow, StablexConfig, Workflow,
};
use stablex_store::read_archive;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

const BINDINGS: &str = r#"{
  "bindings": {
    "_": {"kind": "scalar", "value": {"kind": "int", "value": 5}},
    "mode_x": {"kind": "array", "value": {"shape": [3], "data": {"dtype": "float", "values": [0.5, "nan", 1.25]}}},
    "nobs": {"kind": "scalar", "value": {"kind": "int", "value": 40}},
    "prior": {"kind": "mapping", "value": {"beta": {"kind": "scalar", "value": {"kind": "float", "value": 0.99}}}}
  }
}"#;

fn write_config(dir: &Path) -> std::path::PathBuf {
    fs::write(dir.join("bindings.json"), BINDINGS).unwrap();
    let config = dir.join("stablex.toml");
    fs::write(
        &config,
        r#"
[workflow]
program = "cat"
args = ["{workflow}"]
path = "bindings.json"

[baseline]
path = "resources/stable.json.gz"
regenerate_hint = "stablex export --config stablex.toml"
"#,
    )
    .unwrap();
    config
}

#[test]
fn test_script_output_becomes_normalized_snapshot() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("bindings.json"), BINDINGS).unwrap();
    let workflow = ScriptWorkflow::new("cat", "bindings.json").with_working_dir(dir.path());

    let snapshot = produce_fresh_snapshot(&workflow).unwrap();

    assert_eq!(
        snapshot.keys().collect::<Vec<_>>(),
        vec!["mode_x", "nobs", "prior_beta"]
    );
    assert_eq!(snapshot.get("nobs"), Some(&Value::int(40)));
}

#[test]
fn test_nonzero_exit_is_execution_error() {
    let dir = TempDir::new().unwrap();
    let workflow = ScriptWorkflow::new("cat", "does-not-exist.json").with_working_dir(dir.path());

    let err = workflow.execute().unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::Execution);
    assert!(err.message().contains("does-not-exist.json"));
}

#[test]
fn test_unknown_program_is_execution_error() {
    let workflow = ScriptWorkflow::new("stablex-no-such-runner", "x.ipynb");

    let err = workflow.execute().unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::Execution);
    assert!(err.message().contains("could not be started"));
}

#[test]
fn test_garbage_stdout_is_execution_error() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("nb.ipynb"), "not json").unwrap();
    let workflow = ScriptWorkflow::new("cat", "nb.ipynb").with_working_dir(dir.path());

    let err = workflow.execute().unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::Execution);
    assert!(err.message().contains("invalid bindings"));
}

#[test]
fn test_export_then_check_passes() {
    let dir = TempDir::new().unwrap();
    let config = StablexConfig::load(Some(&write_config(dir.path()))).unwrap();
    let workflow = ScriptWorkflow::from_config(&config);

    let summary = export_baseline(&workflow, &config.baseline_path()).unwrap();
    assert_eq!(summary.key_count, 3);

    let archive = read_archive(&config.baseline_path()).unwrap();
    assert_eq!(archive.entries_digest, summary.entries_digest);
    assert!(archive.source.ends_with("bindings.json"));

    let fixture = build_fixture_from_config(&config).unwrap();
    let suite = RegressionSuite::from_config(&config, Arc::new(TracingDiagnostics));
    assert!(suite.run(&fixture).passed());
}

#[test]
fn test_changed_output_after_export_fails_content() {
    let dir = TempDir::new().unwrap();
    let config = StablexConfig::load(Some(&write_config(dir.path()))).unwrap();
    export_baseline(&ScriptWorkflow::from_config(&config), &config.baseline_path()).unwrap();

    fs::write(
        dir.path().join("bindings.json"),
        BINDINGS.replace("\"value\": 40", "\"value\": 41"),
    )
    .unwrap();

    let fixture = build_fixture_from_config(&config).unwrap();
    let suite = RegressionSuite::from_config(&config, Arc::new(TracingDiagnostics));
    let outcome = suite.run(&fixture);

    assert!(outcome.structure.is_ok());
    let err = outcome.content.unwrap_err();
    assert_eq!(err.keys(), Some(&["nobs".to_string()][..]));
}
