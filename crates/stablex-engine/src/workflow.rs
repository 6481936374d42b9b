//! Reference workflow execution.
//!
//! A [`Workflow`] runs the tutorial and returns every named value it bound.
//! [`ScriptWorkflow`] delegates to an external program that prints a
//! bindings document on stdout:
//!
//! ```json
//! {"bindings": {"mode_x": {"kind": "array", "value": {...}}, ...}}
//! ```

use crate::config::{StablexConfig, WORKFLOW_PLACEHOLDER};
use serde::{Deserialize, Serialize};
use stablex_core::errors::{ExError, Result, StablexError};
use stablex_core::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Named values produced by one workflow run, before normalization.
pub type Bindings = BTreeMap<String, Value>;

/// Lines of stderr kept in an execution error.
const STDERR_TAIL_LINES: usize = 20;

/// Something that can produce the tutorial's bindings.
pub trait Workflow: Send + Sync {
    /// Short human-readable identity, used in logs and archive metadata
    fn describe(&self) -> String;

    /// Run to completion.
    ///
    /// # Errors
    ///
    /// `Execution` if the workflow fails or its output cannot be read.
    fn execute(&self) -> Result<Bindings>;
}

/// Wire form of a workflow's stdout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BindingsDocument {
    pub bindings: Bindings,
}

/// Runs an external program over the workflow document.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptWorkflow {
    program: String,
    args: Vec<String>,
    path: PathBuf,
    working_dir: Option<PathBuf>,
}

impl ScriptWorkflow {
    pub fn new(program: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            path: path.into(),
            working_dir: None,
        }
    }

    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn from_config(config: &StablexConfig) -> Self {
        Self::new(config.workflow.program.clone(), config.workflow_path())
            .with_args(config.workflow.args.clone())
            .with_working_dir(config.working_dir())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Arguments with the placeholder substituted, or the path appended
    /// when no argument mentions it.
    pub fn command_args(&self) -> Vec<String> {
        let path = self.path.display().to_string();
        if self.args.iter().any(|a| a.contains(WORKFLOW_PLACEHOLDER)) {
            self.args
                .iter()
                .map(|a| a.replace(WORKFLOW_PLACEHOLDER, &path))
                .collect()
        } else {
            let mut args = self.args.clone();
            args.push(path);
            args
        }
    }
}

impl Workflow for ScriptWorkflow {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn execute(&self) -> Result<Bindings> {
        let workflow = self.describe();
        let mut command = Command::new(&self.program);
        command
            .args(self.command_args())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = &self.working_dir {
            command.current_dir(dir);
        }

        tracing::debug!(
            program = self.program.as_str(),
            workflow = workflow.as_str(),
            "running workflow"
        );
        let output = command.output().map_err(|e| {
            ExError::from(StablexError::WorkflowSpawn {
                workflow: workflow.clone(),
                reason: format!("{}: {}", self.program, e),
            })
        })?;

        if !output.status.success() {
            return Err(StablexError::WorkflowFailed {
                workflow,
                status: output.status.to_string(),
                stderr_tail: tail_lines(&String::from_utf8_lossy(&output.stderr), STDERR_TAIL_LINES),
            }
            .into());
        }

        parse_bindings(&output.stdout, &workflow)
    }
}

/// Decode and shape-check a bindings document.
///
/// # Errors
///
/// `Execution` if the bytes are not a bindings document or a value violates
/// its shape invariants.
pub fn parse_bindings(stdout: &[u8], workflow: &str) -> Result<Bindings> {
    let document: BindingsDocument = serde_json::from_slice(stdout).map_err(|e| {
        ExError::from(StablexError::InvalidBindings {
            workflow: workflow.to_string(),
            reason: e.to_string(),
        })
    })?;
    for (name, value) in &document.bindings {
        value.validate().map_err(|e| {
            ExError::from(StablexError::InvalidBindings {
                workflow: workflow.to_string(),
                reason: format!("binding '{}': {}", name, e),
            })
            .with_key(name.clone())
        })?;
    }
    Ok(document.bindings)
}

fn tail_lines(text: &str, n: usize) -> String {
    let lines: Vec<&str> = text.lines().collect();
    let start = lines.len().saturating_sub(n);
    lines[start..].join("\n")
}
