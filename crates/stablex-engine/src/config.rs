//! Harness configuration (`stablex.toml`).
//!
//! Lookup order: explicit path, then `STABLEX_CONFIG`, then `./stablex.toml`,
//! then built-in defaults. Relative paths inside the file resolve against the
//! directory holding it.

use serde::{Deserialize, Serialize};
use stablex_core::diff::equivalence::{DEFAULT_NAN_SENTINEL, DEFAULT_TABULAR_LIST_KEYS};
use stablex_core::errors::{ExError, ExErrorKind, Result, StablexError};
use stablex_core::EquivalenceRules;
use std::collections::BTreeSet;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Default config filename.
pub const DEFAULT_CONFIG_NAME: &str = "stablex.toml";
/// Environment variable override for config path.
pub const CONFIG_ENV_VAR: &str = "STABLEX_CONFIG";
/// Maximum allowed config file size in bytes.
const MAX_CONFIG_FILE_SIZE: usize = 64 * 1024;

pub const DEFAULT_WORKFLOW_PATH: &str = "docs/getting_started.ipynb";
pub const DEFAULT_BASELINE_PATH: &str = "tests/resources/getting_started_stable.json.gz";
pub const DEFAULT_REGENERATE_HINT: &str = "stablex export";
/// Placeholder in `workflow.args` replaced by the workflow path.
pub const WORKFLOW_PLACEHOLDER: &str = "{workflow}";

/// Names never value-compared unless configured otherwise.
pub const DEFAULT_EXCLUDED_KEYS: &[&str] = &["__warningregistry___version"];

/// How to run the reference workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorkflowConfig {
    /// Program that executes the workflow and prints its bindings document
    pub program: String,
    /// Program arguments; `{workflow}` is replaced by `path`
    pub args: Vec<String>,
    /// Workflow source document
    pub path: PathBuf,
    /// Directory the program runs in (defaults to the config directory)
    pub working_dir: Option<PathBuf>,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            program: "python3".to_string(),
            args: vec![
                "tools/export_bindings.py".to_string(),
                WORKFLOW_PLACEHOLDER.to_string(),
            ],
            path: PathBuf::from(DEFAULT_WORKFLOW_PATH),
            working_dir: None,
        }
    }
}

/// Where the baseline archive lives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BaselineConfig {
    pub path: PathBuf,
    /// Command shown to operators when a check fails
    pub regenerate_hint: String,
}

impl Default for BaselineConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_BASELINE_PATH),
            regenerate_hint: DEFAULT_REGENERATE_HINT.to_string(),
        }
    }
}

/// Parameters of the value comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ComparisonConfig {
    pub excluded_keys: Vec<String>,
    pub tabular_list_keys: Vec<String>,
    pub nan_sentinel: f64,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            excluded_keys: DEFAULT_EXCLUDED_KEYS.iter().map(|k| k.to_string()).collect(),
            tabular_list_keys: DEFAULT_TABULAR_LIST_KEYS
                .iter()
                .map(|k| k.to_string())
                .collect(),
            nan_sentinel: DEFAULT_NAN_SENTINEL,
        }
    }
}

/// Harness configuration file.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StablexConfig {
    pub workflow: WorkflowConfig,
    pub baseline: BaselineConfig,
    pub comparison: ComparisonConfig,
    /// Directory relative paths resolve against (not serialized).
    #[serde(skip)]
    pub base_dir: PathBuf,
    /// File this config was read from, if any (not serialized).
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

impl StablexConfig {
    /// Loads configuration using the lookup order in the module docs.
    ///
    /// # Errors
    ///
    /// `Io` when an explicitly named file cannot be read, `InvalidConfig` when
    /// it is too large, not UTF-8, not valid TOML, or fails [`Self::validate`].
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match resolve_path(path) {
            Some(resolved) => Self::load_file(&resolved),
            None => {
                let config = Self {
                    base_dir: PathBuf::from("."),
                    ..Self::default()
                };
                config.validate()?;
                Ok(config)
            }
        }
    }

    /// Loads configuration from exactly `path`.
    ///
    /// # Errors
    ///
    /// See [`Self::load`].
    pub fn load_file(path: &Path) -> Result<Self> {
        let bytes = fs::read(path).map_err(|e| {
            ExError::new(ExErrorKind::Io)
                .with_op("load_config")
                .with_path(path.display().to_string())
                .with_message(e.to_string())
        })?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(invalid(path, "config file exceeds size limit"));
        }
        let content =
            std::str::from_utf8(&bytes).map_err(|_| invalid(path, "config must be utf-8"))?;
        let mut config = Self::from_toml_str(content)
            .map_err(|e| e.with_path(path.display().to_string()))?;
        config.base_dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        config.source = Some(path.to_path_buf());
        Ok(config)
    }

    /// Parses and validates a TOML document. `base_dir` is left empty.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` on parse or validation failure.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| {
            ExError::from(StablexError::InvalidConfig {
                reason: e.to_string(),
            })
            .with_op("load_config")
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Validates configuration.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` naming the first offending setting.
    pub fn validate(&self) -> Result<()> {
        if self.workflow.program.trim().is_empty() {
            return Err(invalid_reason("workflow.program is required"));
        }
        if self.workflow.path.as_os_str().is_empty() {
            return Err(invalid_reason("workflow.path is required"));
        }
        if self.baseline.path.as_os_str().is_empty() {
            return Err(invalid_reason("baseline.path is required"));
        }
        if !self.comparison.nan_sentinel.is_finite() {
            return Err(invalid_reason("comparison.nan_sentinel must be finite"));
        }
        let blank = self
            .comparison
            .excluded_keys
            .iter()
            .chain(&self.comparison.tabular_list_keys)
            .any(|k| k.trim().is_empty());
        if blank {
            return Err(invalid_reason("comparison keys must not be blank"));
        }
        Ok(())
    }

    /// Equivalence rule parameters from `[comparison]`.
    pub fn rules(&self) -> EquivalenceRules {
        EquivalenceRules {
            nan_sentinel: self.comparison.nan_sentinel,
            tabular_list_keys: self.comparison.tabular_list_keys.iter().cloned().collect(),
        }
    }

    pub fn excluded_keys(&self) -> BTreeSet<String> {
        self.comparison.excluded_keys.iter().cloned().collect()
    }

    pub fn workflow_path(&self) -> PathBuf {
        self.resolve(&self.workflow.path)
    }

    pub fn baseline_path(&self) -> PathBuf {
        self.resolve(&self.baseline.path)
    }

    pub fn working_dir(&self) -> PathBuf {
        match &self.workflow.working_dir {
            Some(dir) => self.resolve(dir),
            None => self.base_dir.clone(),
        }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }
}

/// Explicit path, env override, or `./stablex.toml` when present.
fn resolve_path(path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = path {
        return Some(path.to_path_buf());
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if !env_path.trim().is_empty() {
            return Some(PathBuf::from(env_path));
        }
    }
    let local = PathBuf::from(DEFAULT_CONFIG_NAME);
    local.is_file().then_some(local)
}

fn invalid_reason(reason: &str) -> ExError {
    ExError::from(StablexError::InvalidConfig {
        reason: reason.to_string(),
    })
    .with_op("validate_config")
}

fn invalid(path: &Path, reason: &str) -> ExError {
    invalid_reason(reason)
        .with_op("load_config")
        .with_path(path.display().to_string())
}
