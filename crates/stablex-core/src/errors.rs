use thiserror::Error;

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// This taxonomy provides a stable, structured classification of all errors
/// in stablex. Each kind maps to a stable error code that can be used for
/// programmatic error handling, testing, and CLI exit reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Fixture construction
    /// The reference workflow failed to run or produced no usable bindings
    Execution,
    /// The baseline archive is absent, unreadable, or corrupt
    BaselineMissing,

    // Regression checks
    /// Fresh and baseline snapshots do not have the same key set
    StructuralMismatch,
    /// At least one shared key compares unequal
    ValueMismatch,

    // Validation
    InvalidSnapshot,
    InvalidConfig,

    // Integration/IO
    Io,
    Serialization,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::Execution => "ERR_EXECUTION",
            ExErrorKind::BaselineMissing => "ERR_BASELINE_MISSING",
            ExErrorKind::StructuralMismatch => "ERR_STRUCTURAL_MISMATCH",
            ExErrorKind::ValueMismatch => "ERR_VALUE_MISMATCH",
            ExErrorKind::InvalidSnapshot => "ERR_INVALID_SNAPSHOT",
            ExErrorKind::InvalidConfig => "ERR_INVALID_CONFIG",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries a classification kind for programmatic handling plus the context a
/// regression operator needs: the failing operation, the snapshot keys
/// involved, and a human-readable message.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    key: Option<String>,
    path: Option<String>,
    message: String,
    keys: Option<Vec<String>>,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            key: None,
            path: None,
            message: String::new(),
            keys: None,
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add the snapshot key this error is about
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Add filesystem path context
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add the full list of offending keys (structural and value mismatches)
    pub fn with_keys(mut self, keys: Vec<String>) -> Self {
        self.keys = Some(keys);
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the key context, if any
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Get the path context, if any
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the offending keys, if any
    pub fn keys(&self) -> Option<&[String]> {
        self.keys.as_deref()
    }

    /// Get the source error, if any
    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(key) = &self.key {
            write!(f, " (key: {})", key)?;
        }
        if let Some(path) = &self.path {
            write!(f, " (path: {})", path)?;
        }
        if let Some(keys) = &self.keys {
            write!(f, " (keys: {})", keys.join(", "))?;
        }
        if let Some(source) = &self.source {
            write!(f, "; caused by {}", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Domain error taxonomy for stablex operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StablexError {
    /// The reference workflow exited unsuccessfully
    #[error("Workflow {workflow} failed with {status}: {stderr_tail}")]
    WorkflowFailed {
        workflow: String,
        status: String,
        stderr_tail: String,
    },

    /// The reference workflow could not be started
    #[error("Workflow {workflow} could not be started: {reason}")]
    WorkflowSpawn { workflow: String, reason: String },

    /// The workflow ran but did not print a valid bindings document
    #[error("Workflow {workflow} produced invalid bindings: {reason}")]
    InvalidBindings { workflow: String, reason: String },

    /// Baseline archive does not exist
    #[error("Baseline not found: {path}")]
    BaselineNotFound { path: String },

    /// Baseline archive exists but cannot be decoded
    #[error("Baseline corrupt: {path}: {reason}")]
    BaselineCorrupt { path: String, reason: String },

    /// Array element count disagrees with its shape
    #[error("Array shape {shape:?} expects {expected} elements, found {found}")]
    ArrayShape {
        shape: Vec<usize>,
        expected: usize,
        found: usize,
    },

    /// Array shape whose element count does not fit in `usize`
    #[error("Array shape {shape:?} overflows the element count")]
    ArrayShapeOverflow { shape: Vec<usize> },

    /// Table columns have unequal lengths or disagree with the index
    #[error("Table column {column} has {found} rows, index has {expected}")]
    TableShape {
        column: String,
        expected: usize,
        found: usize,
    },

    /// Configuration failed validation
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    /// Serialization error
    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

/// Conversion from StablexError to ExError
impl From<StablexError> for ExError {
    fn from(err: StablexError) -> Self {
        match err {
            StablexError::WorkflowFailed {
                workflow,
                status,
                stderr_tail,
            } => ExError::new(ExErrorKind::Execution)
                .with_path(workflow)
                .with_message(format!("workflow exited with {}: {}", status, stderr_tail)),

            StablexError::WorkflowSpawn { workflow, reason } => {
                ExError::new(ExErrorKind::Execution)
                    .with_path(workflow)
                    .with_message(format!("workflow could not be started: {}", reason))
            }

            StablexError::InvalidBindings { workflow, reason } => {
                ExError::new(ExErrorKind::Execution)
                    .with_path(workflow)
                    .with_message(format!("invalid bindings document: {}", reason))
            }

            StablexError::BaselineNotFound { path } => ExError::new(ExErrorKind::BaselineMissing)
                .with_path(path)
                .with_message("baseline archive not found"),

            StablexError::BaselineCorrupt { path, reason } => {
                ExError::new(ExErrorKind::BaselineMissing)
                    .with_path(path)
                    .with_message(format!("baseline archive is corrupt: {}", reason))
            }

            e @ (StablexError::ArrayShape { .. } | StablexError::ArrayShapeOverflow { .. }) => {
                ExError::new(ExErrorKind::InvalidSnapshot).with_message(e.to_string())
            }

            e @ StablexError::TableShape { .. } => {
                ExError::new(ExErrorKind::InvalidSnapshot).with_message(e.to_string())
            }

            StablexError::InvalidConfig { reason } => {
                ExError::new(ExErrorKind::InvalidConfig).with_message(reason)
            }

            StablexError::Serialization { message } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }
        }
    }
}

/// Conversion from serde_json::Error to StablexError
impl From<serde_json::Error> for StablexError {
    fn from(err: serde_json::Error) -> Self {
        StablexError::Serialization {
            message: err.to_string(),
        }
    }
}

/// Conversion from serde_json::Error to ExError
impl From<serde_json::Error> for ExError {
    fn from(err: serde_json::Error) -> Self {
        StablexError::from(err).into()
    }
}
