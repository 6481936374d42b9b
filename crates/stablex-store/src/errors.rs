//! Error handling for stablex-store
//!
//! Wraps stablex-core ExError with store-specific helpers

use stablex_core::errors::{ExError, ExErrorKind, StablexError};
use std::path::Path;

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Create an IO error
pub fn io_error(operation: &str, err: std::io::Error) -> ExError {
    ExError::new(ExErrorKind::Io)
        .with_op(operation.to_string())
        .with_message(err.to_string())
}

/// Create a baseline-missing error for an absent or unreadable archive
pub fn baseline_unreadable(path: &Path, err: std::io::Error) -> ExError {
    let display = path.display().to_string();
    let base: ExError = if err.kind() == std::io::ErrorKind::NotFound {
        StablexError::BaselineNotFound { path: display }.into()
    } else {
        StablexError::BaselineCorrupt {
            path: display,
            reason: format!("unreadable: {}", err),
        }
        .into()
    };
    base.with_op("load_baseline_snapshot")
}

/// Create a baseline-missing error for an archive that cannot be decoded
pub fn baseline_corrupt(path: &Path, reason: impl Into<String>) -> ExError {
    ExError::from(StablexError::BaselineCorrupt {
        path: path.display().to_string(),
        reason: reason.into(),
    })
    .with_op("load_baseline_snapshot")
}

/// Create a serialization error
pub fn serialization_error(operation: &str, err: serde_json::Error) -> ExError {
    ExError::from(err).with_op(operation.to_string())
}
