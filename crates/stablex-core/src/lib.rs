//! stablex core - snapshot model and comparison kernel
//!
//! This crate provides the foundational pieces of the tutorial output
//! stability harness:
//! - Typed snapshot values (scalar, array, sequence, mapping, table)
//! - Recursive-descent flattening and element kind classification
//! - Key-set diff and the value-equivalence rule
//! - Structured error facility with stable codes
//! - Logging facility and the injected diagnostics interface
//! - Markdown rendering of comparison reports

pub mod diagnostics;
pub mod diff;
pub mod errors;
pub mod logging_facility;
pub mod snapshot;

pub use stablex_core_types::schema;

// Re-export commonly used types
pub use diagnostics::{Diagnostics, RecordingDiagnostics, SilentDiagnostics, TracingDiagnostics};
pub use diff::{ComparisonReport, EquivalenceRules, KeyDiff, ValueComparison};
pub use errors::{ExError, ExErrorKind, Result, StablexError};
pub use snapshot::{Snapshot, Value};
