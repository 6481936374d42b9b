//! Snapshot comparison.
//!
//! Compares a fresh snapshot against a baseline: first the key sets, then the
//! value of every shared key under the value-equivalence rule.
//!
//! ## Entry points
//!
//! ```
//! use stablex_core::diff::{compute_diff, compare_structure};
//! use stablex_core::snapshot::{Snapshot, Value};
//!
//! let fresh: Snapshot = [("a".to_string(), Value::float(1.0))].into_iter().collect();
//! let baseline = fresh.clone();
//! let diff = compute_diff(&fresh, &baseline);
//! assert!(compare_structure(&diff).is_ok());
//! ```
//!
//! ## Guarantees
//!
//! - **Determinism**: keys are compared in sorted order, reports list keys sorted.
//! - **Completeness**: value comparison collects every failing key.
//! - **Independence**: structure and content checks can run separately; the
//!   content check never compares keys that are in the diff.

pub mod engine;
pub mod equivalence;
pub mod human_summary;
pub mod model;

pub use engine::{
    build_report, check_comparison, compare_structure, compare_values, compute_diff,
    evaluate_values,
};
pub use equivalence::{values_equivalent, EquivalenceRules};
pub use human_summary::render_human_summary;
pub use model::{ComparisonReport, KeyDiff, MismatchDetail, NanPolicy, ValueComparison, ValueMismatch};
