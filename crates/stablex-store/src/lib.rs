//! Stablex Store - baseline archive persistence
//!
//! Provides:
//! - The gzip JSON baseline archive codec
//! - Entries digest for integrity checking
//! - Atomic (temp file + rename) writes

pub mod atomic;
pub mod baseline;
pub mod digest;
pub mod errors;

// Re-export key types
pub use baseline::{
    load_baseline_snapshot, read_archive, write_baseline, BaselineArchive, BASELINE_FORMAT,
};
pub use errors::Result;
