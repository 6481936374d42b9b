//! Entries digest canonicalization
//!
//! Computes a stable SHA256 digest of a snapshot's entries so a baseline
//! archive can detect silent corruption or hand edits.

use crate::errors::{serialization_error, Result};
use sha2::{Digest, Sha256};
use stablex_core::Snapshot;

/// Compute the entries digest of a snapshot
///
/// Returns the SHA256 hex digest of the compact JSON encoding of the entries.
/// Entries and mapping keys are ordered maps, so the encoding is canonical.
///
/// # Errors
///
/// `Serialization` if the snapshot cannot be encoded.
pub fn compute_entries_digest(snapshot: &Snapshot) -> Result<String> {
    let json = serde_json::to_vec(snapshot)
        .map_err(|e| serialization_error("compute_entries_digest", e))?;

    let mut hasher = Sha256::new();
    hasher.update(&json);
    Ok(hex::encode(hasher.finalize()))
}
