//! Baseline archive codec.
//!
//! A baseline is a gzip-compressed JSON document:
//!
//! ```json
//! {
//!   "format": "stablex.baseline/v1",
//!   "created_at": "2026-01-01T00:00:00Z",
//!   "source": "docs/getting_started.ipynb",
//!   "entries_digest": "<sha256 hex of the entries JSON>",
//!   "entries": { "<name>": <Value>, ... }
//! }
//! ```
//!
//! Decoding is pure data parsing. Anything that keeps the archive from
//! yielding a verified snapshot is reported as `BaselineMissing`.

use crate::atomic::atomic_write;
use crate::digest::compute_entries_digest;
use crate::errors::{baseline_corrupt, baseline_unreadable, serialization_error, Result};
use chrono::{DateTime, Utc};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};
use stablex_core::errors::{ExError, ExErrorKind};
use stablex_core::{log_op_end, log_op_error, log_op_start, Snapshot};
use std::io::{Read, Write};
use std::path::Path;
use std::time::Instant;

/// Format tag written into every archive
pub const BASELINE_FORMAT: &str = "stablex.baseline/v1";

/// Upper bound on the decompressed archive size (64 MiB)
pub const MAX_DECOMPRESSED_BYTES: u64 = 64 * 1024 * 1024;

/// A decoded baseline archive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaselineArchive {
    pub format: String,
    pub created_at: DateTime<Utc>,
    /// Workflow the entries were captured from
    pub source: String,
    pub entries_digest: String,
    pub entries: Snapshot,
}

impl BaselineArchive {
    /// Wrap `entries` in a current-format archive stamped now.
    ///
    /// # Errors
    ///
    /// `Serialization` if the entries digest cannot be computed.
    pub fn new(entries: Snapshot, source: impl Into<String>) -> Result<Self> {
        Ok(Self {
            format: BASELINE_FORMAT.to_string(),
            created_at: Utc::now(),
            source: source.into(),
            entries_digest: compute_entries_digest(&entries)?,
            entries,
        })
    }
}

/// Borrowing twin of [`BaselineArchive`] so writing never clones entries.
#[derive(Serialize)]
struct ArchiveRef<'a> {
    format: &'a str,
    created_at: DateTime<Utc>,
    source: &'a str,
    entries_digest: &'a str,
    entries: &'a Snapshot,
}

/// Gzip-compress the JSON encoding of an archive.
///
/// # Errors
///
/// `Serialization` or `Io` if encoding or compression fails.
pub fn encode_archive(archive: &BaselineArchive) -> Result<Vec<u8>> {
    let json = serde_json::to_vec(archive).map_err(|e| serialization_error("encode_archive", e))?;
    gzip(&json)
}

fn gzip(bytes: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(bytes).map_err(|e| {
        ExError::new(ExErrorKind::Io)
            .with_op("encode_archive")
            .with_message(format!("Failed to compress archive: {}", e))
    })?;
    encoder.finish().map_err(|e| {
        ExError::new(ExErrorKind::Io)
            .with_op("encode_archive")
            .with_message(format!("Failed to finish compression: {}", e))
    })
}

/// Decode and verify archive bytes read from `path`.
///
/// `path` is used for error context only.
///
/// # Errors
///
/// `BaselineMissing` when the bytes are not gzip, exceed
/// [`MAX_DECOMPRESSED_BYTES`] once decompressed, are not a JSON archive of
/// [`BASELINE_FORMAT`], hold invalid values, or fail the digest check.
pub fn decode_archive(bytes: &[u8], path: &Path) -> Result<BaselineArchive> {
    let mut json = Vec::new();
    GzDecoder::new(bytes)
        .take(MAX_DECOMPRESSED_BYTES + 1)
        .read_to_end(&mut json)
        .map_err(|e| baseline_corrupt(path, format!("not a gzip stream: {}", e)))?;
    if json.len() as u64 > MAX_DECOMPRESSED_BYTES {
        return Err(baseline_corrupt(
            path,
            format!(
                "decompressed size exceeds {} bytes",
                MAX_DECOMPRESSED_BYTES
            ),
        ));
    }

    let raw: serde_json::Value = serde_json::from_slice(&json)
        .map_err(|e| baseline_corrupt(path, format!("not a JSON document: {}", e)))?;
    match raw.get("format").and_then(|f| f.as_str()) {
        Some(BASELINE_FORMAT) => {}
        Some(other) => {
            return Err(baseline_corrupt(
                path,
                format!("unknown format '{}', expected '{}'", other, BASELINE_FORMAT),
            ))
        }
        None => return Err(baseline_corrupt(path, "missing format tag")),
    }

    let archive: BaselineArchive = serde_json::from_value(raw)
        .map_err(|e| baseline_corrupt(path, format!("invalid archive: {}", e)))?;

    archive
        .entries
        .validate()
        .map_err(|(key, e)| baseline_corrupt(path, format!("entry '{}': {}", key, e)))?;

    let actual = compute_entries_digest(&archive.entries)?;
    if actual != archive.entries_digest {
        return Err(baseline_corrupt(
            path,
            format!(
                "entries digest mismatch: recorded {}, computed {}",
                archive.entries_digest, actual
            ),
        ));
    }

    Ok(archive)
}

/// Read and verify the archive at `path`.
///
/// # Errors
///
/// `BaselineMissing` if the file is absent, unreadable or fails
/// [`decode_archive`].
pub fn read_archive(path: &Path) -> Result<BaselineArchive> {
    let bytes = std::fs::read(path).map_err(|e| baseline_unreadable(path, e))?;
    decode_archive(&bytes, path)
}

/// Load the baseline snapshot stored at `path`.
///
/// # Errors
///
/// `BaselineMissing`, see [`read_archive`].
pub fn load_baseline_snapshot(path: &Path) -> Result<Snapshot> {
    let start = Instant::now();
    log_op_start!("load_baseline_snapshot", baseline_path = %path.display());

    match read_archive(path) {
        Ok(archive) => {
            log_op_end!(
                "load_baseline_snapshot",
                duration_ms = start.elapsed().as_millis() as u64,
                key_count = archive.entries.len()
            );
            Ok(archive.entries)
        }
        Err(err) => {
            log_op_error!(
                "load_baseline_snapshot",
                err.clone(),
                duration_ms = start.elapsed().as_millis() as u64
            );
            Err(err)
        }
    }
}

/// Write `snapshot` as the baseline archive at `path`, atomically.
///
/// Returns the recorded entries digest.
///
/// # Errors
///
/// `Serialization` if the snapshot cannot be encoded, `Io` if the archive
/// cannot be written.
pub fn write_baseline(path: &Path, snapshot: &Snapshot, source: &str) -> Result<String> {
    let start = Instant::now();
    log_op_start!("write_baseline", baseline_path = %path.display(), key_count = snapshot.len());

    let result = (|| -> Result<String> {
        let entries_digest = compute_entries_digest(snapshot)?;
        let archive = ArchiveRef {
            format: BASELINE_FORMAT,
            created_at: Utc::now(),
            source,
            entries_digest: &entries_digest,
            entries: snapshot,
        };
        let json =
            serde_json::to_vec(&archive).map_err(|e| serialization_error("write_baseline", e))?;
        atomic_write(path, &gzip(&json)?)?;
        Ok(entries_digest)
    })();

    let duration_ms = start.elapsed().as_millis() as u64;
    match &result {
        Ok(_) => {
            log_op_end!("write_baseline", duration_ms = duration_ms);
        }
        Err(err) => {
            log_op_error!(
                "write_baseline",
                err.clone().with_path(path.display().to_string()),
                duration_ms = duration_ms
            );
        }
    }
    result
}
