//! Baseline regeneration.

use crate::fixture::produce_fresh_snapshot;
use crate::workflow::Workflow;
use stablex_core::errors::Result;
use stablex_store::write_baseline;
use std::path::{Path, PathBuf};

/// What [`export_baseline`] wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub path: PathBuf,
    pub key_count: usize,
    pub entries_digest: String,
}

/// Run `workflow` and store its snapshot as the new baseline at `path`.
///
/// Meant for intentional output changes: the next comparison then runs
/// against what the current code produces.
///
/// # Errors
///
/// `Execution` if the workflow fails, `Io` or `Serialization` if the archive
/// cannot be written. The previous baseline is left untouched on failure.
pub fn export_baseline(workflow: &dyn Workflow, path: &Path) -> Result<ExportSummary> {
    let snapshot = produce_fresh_snapshot(workflow)?;
    let entries_digest = write_baseline(path, &snapshot, &workflow.describe())?;
    tracing::info!(
        baseline_path = %path.display(),
        key_count = snapshot.len(),
        "baseline exported"
    );
    Ok(ExportSummary {
        path: path.to_path_buf(),
        key_count: snapshot.len(),
        entries_digest,
    })
}
