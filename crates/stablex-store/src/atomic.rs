//! Atomic write primitives
//!
//! Uses temp→rename pattern so a reader never sees a half-written archive

use crate::errors::{io_error, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Atomically write bytes to a file
///
/// Writes to a sibling temp file, then renames over `target_path`.
///
/// # Errors
///
/// `Io` when the parent directory cannot be created or the write or rename
/// fails. The temp file is removed on a failed rename.
pub fn atomic_write(target_path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = target_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| io_error("create_baseline_dir", e))?;
        }
    }

    let temp_path = temp_path_for(target_path);
    fs::write(&temp_path, content).map_err(|e| io_error("write_baseline_temp", e))?;

    if let Err(e) = fs::rename(&temp_path, target_path) {
        let _ = fs::remove_file(&temp_path);
        return Err(io_error("rename_baseline_temp", e));
    }

    Ok(())
}

/// `stable.json.gz` -> `stable.json.gz.tmp`, keeping the full original name
fn temp_path_for(target_path: &Path) -> PathBuf {
    let mut name = target_path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    target_path.with_file_name(name)
}
