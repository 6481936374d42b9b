//! Inspect command
//!
//! Usage: stablex inspect <ARCHIVE>

use clap::Args;
use stablex_core::snapshot::element_kind;
use stablex_store::read_archive;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct InspectArgs {
    /// Baseline archive to read
    pub archive: PathBuf,
}

/// Execute inspect command
pub fn execute(args: InspectArgs) -> Result<(), Box<dyn std::error::Error>> {
    let archive = read_archive(&args.archive)?;

    println!("format: {}", archive.format);
    println!("created_at: {}", archive.created_at.to_rfc3339());
    println!("source: {}", archive.source);
    println!("entries_digest: {}", archive.entries_digest);
    println!("keys: {}", archive.entries.len());

    let width = archive.entries.keys().map(str::len).max().unwrap_or(0);
    for (key, value) in &archive.entries {
        println!(
            "  {:<width$}  {:<8}  {}",
            key,
            value.kind_name(),
            element_kind(value).name(),
            width = width
        );
    }
    Ok(())
}
