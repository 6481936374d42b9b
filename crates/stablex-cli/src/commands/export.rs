//! Export command
//!
//! Usage: stablex export [--config <FILE>] [--output <FILE>]

use clap::Args;
use stablex_engine::{export_baseline, ScriptWorkflow, StablexConfig};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Config file (default: $STABLEX_CONFIG, then ./stablex.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Archive to write (default: the configured baseline path)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Execute export command
pub fn execute(args: ExportArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = StablexConfig::load(args.config.as_deref())?;
    let path = args.output.unwrap_or_else(|| config.baseline_path());

    let summary = export_baseline(&ScriptWorkflow::from_config(&config), &path)?;

    println!("Baseline exported:");
    println!("  path: {}", summary.path.display());
    println!("  keys: {}", summary.key_count);
    println!("  entries_digest: {}", summary.entries_digest);
    Ok(())
}
