//! Check command
//!
//! Usage: stablex check [--config <FILE>] [--only structure|content] [--json]

use clap::{Args, ValueEnum};
use stablex_core::diff::render_human_summary;
use stablex_core::TracingDiagnostics;
use stablex_engine::CheckSelection as SuiteSelection;
use stablex_engine::{build_fixture_from_config, RegressionSuite, StablexConfig};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CheckSelection {
    /// Key sets only (test_what_output_is_there)
    Structure,
    /// Shared values only (test_content_of_outputs)
    Content,
}

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Config file (default: $STABLEX_CONFIG, then ./stablex.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Run a single check instead of both
    #[arg(long, value_enum)]
    pub only: Option<CheckSelection>,

    /// Print the comparison report as JSON instead of Markdown
    #[arg(long)]
    pub json: bool,
}

fn selection(only: Option<CheckSelection>) -> SuiteSelection {
    match only {
        None => SuiteSelection::Both,
        Some(CheckSelection::Structure) => SuiteSelection::Structure,
        Some(CheckSelection::Content) => SuiteSelection::Content,
    }
}

/// Execute check command
pub fn execute(args: CheckArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = StablexConfig::load(args.config.as_deref())?;
    let fixture = build_fixture_from_config(&config)?;
    let suite = RegressionSuite::from_config(&config, Arc::new(TracingDiagnostics));

    let run = suite.check(&fixture, selection(args.only));
    if args.json {
        println!("{}", serde_json::to_string_pretty(&run.report)?);
    } else {
        print!("{}", render_human_summary(&run.report));
    }

    match (run.structure, run.content) {
        (Some(Err(structure)), Some(Err(content))) => {
            eprintln!("Error: {}", content);
            Err(structure.into())
        }
        (Some(Err(e)), _) | (_, Some(Err(e))) => Err(e.into()),
        _ => Ok(()),
    }
}
