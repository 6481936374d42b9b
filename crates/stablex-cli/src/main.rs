//! Stablex CLI
//!
//! Command-line interface for the tutorial output stability harness

use clap::{Parser, Subcommand};
use stablex_core::logging_facility::{init, Profile};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "stablex")]
#[command(about = "Stablex - tutorial output regression checks", long_about = None)]
struct Cli {
    /// Log profile: dev, prod (JSON) or test (silent)
    #[arg(long, global = true, default_value = "dev", value_parser = parse_profile)]
    log: Profile,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Compare a fresh run against the stored baseline
    Check(commands::check::CheckArgs),
    /// Regenerate the baseline from a fresh run
    Export(commands::export::ExportArgs),
    /// List the keys and element kinds of a baseline archive
    Inspect(commands::inspect::InspectArgs),
}

fn parse_profile(name: &str) -> Result<Profile, String> {
    Profile::from_name(name).ok_or_else(|| format!("unknown log profile '{}'", name))
}

fn main() {
    let cli = Cli::parse();
    init(cli.log);

    let result = match cli.command {
        Commands::Check(args) => commands::check::execute(args),
        Commands::Export(args) => commands::export::execute(args),
        Commands::Inspect(args) => commands::inspect::execute(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
