//! igsnap CLI - Instagram media snapshots.
//!
//! Provides commands for:
//! - `fetch`: Fetch the media listing and write the current snapshot and a backup
//! - `show`: Summarize a stored snapshot

mod commands;
mod error;
mod output;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{FetchArgs, ShowArgs};
use error::CliError;
use output::Output;

/// igsnap - Instagram media snapshots.
#[derive(Parser)]
#[command(name = "igsnap", version, about)]
struct Cli {
    /// Log debug output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log warnings and errors only.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch media and save the current snapshot plus a timestamped backup.
    Fetch(FetchArgs),
    /// Summarize a stored snapshot.
    Show(ShowArgs),
}

impl Commands {
    fn execute(self) -> Result<(), CliError> {
        match self {
            Self::Fetch(args) => args.execute(),
            Self::Show(args) => args.execute(),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose/--quiet win over RUST_LOG, which wins over the info default
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else if cli.quiet {
        EnvFilter::new("warn")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();

    // Scoped to this run rather than installed process-wide
    let result = tracing::subscriber::with_default(subscriber, || cli.command.execute());

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            output.error(&format!("Error: {err}"));
            ExitCode::FAILURE
        }
    }
}
