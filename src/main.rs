//! codedoc - Repository content selection for documentation prompts
//!
//! codedoc provides:
//! - Directory survey with a shared exclusion list
//! - Priority ranking and byte-budgeted file selection
//! - Structural condensing of large code files
//! - Prompt assembly for local directories and remote repositories

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod backends;
mod cli;
mod core;
mod flows;

fn init_logging(verbose: bool, quiet: bool) {
    let level = if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    init_logging(cli.verbose, cli.quiet);
    cli::run(cli)
}
