//! # apigw
//!
//! Command-line toolkit for driving API gateway definitions from CI pipelines.
//!
//! ## Quick Start
//!
//! ```bash
//! # Import a swagger file into the latest version
//! apigw update --name Demo API --file api/swagger.yaml
//!
//! # Branch a new version off the published one
//! apigw create-version --name Demo API
//!
//! # Activate the latest version on staging and wait until it is live
//! apigw activate --name Demo API --network staging --email ops@example.com
//! ```
//!
//! ## Configuration
//!
//! Credentials are read from `~/.edgerc` (override with `--config` or
//! `AKAMAI_EDGERC`), section `default` (override with `--section` or
//! `AKAMAI_EDGERC_SECTION`).

use anyhow::Result;
use apigw_ci::{commands, Cli};
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Main entry point for the apigw CLI
///
/// Parses command-line arguments, sets up logging and delegates to the
/// appropriate command handler. Any error exits with a non-zero status.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.global.verbose);

    let cmd = cli.cmd.unwrap_or_else(|| {
        eprintln!("No command provided. Use --help to see available commands.");
        std::process::exit(1);
    });
    commands::run(&cli.global, cmd).await
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();
}
