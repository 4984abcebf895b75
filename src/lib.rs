//! # API Gateway CI Library
//!
//! Core library functionality for the `apigw` CLI: locating API definitions,
//! branching and importing versions, and activating them on a network.

use clap::{Args, Parser};
use std::path::PathBuf;

pub mod activation;
pub mod auth;
pub mod client;
pub mod commands;
pub mod config;
pub mod constants;
pub mod error;
pub mod format;
pub mod lifecycle;
pub mod models;
pub mod poll;

/// CI toolkit for API gateway definitions
///
/// Imports Swagger or RAML files into API gateway definition versions, creates
/// new versions from published ones, and activates versions on the staging or
/// production network, waiting until the activation is live.
#[derive(Parser, Debug)]
#[command(
    name = "apigw",
    version,
    about = "CI toolkit for API gateway definitions",
    long_about = "Command-line toolkit for driving API gateway definitions from CI pipelines.\n\nImports Swagger or RAML definition files, branches new versions off published ones,\nand activates versions on staging or production while waiting for the activation to go live."
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,
    #[command(subcommand)]
    pub cmd: Option<commands::Commands>,
}

/// Options shared by every subcommand
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Full or relative path to the .edgerc credentials file [default: ~/.edgerc]
    #[arg(long = "config", env = "AKAMAI_EDGERC", global = true)]
    pub edgerc: Option<PathBuf>,
    /// Section of the .edgerc file holding the API credentials
    #[arg(
        long,
        env = "AKAMAI_EDGERC_SECTION",
        default_value = constants::DEFAULT_EDGERC_SECTION,
        global = true
    )]
    pub section: String,
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}
