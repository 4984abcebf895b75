use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use tracing::debug;

use crate::client::GatewayClient;
use crate::config::{default_edgerc_path, load_edgerc};
use crate::lifecycle::VersionSelector;
use crate::GlobalArgs;

pub mod activate;
pub mod completions;
pub mod create_version;
pub mod status;
pub mod update;

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(about = "Activate a version on a network and wait until it is live")]
    Activate(activate::ActivateArgs),
    #[command(
        about = "Clone the selected version into a new one, if it is active on any network"
    )]
    CreateVersion(create_version::CreateVersionArgs),
    #[command(about = "Import a Swagger or RAML file into the latest version")]
    Update(update::UpdateArgs),
    #[command(about = "Show resource count and per-network activation status of a version")]
    Status(status::StatusArgs),
    #[command(about = "Emit shell completion scripts")]
    Completions { shell: clap_complete::Shell },
}

pub async fn run(global: &GlobalArgs, cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Activate(args) => activate::run(global, args).await,
        Commands::CreateVersion(args) => create_version::run(global, args).await,
        Commands::Update(args) => update::run(global, args).await,
        Commands::Status(args) => status::run(global, args).await,
        Commands::Completions { shell } => completions::run(shell),
    }
}

/// Target API definition, shared by the gateway commands
#[derive(Args, Debug, Clone)]
pub struct GatewayArgs {
    /// Name of the target API definition; several words are joined with spaces
    #[arg(long, num_args = 1.., required = true)]
    pub name: Vec<String>,
}

impl GatewayArgs {
    pub fn name(&self) -> String {
        self.name.join(" ")
    }
}

/// Version selection, shared by the commands that accept one
#[derive(Args, Debug, Clone)]
pub struct VersionArgs {
    /// Version number to operate on, or "latest"
    #[arg(long, default_value = "latest")]
    pub version: VersionSelector,
}

/// Load credentials and build the signed client used by every step
pub fn connect(global: &GlobalArgs) -> Result<GatewayClient> {
    let path = global.edgerc.clone().unwrap_or_else(default_edgerc_path);
    debug!(
        edgerc = %path.display(),
        section = %global.section,
        "initializing client authentication"
    );
    let creds = load_edgerc(&path, &global.section)?;
    let client = GatewayClient::new(&creds).context("building API client")?;
    debug!(base_url = %client.base_url, "API base URL");
    Ok(client)
}
