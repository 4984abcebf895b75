use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use super::{connect, GatewayArgs, VersionArgs};
use crate::client::GatewayApi;
use crate::error::GatewayError;
use crate::lifecycle::{self, creation_allowed, VersionSelector};
use crate::GlobalArgs;

#[derive(Args, Debug, Clone)]
pub struct CreateVersionArgs {
    #[command(flatten)]
    pub gateway: GatewayArgs,
    #[command(flatten)]
    pub version: VersionArgs,
}

pub async fn run(global: &GlobalArgs, args: CreateVersionArgs) -> Result<()> {
    let client = connect(global)?;
    create_from(&client, &args.gateway.name(), &args.version.version).await
}

/// Clone the selected version of `name`, provided some network runs it
///
/// Nothing is created, and the call succeeds, when no network reports the
/// selected version.
pub async fn create_from<A: GatewayApi + ?Sized>(
    api: &A,
    name: &str,
    selector: &VersionSelector,
) -> Result<()> {
    let id = lifecycle::locate(api, name)
        .await
        .with_context(|| format!("no API definition could be found with the name '{name}'"))?;

    let resolved = lifecycle::resolve(api, &id, selector).await?;
    let api_name = resolved.gateway_name.unwrap_or_else(|| name.to_string());
    let version = resolved.number;
    info!("Checking activation status for {api_name} version: {version}");

    let states = lifecycle::network_states(api, &id, &version).await?;
    for s in &states {
        info!(
            "{} network status: {} version: {} (current version: {}).",
            s.network,
            s.current.status,
            s.current.version_number.as_deref().unwrap_or("none"),
            version
        );
    }

    if !creation_allowed(&version, &states) {
        info!(
            "The {api_name} API Definition version {version} is not active in any network. Skipping create step."
        );
        println!("⚪ `{api_name}` version {version} is not active anywhere, nothing created");
        return Ok(());
    }

    info!("Creating new API version for {api_name}. Based off version: {version}");
    let resp = lifecycle::create_version(api, &id, &version)
        .await
        .context("creating new API endpoint version")?;
    if !resp.is_success() {
        return Err(GatewayError::Rejected {
            operation: "version clone",
            status: resp.status,
            body: resp.body,
        }
        .into());
    }

    let (new_version, latest_name) = lifecycle::resolve_latest(api, &id).await?;
    info!("Created new {latest_name} API endpoint version: {new_version}");
    println!("✅ created `{latest_name}` version {new_version} from version {version}");
    Ok(())
}
