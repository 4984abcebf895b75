use anyhow::{Context, Result};
use clap::Args;

use super::{connect, GatewayArgs, VersionArgs};
use crate::lifecycle;
use crate::models::Network;
use crate::GlobalArgs;

#[derive(Args, Debug, Clone)]
pub struct StatusArgs {
    #[command(flatten)]
    pub gateway: GatewayArgs,
    #[command(flatten)]
    pub version: VersionArgs,
}

pub async fn run(global: &GlobalArgs, args: StatusArgs) -> Result<()> {
    let client = connect(global)?;
    let name = args.gateway.name();
    let id = lifecycle::locate(&client, &name)
        .await
        .with_context(|| format!("no API definition could be found with the name '{name}'"))?;
    let resolved = lifecycle::resolve(&client, &id, &args.version.version).await?;
    let api_name = resolved.gateway_name.unwrap_or(name);

    let detail = lifecycle::fetch_detail(&client, &id, &resolved.number).await?;
    println!(
        "{} (id {}) version {}: {} resources",
        api_name,
        id,
        resolved.number,
        detail.resource_count()
    );
    for network in Network::ALL {
        let current = detail.network(network);
        let marker = match current.version_number.as_deref() {
            Some(v) if v == resolved.number && current.status.is_active() => "✔️ ",
            _ => "  ",
        };
        println!(
            "{} {:<10} status={} version={}",
            marker,
            network,
            current.status,
            current.version_number.as_deref().unwrap_or("-")
        );
    }
    Ok(())
}
