use anyhow::{bail, Context, Result};
use clap::Args;
use std::time::Duration;
use tracing::info;

use super::{connect, GatewayArgs, VersionArgs};
use crate::activation::{self, ActivationOutcome, ActivationTarget};
use crate::client::GatewayApi;
use crate::constants::{DEFAULT_POLL_INTERVAL, DEFAULT_POLL_TIMEOUT};
use crate::lifecycle::{self, VersionSelector};
use crate::models::Network;
use crate::poll::{Backoff, PollPolicy};
use crate::GlobalArgs;

#[derive(Args, Debug, Clone)]
pub struct ActivateArgs {
    #[command(flatten)]
    pub gateway: GatewayArgs,
    #[command(flatten)]
    pub version: VersionArgs,
    /// Target network (staging or production)
    #[arg(long, default_value = "staging")]
    pub network: Network,
    /// Comma-separated list of e-mails that receive activation notifications
    #[arg(long, value_delimiter = ',', required = true)]
    pub email: Vec<String>,
    #[command(flatten)]
    pub poll: PollArgs,
}

#[derive(Args, Debug, Clone)]
pub struct PollArgs {
    /// Seconds between activation status polls, at least 1
    #[arg(
        long,
        default_value_t = DEFAULT_POLL_INTERVAL.as_secs(),
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub poll_interval: u64,
    /// Keep the interval fixed, or double it after every poll
    #[arg(long, value_enum, default_value_t = BackoffArg::Fixed)]
    pub backoff: BackoffArg,
    /// Upper bound in seconds for exponential backoff delays
    #[arg(long)]
    pub max_interval: Option<u64>,
    /// Give up after this many status polls
    #[arg(long)]
    pub max_polls: Option<usize>,
    /// Give up after this many seconds; 0 waits until the activation is live
    #[arg(long, default_value_t = DEFAULT_POLL_TIMEOUT.as_secs())]
    pub timeout: u64,
}

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackoffArg {
    Fixed,
    Exponential,
}

impl PollArgs {
    pub fn policy(&self) -> PollPolicy {
        let backoff = match self.backoff {
            BackoffArg::Fixed => Backoff::Fixed,
            BackoffArg::Exponential => Backoff::Exponential,
        };
        PollPolicy::new(backoff, Duration::from_secs(self.poll_interval))
            .with_max_interval(self.max_interval.map(Duration::from_secs))
            .with_max_polls(self.max_polls)
            .with_time_budget(Some(Duration::from_secs(self.timeout)))
    }
}

pub async fn run(global: &GlobalArgs, args: ActivateArgs) -> Result<()> {
    let recipients: Vec<String> = args
        .email
        .iter()
        .map(|e| e.trim().to_string())
        .filter(|e| !e.is_empty())
        .collect();
    if recipients.is_empty() {
        bail!("--email needs at least one address");
    }

    let client = connect(global)?;
    activate_definition(
        &client,
        &args.gateway.name(),
        &args.version.version,
        args.network,
        &recipients,
        &args.poll.policy(),
    )
    .await
}

/// Locate `name`, resolve the selected version and activate it on `network`
///
/// Fails when the activation is refused or the poll policy runs out before
/// the network reports `ACTIVE`.
pub async fn activate_definition<A: GatewayApi + ?Sized>(
    api: &A,
    name: &str,
    selector: &VersionSelector,
    network: Network,
    recipients: &[String],
    policy: &PollPolicy,
) -> Result<()> {
    let id = lifecycle::locate(api, name)
        .await
        .with_context(|| format!("no API definition could be found with the name '{name}'"))?;

    let resolved = lifecycle::resolve(api, &id, selector).await?;
    let api_name = resolved.gateway_name.unwrap_or_else(|| name.to_string());
    let requested = resolved.number;
    info!(
        "Activating API Definition version: {} on network: {} for API Definition: {}.",
        requested, network, api_name
    );

    let target = ActivationTarget {
        id: &id,
        version: &requested,
        network,
    };
    let outcome = activation::activate(api, target, recipients, policy)
        .await
        .context("Error occurred during activation!")?;

    match outcome {
        ActivationOutcome::Active { version, polls } => {
            info!(
                polls,
                "API Definition version {version} is now active for API Definition: {api_name}."
            );
            if version == requested {
                println!("✅ `{api_name}` version {version} is active on {network}");
            } else {
                println!(
                    "✅ `{api_name}` version {version} is active on {network} (requested version {requested})"
                );
            }
            Ok(())
        }
        ActivationOutcome::TimedOut { last_status, polls } => bail!(
            "activation of `{}` version {} on {} did not complete after {} polls (last status: {})",
            api_name,
            requested,
            network,
            polls,
            last_status
        ),
    }
}
