//! Activation of a version on a network
//!
//! An activation is submitted once and then polled through the version's
//! resource detail until the network reports `ACTIVE`:
//!
//! ```text
//! Requested --200--> Polling --ACTIVE--> Active
//!     |                 |  ^
//!     | non-200         |  | wait (poll policy)
//!     v                 v  |
//! RequestFailed      Polling ... --policy exhausted--> TimedOut
//! ```
//!
//! A `FAILED` status does not end polling; it is logged and the next poll
//! follows like any other non-active status.

use tokio::time::sleep;
use tracing::{info, warn};

use crate::client::GatewayApi;
use crate::error::{GatewayError, Result};
use crate::lifecycle::activation_status;
use crate::models::{ActivationRequest, ActivationStatus, Network};
use crate::poll::PollPolicy;

/// The (definition, version, network) triple an activation targets
#[derive(Debug, Clone, Copy)]
pub struct ActivationTarget<'a> {
    pub id: &'a str,
    pub version: &'a str,
    pub network: Network,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivationOutcome {
    /// The network reported `ACTIVE`; `version` is the number it reported,
    /// which may differ from the requested one
    Active { version: String, polls: usize },
    /// The poll policy ran out before the network became active
    TimedOut {
        last_status: ActivationStatus,
        polls: usize,
    },
}

impl ActivationOutcome {
    pub fn is_active(&self) -> bool {
        matches!(self, ActivationOutcome::Active { .. })
    }

    pub fn polls(&self) -> usize {
        match self {
            ActivationOutcome::Active { polls, .. } | ActivationOutcome::TimedOut { polls, .. } => {
                *polls
            }
        }
    }
}

/// Submit the activation request. Anything but 200 is a rejection.
pub async fn submit<A: GatewayApi + ?Sized>(
    api: &A,
    target: ActivationTarget<'_>,
    recipients: &[String],
) -> Result<()> {
    let request = ActivationRequest::new(target.network, recipients);
    let resp = api.activate(target.id, target.version, &request).await?;
    if !resp.is_success() {
        return Err(GatewayError::Rejected {
            operation: "activation",
            status: resp.status,
            body: resp.body,
        });
    }
    Ok(())
}

/// Poll the target network until it reports `ACTIVE` or `policy` gives up
pub async fn wait_until_active<A: GatewayApi + ?Sized>(
    api: &A,
    target: ActivationTarget<'_>,
    policy: &PollPolicy,
) -> Result<ActivationOutcome> {
    let mut handle = policy.handle();
    loop {
        let current = activation_status(api, target.id, target.version, target.network).await?;
        let attempt = handle.polls() + 1;

        if current.status.is_active() {
            let version = current
                .version_number
                .unwrap_or_else(|| target.version.to_string());
            if version != target.version {
                warn!(network = %target.network, requested = target.version, reported = %version,
                    "Network is active on a different version than the one requested");
            }
            return Ok(ActivationOutcome::Active {
                version,
                polls: attempt,
            });
        }

        if current.status == ActivationStatus::Failed {
            warn!(network = %target.network, status = %current.status, attempt,
                "Activation reported as failed, still polling");
        } else {
            info!(network = %target.network, status = %current.status, attempt,
                "Activation status on {}: {}", target.network, current.status);
        }

        match handle.next_delay() {
            Some(delay) => sleep(delay).await,
            None => {
                return Ok(ActivationOutcome::TimedOut {
                    last_status: current.status,
                    polls: handle.polls(),
                })
            }
        }
    }
}

/// Submit, then wait for convergence
pub async fn activate<A: GatewayApi + ?Sized>(
    api: &A,
    target: ActivationTarget<'_>,
    recipients: &[String],
    policy: &PollPolicy,
) -> Result<ActivationOutcome> {
    submit(api, target, recipients).await?;
    wait_until_active(api, target, policy).await
}
