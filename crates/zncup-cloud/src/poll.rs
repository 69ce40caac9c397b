//! Operation polling
//!
//! One generic submit-then-await-terminal routine shared by every
//! mutating call site. Waiting is synchronous from the caller's point
//! of view: a fixed sleep between polls, no backoff, no jitter, and no
//! exit other than a terminal status, an error payload, or the
//! scope-specific ceiling.

use crate::api::ComputeApi;
use crate::operation::{OpScope, OpStatus, Operation};
use std::time::Duration;
use tokio::time::Instant;

/// Fixed-interval polling parameters with per-scope ceilings.
#[derive(Debug, Clone)]
pub struct PollPolicy {
    pub interval: Duration,
    /// Instance create/delete and interface updates.
    pub zonal_ceiling: Duration,
    /// Address reservation and release.
    pub regional_ceiling: Duration,
    /// Firewall rule create/delete.
    pub global_ceiling: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            zonal_ceiling: Duration::from_secs(600),
            regional_ceiling: Duration::from_secs(300),
            global_ceiling: Duration::from_secs(300),
        }
    }
}

impl PollPolicy {
    pub fn ceiling(&self, scope: &OpScope) -> Duration {
        match scope {
            OpScope::Zonal(_) => self.zonal_ceiling,
            OpScope::Regional(_) => self.regional_ceiling,
            OpScope::Global => self.global_ceiling,
        }
    }
}

/// Terminal result of waiting on an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    Success,
    Failed(String),
    TimedOut { waited: Duration },
}

impl PollOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, PollOutcome::Success)
    }
}

/// Block until `op` reaches a terminal state or the scope ceiling
/// passes, re-fetching its status at a fixed interval.
///
/// `what` names the operation in progress lines ("instance creation",
/// "IP reservation", ...). A status-fetch error mid-poll is folded
/// into `Failed`; the create/delete call itself is never retried.
/// Returns the final operation alongside the outcome so callers can
/// inspect error codes.
pub async fn await_operation(
    api: &dyn ComputeApi,
    scope: &OpScope,
    mut op: Operation,
    policy: &PollPolicy,
    what: &str,
) -> (PollOutcome, Operation) {
    let ceiling = policy.ceiling(scope);
    let started = Instant::now();

    while op.status != OpStatus::Done {
        tokio::time::sleep(policy.interval).await;

        op = match api.get_operation(scope, &op.name).await {
            Ok(refreshed) => refreshed,
            Err(e) => {
                tracing::warn!("failed to fetch status of {what} operation: {e}");
                return (PollOutcome::Failed(e.to_string()), op);
            }
        };

        let elapsed = started.elapsed();
        tracing::info!(
            "waiting for {what} operation ({})... status: {} (elapsed: {}s)",
            scope,
            op.status,
            elapsed.as_secs()
        );

        if elapsed > ceiling {
            tracing::error!("timeout waiting for {what} operation after {}s", elapsed.as_secs());
            return (PollOutcome::TimedOut { waited: elapsed }, op);
        }
    }

    if let Some(details) = op.error_details() {
        tracing::error!("{what} operation finished with error: {details}");
        return (PollOutcome::Failed(details), op);
    }

    (PollOutcome::Success, op)
}
