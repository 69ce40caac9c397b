//! Provisioning flow
//!
//! A fixed sequence of at most four steps, strictly one after another:
//! reserve the static IP (when requested), create the VM, attach the
//! static IP, ensure the firewall rule. The static IP and the VM are
//! required; a failure there halts the run. Attachment and firewall
//! failures are recorded and the flow continues.

use crate::api::ComputeApi;
use crate::poll::PollPolicy;
use crate::reconcile::{
    attach_static_ip, ensure_address, ensure_firewall, ensure_instance, LookupPolicy,
};
use crate::report::{DeployReport, ResourceKind, StepOutcome, StepReport};
use crate::resource::{Firewall, InstanceSpec};

/// Network interface the static IP is bound to.
pub const DEFAULT_INTERFACE: &str = "nic0";

/// Everything a provisioning run needs.
#[derive(Debug, Clone)]
pub struct DeployRequest {
    pub zone: String,
    /// Region for the static IP reservation.
    pub region: String,
    pub instance: InstanceSpec,
    /// Reserve and attach this static IP; `None` means the instance
    /// gets an ephemeral address at creation instead.
    pub static_ip_name: Option<String>,
    /// Firewall rule name and `proto:port` pairs to allow. Skipped
    /// when the instance has no network tags to target.
    pub firewall_rule_name: Option<String>,
    pub allowed_ports: Vec<String>,
    pub lookup: LookupPolicy,
}

pub async fn run_deploy(
    api: &dyn ComputeApi,
    request: &DeployRequest,
    poll: &PollPolicy,
) -> DeployReport {
    let mut report = DeployReport::default();

    // Step 1: reserve (or adopt) the static IP.
    if let Some(ip_name) = &request.static_ip_name {
        let result = ensure_address(api, &request.region, ip_name, request.lookup, poll).await;
        let failed = result.outcome.is_failure() || result.ip.is_none();
        report.static_ip = result.ip;
        report.push(StepReport {
            resource: ResourceKind::StaticAddress,
            name: ip_name.clone(),
            required: true,
            outcome: if result.outcome.is_failure() {
                result.outcome
            } else if report.static_ip.is_none() {
                StepOutcome::Failed(format!("no IP string resolved for '{ip_name}'"))
            } else {
                result.outcome
            },
        });
        if failed {
            return report;
        }
    }

    // Step 2: create the VM. Ephemeral access config only when no
    // static IP will be attached afterwards.
    let outcome = ensure_instance(api, &request.zone, &request.instance, request.lookup, poll).await;
    let instance_failed = outcome.is_failure();
    report.push(StepReport {
        resource: ResourceKind::Instance,
        name: request.instance.name.clone(),
        required: true,
        outcome,
    });
    if instance_failed {
        // A reserved static IP stays reserved; it is not rolled back.
        return report;
    }

    // Step 3: bind the static IP to the instance's interface.
    if let (Some(ip_name), Some(ip)) = (&request.static_ip_name, report.static_ip.clone()) {
        let outcome = attach_static_ip(
            api,
            &request.zone,
            &request.instance.name,
            DEFAULT_INTERFACE,
            &ip,
            poll,
        )
        .await;
        report.push(StepReport {
            resource: ResourceKind::StaticAddress,
            name: ip_name.clone(),
            required: false,
            outcome,
        });
    }

    // Step 4: firewall rule, targeting the instance's network tags.
    match (&request.firewall_rule_name, request.instance.network_tags.first()) {
        (Some(rule_name), Some(tag)) => {
            let desired = Firewall::for_tag(rule_name, tag, &request.allowed_ports);
            let outcome = ensure_firewall(api, &desired, request.lookup, poll).await;
            report.push(StepReport {
                resource: ResourceKind::FirewallRule,
                name: rule_name.clone(),
                required: false,
                outcome,
            });
        }
        (Some(rule_name), None) => {
            tracing::warn!(
                "firewall rule '{rule_name}' skipped: no network tag to target"
            );
            report.push(StepReport {
                resource: ResourceKind::FirewallRule,
                name: rule_name.clone(),
                required: false,
                outcome: StepOutcome::Skipped("no network tag to target".to_string()),
            });
        }
        (None, _) => {}
    }

    report
}
