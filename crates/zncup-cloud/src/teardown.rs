//! Deprovisioning flow
//!
//! Instance first (it may hold the static IP's access config), then
//! the static IP, then the firewall rule. Every step is attempted
//! regardless of earlier failures; "already absent" is the desired end
//! state and counts as success.

use crate::api::ComputeApi;
use crate::poll::PollPolicy;
use crate::reconcile::{delete_address, delete_firewall, delete_instance};
use crate::report::{ResourceKind, StepOutcome, StepReport, TeardownReport};

/// Everything a deprovisioning run needs.
#[derive(Debug, Clone)]
pub struct TeardownRequest {
    pub zone: String,
    pub instance_name: String,
    /// Release this static IP; `None` skips the step.
    pub static_ip_name: Option<String>,
    /// Region of the static IP; must accompany `static_ip_name`.
    pub region: Option<String>,
    /// Delete this firewall rule; `None` skips the step.
    pub firewall_rule_name: Option<String>,
}

pub async fn run_teardown(
    api: &dyn ComputeApi,
    request: &TeardownRequest,
    poll: &PollPolicy,
) -> TeardownReport {
    let mut report = TeardownReport::default();

    let outcome = delete_instance(api, &request.zone, &request.instance_name, poll).await;
    report.push(StepReport {
        resource: ResourceKind::Instance,
        name: request.instance_name.clone(),
        required: false,
        outcome,
    });

    if let Some(ip_name) = &request.static_ip_name {
        let outcome = match &request.region {
            Some(region) => delete_address(api, region, ip_name, poll).await,
            None => StepOutcome::Failed(format!(
                "region for static IP '{ip_name}' could not be determined"
            )),
        };
        report.push(StepReport {
            resource: ResourceKind::StaticAddress,
            name: ip_name.clone(),
            required: false,
            outcome,
        });
    } else {
        report.push(StepReport {
            resource: ResourceKind::StaticAddress,
            name: String::new(),
            required: false,
            outcome: StepOutcome::Skipped("no static IP name provided".to_string()),
        });
    }

    if let Some(rule_name) = &request.firewall_rule_name {
        let outcome = delete_firewall(api, rule_name, poll).await;
        report.push(StepReport {
            resource: ResourceKind::FirewallRule,
            name: rule_name.clone(),
            required: false,
            outcome,
        });
    } else {
        report.push(StepReport {
            resource: ResourceKind::FirewallRule,
            name: String::new(),
            required: false,
            outcome: StepOutcome::Skipped("no firewall rule name provided".to_string()),
        });
    }

    report
}
