//! Per-step result records
//!
//! Every resource step appends one record instead of threading result
//! flags through the flow; the CLI renders a summary from the finished
//! report in one place.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    StaticAddress,
    Instance,
    FirewallRule,
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceKind::StaticAddress => f.write_str("static IP"),
            ResourceKind::Instance => f.write_str("instance"),
            ResourceKind::FirewallRule => f.write_str("firewall rule"),
        }
    }
}

/// What happened to a single resource step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepOutcome {
    Created,
    /// Found and adopted as-is; `mismatch` marks a firewall rule whose
    /// existing shape differs from the desired one (never reconciled,
    /// flagged for manual review).
    AlreadyExists { mismatch: bool },
    /// Static IP bound to the instance's network interface.
    Attached,
    Deleted,
    AlreadyAbsent,
    Skipped(String),
    Failed(String),
}

impl StepOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, StepOutcome::Failed(_))
    }
}

/// One resource step's record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepReport {
    pub resource: ResourceKind,
    pub name: String,
    /// Required steps halt the enclosing flow on failure; the rest are
    /// recorded and the flow continues.
    pub required: bool,
    pub outcome: StepOutcome,
}

/// Accumulated result of a provisioning run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeployReport {
    pub steps: Vec<StepReport>,
    /// The reserved static IP string, when one was requested and
    /// successfully resolved.
    pub static_ip: Option<String>,
}

impl DeployReport {
    pub fn push(&mut self, step: StepReport) {
        self.steps.push(step);
    }

    /// True when no required step failed. Non-fatal failures (firewall
    /// rule, IP attachment) do not clear this.
    pub fn required_ok(&self) -> bool {
        !self.steps.iter().any(|s| s.required && s.outcome.is_failure())
    }

    pub fn step(&self, resource: ResourceKind) -> Option<&StepReport> {
        self.steps.iter().find(|s| s.resource == resource)
    }
}

/// Accumulated result of a deprovisioning run. All steps are always
/// attempted; none aborts the others.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TeardownReport {
    pub steps: Vec<StepReport>,
}

impl TeardownReport {
    pub fn push(&mut self, step: StepReport) {
        self.steps.push(step);
    }

    pub fn all_ok(&self) -> bool {
        !self.steps.iter().any(|s| s.outcome.is_failure())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_failure_clears_required_ok() {
        let mut report = DeployReport::default();
        report.push(StepReport {
            resource: ResourceKind::Instance,
            name: "vm1".to_string(),
            required: true,
            outcome: StepOutcome::Failed("boom".to_string()),
        });
        assert!(!report.required_ok());
    }

    #[test]
    fn optional_failure_keeps_required_ok() {
        let mut report = DeployReport::default();
        report.push(StepReport {
            resource: ResourceKind::Instance,
            name: "vm1".to_string(),
            required: true,
            outcome: StepOutcome::Created,
        });
        report.push(StepReport {
            resource: ResourceKind::FirewallRule,
            name: "allow-znc-access".to_string(),
            required: false,
            outcome: StepOutcome::Failed("quota".to_string()),
        });
        assert!(report.required_ok());
    }
}
