//! Idempotent resource reconciliation
//!
//! The same shape for every resource kind: look the resource up by
//! name, adopt it when it already exists, otherwise submit the create
//! call and await its operation. Deletes run the pattern in reverse,
//! with absence counting as success. Nothing here retries a submitted
//! call; a failed or timed-out operation fails the step.

use crate::api::ComputeApi;
use crate::error::CloudError;
use crate::operation::OpScope;
use crate::poll::{await_operation, PollOutcome, PollPolicy};
use crate::report::StepOutcome;
use crate::resource::{Address, Firewall, InstanceSpec, NetworkInterface};

/// Explicit lookup outcome. "Not found" is a signal to create, not an
/// error; a genuine fetch error is kept distinct so policy can decide.
#[derive(Debug)]
pub enum Lookup<T> {
    Found(T),
    Absent,
    Failed(CloudError),
}

impl<T> From<crate::error::Result<Option<T>>> for Lookup<T> {
    fn from(result: crate::error::Result<Option<T>>) -> Self {
        match result {
            Ok(Some(value)) => Lookup::Found(value),
            Ok(None) => Lookup::Absent,
            Err(e) => Lookup::Failed(e),
        }
    }
}

/// What to do when a lookup fails with a real error (not "not found").
///
/// `Lenient` reproduces the original behavior: log a warning and
/// proceed to create, which can mask permission or transient errors.
/// `Strict` fails the step instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LookupPolicy {
    #[default]
    Lenient,
    Strict,
}

/// Collapse a lookup per policy: `Ok(Some)` found, `Ok(None)` absent,
/// `Err` either absent-with-warning or a step failure.
fn apply_policy<T>(
    lookup: Lookup<T>,
    policy: LookupPolicy,
    what: &str,
) -> Result<Option<T>, StepOutcome> {
    match lookup {
        Lookup::Found(value) => Ok(Some(value)),
        Lookup::Absent => Ok(None),
        Lookup::Failed(e) => match policy {
            LookupPolicy::Lenient => {
                tracing::warn!("error checking for existing {what}: {e}. Will attempt creation.");
                Ok(None)
            }
            LookupPolicy::Strict => Err(StepOutcome::Failed(format!("lookup failed: {e}"))),
        },
    }
}

/// Result of reserving (or adopting) a static address.
#[derive(Debug)]
pub struct EnsureAddress {
    pub outcome: StepOutcome,
    /// The allocated IP string on success.
    pub ip: Option<String>,
}

/// Reserve a static external IP, or adopt an existing reservation.
pub async fn ensure_address(
    api: &dyn ComputeApi,
    region: &str,
    name: &str,
    lookup: LookupPolicy,
    poll: &PollPolicy,
) -> EnsureAddress {
    let what = format!("static IP address '{name}'");

    let existing = match apply_policy(api.get_address(region, name).await.into(), lookup, &what) {
        Ok(existing) => existing,
        Err(outcome) => return EnsureAddress { outcome, ip: None },
    };

    if let Some(address) = existing {
        tracing::info!(
            "static IP address '{name}' already exists in region {region}: {}",
            address.address.as_deref().unwrap_or("<unassigned>")
        );
        return EnsureAddress {
            outcome: StepOutcome::AlreadyExists { mismatch: false },
            ip: address.address,
        };
    }

    tracing::info!("reserving static IP address '{name}' in region '{region}'...");
    let op = match api.insert_address(region, &Address::reservation(name)).await {
        Ok(op) => op,
        Err(e) => {
            return EnsureAddress {
                outcome: StepOutcome::Failed(e.to_string()),
                ip: None,
            };
        }
    };

    let scope = OpScope::Regional(region.to_string());
    match await_operation(api, &scope, op, poll, "IP reservation").await.0 {
        PollOutcome::Success => {}
        PollOutcome::Failed(details) => {
            return EnsureAddress {
                outcome: StepOutcome::Failed(details),
                ip: None,
            };
        }
        PollOutcome::TimedOut { waited } => {
            return EnsureAddress {
                outcome: StepOutcome::Failed(format!(
                    "timed out after {}s waiting for IP reservation",
                    waited.as_secs()
                )),
                ip: None,
            };
        }
    }

    // Re-fetch to learn the allocated IP string.
    match api.get_address(region, name).await {
        Ok(Some(address)) => {
            tracing::info!(
                "static IP address '{name}' reserved: {}",
                address.address.as_deref().unwrap_or("<unassigned>")
            );
            EnsureAddress {
                outcome: StepOutcome::Created,
                ip: address.address,
            }
        }
        Ok(None) => EnsureAddress {
            outcome: StepOutcome::Failed(format!(
                "address '{name}' missing after reservation completed"
            )),
            ip: None,
        },
        Err(e) => EnsureAddress {
            outcome: StepOutcome::Failed(e.to_string()),
            ip: None,
        },
    }
}

/// Create a VM instance, or adopt an existing one by name.
pub async fn ensure_instance(
    api: &dyn ComputeApi,
    zone: &str,
    spec: &InstanceSpec,
    lookup: LookupPolicy,
    poll: &PollPolicy,
) -> StepOutcome {
    let what = format!("instance '{}'", spec.name);

    let existing = match apply_policy(
        api.get_instance(zone, &spec.name).await.into(),
        lookup,
        &what,
    ) {
        Ok(existing) => existing,
        Err(outcome) => return outcome,
    };

    if existing.is_some() {
        tracing::info!("instance '{}' already exists in zone {zone}", spec.name);
        return StepOutcome::AlreadyExists { mismatch: false };
    }

    tracing::info!("creating instance '{}' in zone '{zone}'...", spec.name);
    let body = spec.build(zone);
    let op = match api.insert_instance(zone, &body).await {
        Ok(op) => op,
        Err(e) => return StepOutcome::Failed(e.to_string()),
    };

    let scope = OpScope::Zonal(zone.to_string());
    match await_operation(api, &scope, op, poll, "instance creation").await.0 {
        PollOutcome::Success => {
            tracing::info!("instance '{}' created", spec.name);
            StepOutcome::Created
        }
        PollOutcome::Failed(details) => StepOutcome::Failed(details),
        PollOutcome::TimedOut { waited } => StepOutcome::Failed(format!(
            "timed out after {}s waiting for instance creation",
            waited.as_secs()
        )),
    }
}

/// Create a firewall rule, or confirm an existing one.
///
/// An existing rule is compared against the desired target tags and
/// protocol:port pairs (order-insensitive). A mismatch is reported as
/// success with the mismatch flagged; the existing rule is never
/// mutated into the new shape.
pub async fn ensure_firewall(
    api: &dyn ComputeApi,
    desired: &Firewall,
    lookup: LookupPolicy,
    poll: &PollPolicy,
) -> StepOutcome {
    let what = format!("firewall rule '{}'", desired.name);

    let existing = match apply_policy(api.get_firewall(&desired.name).await.into(), lookup, &what) {
        Ok(existing) => existing,
        Err(outcome) => return outcome,
    };

    if let Some(existing) = existing {
        let mut existing_tags = existing.target_tags.clone();
        let mut desired_tags = desired.target_tags.clone();
        existing_tags.sort();
        desired_tags.sort();

        if existing_tags == desired_tags && existing.allowed_pairs() == desired.allowed_pairs() {
            tracing::info!(
                "firewall rule '{}' already exists and matches target tags and ports",
                desired.name
            );
            return StepOutcome::AlreadyExists { mismatch: false };
        }

        tracing::warn!(
            "firewall rule '{}' already exists but has different configuration. Manual review recommended.",
            desired.name
        );
        return StepOutcome::AlreadyExists { mismatch: true };
    }

    tracing::info!(
        "creating firewall rule '{}' for tags {:?} allowing {:?}...",
        desired.name,
        desired.target_tags,
        desired.allowed_pairs()
    );
    let op = match api.insert_firewall(desired).await {
        Ok(op) => op,
        Err(e) => return StepOutcome::Failed(e.to_string()),
    };

    match await_operation(api, &OpScope::Global, op, poll, "firewall rule creation").await.0 {
        PollOutcome::Success => {
            tracing::info!("firewall rule '{}' created", desired.name);
            StepOutcome::Created
        }
        PollOutcome::Failed(details) => StepOutcome::Failed(details),
        PollOutcome::TimedOut { waited } => StepOutcome::Failed(format!(
            "timed out after {}s waiting for firewall rule creation",
            waited.as_secs()
        )),
    }
}

/// Bind a reserved static IP to an instance's network interface.
///
/// Read-modify-write: fetch the live instance, find the interface by
/// exact name, reuse its current fingerprint, and replace its
/// access-config list with a single static-IP entry. The window
/// between read and write is unguarded; the tool assumes exclusive
/// control of the instance while provisioning.
pub async fn attach_static_ip(
    api: &dyn ComputeApi,
    zone: &str,
    instance_name: &str,
    interface_name: &str,
    ip: &str,
    poll: &PollPolicy,
) -> StepOutcome {
    tracing::info!(
        "assigning static IP {ip} to instance '{instance_name}' (interface '{interface_name}')..."
    );

    let instance = match api.get_instance(zone, instance_name).await {
        Ok(Some(instance)) => instance,
        Ok(None) => {
            return StepOutcome::Failed(format!("instance '{instance_name}' not found"));
        }
        Err(e) => return StepOutcome::Failed(e.to_string()),
    };

    let Some(nic) = instance
        .network_interfaces
        .iter()
        .find(|nic| nic.name.as_deref() == Some(interface_name))
    else {
        return StepOutcome::Failed(format!(
            "network interface '{interface_name}' not found on instance '{instance_name}'"
        ));
    };

    let update = NetworkInterface {
        name: nic.name.clone(),
        fingerprint: nic.fingerprint.clone(),
        access_configs: vec![crate::resource::AccessConfig::static_ip(ip)],
        ..Default::default()
    };

    let op = match api
        .update_network_interface(zone, instance_name, &update)
        .await
    {
        Ok(op) => op,
        Err(e) => return StepOutcome::Failed(e.to_string()),
    };

    let scope = OpScope::Zonal(zone.to_string());
    match await_operation(api, &scope, op, poll, "IP assignment").await.0 {
        PollOutcome::Success => {
            tracing::info!("static IP {ip} assigned to instance '{instance_name}'");
            StepOutcome::Attached
        }
        PollOutcome::Failed(details) => StepOutcome::Failed(details),
        PollOutcome::TimedOut { waited } => StepOutcome::Failed(format!(
            "timed out after {}s waiting for IP assignment",
            waited.as_secs()
        )),
    }
}

/// Delete an instance; absence is success.
pub async fn delete_instance(
    api: &dyn ComputeApi,
    zone: &str,
    name: &str,
    poll: &PollPolicy,
) -> StepOutcome {
    tracing::info!("deleting instance '{name}' in zone '{zone}'...");

    let op = match api.delete_instance(zone, name).await {
        Ok(Some(op)) => op,
        Ok(None) => {
            tracing::info!("instance '{name}' not found. Considered deleted.");
            return StepOutcome::AlreadyAbsent;
        }
        Err(e) => return StepOutcome::Failed(e.to_string()),
    };

    let scope = OpScope::Zonal(zone.to_string());
    let (outcome, op) = await_operation(api, &scope, op, poll, "instance deletion").await;
    match outcome {
        PollOutcome::Success => {
            tracing::info!("instance '{name}' deleted");
            StepOutcome::Deleted
        }
        PollOutcome::Failed(details) => {
            if op.has_error_code("RESOURCE_IN_USE_BY_ANOTHER_RESOURCE") {
                tracing::info!(
                    "instance may be in use or has dependent resources (like attached disks set to not auto-delete)"
                );
            }
            StepOutcome::Failed(details)
        }
        PollOutcome::TimedOut { waited } => StepOutcome::Failed(format!(
            "timed out after {}s waiting for instance deletion",
            waited.as_secs()
        )),
    }
}

/// Release a static address; absence is success.
pub async fn delete_address(
    api: &dyn ComputeApi,
    region: &str,
    name: &str,
    poll: &PollPolicy,
) -> StepOutcome {
    tracing::info!("deleting static IP address '{name}' in region '{region}'...");

    let op = match api.delete_address(region, name).await {
        Ok(Some(op)) => op,
        Ok(None) => {
            tracing::info!("static IP address '{name}' not found. Considered deleted.");
            return StepOutcome::AlreadyAbsent;
        }
        Err(e) => return StepOutcome::Failed(e.to_string()),
    };

    let scope = OpScope::Regional(region.to_string());
    match await_operation(api, &scope, op, poll, "static IP deletion").await.0 {
        PollOutcome::Success => {
            tracing::info!("static IP address '{name}' deleted");
            StepOutcome::Deleted
        }
        PollOutcome::Failed(details) => StepOutcome::Failed(details),
        PollOutcome::TimedOut { waited } => StepOutcome::Failed(format!(
            "timed out after {}s waiting for static IP deletion",
            waited.as_secs()
        )),
    }
}

/// Delete a firewall rule; absence is success.
pub async fn delete_firewall(
    api: &dyn ComputeApi,
    name: &str,
    poll: &PollPolicy,
) -> StepOutcome {
    tracing::info!("deleting firewall rule '{name}'...");

    let op = match api.delete_firewall(name).await {
        Ok(Some(op)) => op,
        Ok(None) => {
            tracing::info!("firewall rule '{name}' not found. Considered deleted.");
            return StepOutcome::AlreadyAbsent;
        }
        Err(e) => return StepOutcome::Failed(e.to_string()),
    };

    match await_operation(api, &OpScope::Global, op, poll, "firewall rule deletion").await.0 {
        PollOutcome::Success => {
            tracing::info!("firewall rule '{name}' deleted");
            StepOutcome::Deleted
        }
        PollOutcome::Failed(details) => StepOutcome::Failed(details),
        PollOutcome::TimedOut { waited } => StepOutcome::Failed(format!(
            "timed out after {}s waiting for firewall rule deletion",
            waited.as_secs()
        )),
    }
}
