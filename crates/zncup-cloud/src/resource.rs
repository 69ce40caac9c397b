//! Wire descriptors for the remote resources this tool manages
//!
//! These mirror the Compute Engine v1 REST representations (camelCase
//! field names, int64 values carried as strings). The program only
//! holds these thin descriptors during a run; the resources themselves
//! live remotely.

use serde::{Deserialize, Serialize};

/// Access-config name the API uses for one-to-one NAT entries.
pub const EXTERNAL_NAT: &str = "External NAT";

/// Network tier for reserved addresses and access configs. Attachment
/// must match the reservation's tier, so both sides use this constant.
pub const NETWORK_TIER: &str = "STANDARD";

/// The default VPC network every resource here lives on.
pub const DEFAULT_NETWORK: &str = "global/networks/default";

/// A reserved regional external IP address.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Address {
    pub name: String,
    /// The allocated IP string, populated by the API once reserved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_tier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl Address {
    /// Reservation body for a new address.
    pub fn reservation(name: &str) -> Self {
        Self {
            name: name.to_string(),
            network_tier: Some(NETWORK_TIER.to_string()),
            ..Default::default()
        }
    }
}

/// A VM instance, as much of it as this tool reads or writes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Instance {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub machine_type: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub disks: Vec<AttachedDisk>,
    pub network_interfaces: Vec<NetworkInterface>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Tags>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AttachedDisk {
    pub boot: bool,
    pub auto_delete: bool,
    #[serde(rename = "type")]
    pub disk_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initialize_params: Option<InitializeParams>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InitializeParams {
    pub source_image: String,
    /// int64 on the wire, encoded as a decimal string.
    pub disk_size_gb: String,
    pub disk_type: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NetworkInterface {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,
    /// Concurrency fingerprint, required when updating the interface.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,
    pub access_configs: Vec<AccessConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AccessConfig {
    pub name: String,
    #[serde(rename = "natIP", skip_serializing_if = "Option::is_none")]
    pub nat_ip: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_tier: Option<String>,
}

impl AccessConfig {
    /// An ephemeral external IP entry (the API allocates the address).
    pub fn ephemeral() -> Self {
        Self {
            name: EXTERNAL_NAT.to_string(),
            nat_ip: None,
            kind: "ONE_TO_ONE_NAT".to_string(),
            network_tier: Some(NETWORK_TIER.to_string()),
        }
    }

    /// An entry binding a reserved static IP.
    pub fn static_ip(ip: &str) -> Self {
        Self {
            nat_ip: Some(ip.to_string()),
            ..Self::ephemeral()
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Tags {
    pub items: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Metadata {
    pub items: Vec<MetadataItem>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MetadataItem {
    pub key: String,
    pub value: String,
}

/// A global firewall rule.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Firewall {
    pub name: String,
    pub network: String,
    pub source_ranges: Vec<String>,
    pub target_tags: Vec<String>,
    pub allowed: Vec<Allowed>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Allowed {
    #[serde(rename = "IPProtocol")]
    pub ip_protocol: String,
    pub ports: Vec<String>,
}

impl Firewall {
    /// Build the rule body from `proto:port` pairs, e.g. `tcp:6697`.
    /// Traffic is allowed from any source toward the target tag.
    pub fn for_tag(name: &str, target_tag: &str, allowed_ports: &[String]) -> Self {
        let allowed = allowed_ports
            .iter()
            .filter_map(|pair| {
                let (proto, port) = pair.split_once(':')?;
                Some(Allowed {
                    ip_protocol: proto.to_ascii_lowercase(),
                    ports: vec![port.to_string()],
                })
            })
            .collect();

        Self {
            name: name.to_string(),
            network: DEFAULT_NETWORK.to_string(),
            source_ranges: vec!["0.0.0.0/0".to_string()],
            target_tags: vec![target_tag.to_string()],
            allowed,
            description: Some("Firewall rule for ZNC bouncer access, created by zncup.".to_string()),
        }
    }

    /// The rule's allowed pairs in `proto:port` form, one entry per
    /// protocol/port combination, for order-insensitive comparison.
    pub fn allowed_pairs(&self) -> Vec<String> {
        let mut pairs: Vec<String> = self
            .allowed
            .iter()
            .flat_map(|a| {
                a.ports
                    .iter()
                    .map(|p| format!("{}:{}", a.ip_protocol, p))
                    .collect::<Vec<_>>()
            })
            .collect();
        pairs.sort();
        pairs
    }
}

/// Everything needed to assemble a VM create body.
///
/// The body is assembled fresh per call because the machine type, disk
/// type and source image are zone- and project-relative URIs.
#[derive(Debug, Clone)]
pub struct InstanceSpec {
    pub name: String,
    pub machine_type: String,
    pub image_project: String,
    pub image_family: String,
    pub disk_size_gb: u32,
    pub disk_type: String,
    /// Emit one ephemeral access config. Off when a static IP will be
    /// attached in a later step instead.
    pub ephemeral_ip: bool,
    pub network_tags: Vec<String>,
    /// Literal startup-script text, passed through untouched.
    pub startup_script: Option<String>,
}

impl InstanceSpec {
    pub fn build(&self, zone: &str) -> Instance {
        let boot_disk = AttachedDisk {
            boot: true,
            auto_delete: true,
            disk_type: "PERSISTENT".to_string(),
            initialize_params: Some(InitializeParams {
                source_image: format!(
                    "projects/{}/global/images/family/{}",
                    self.image_project, self.image_family
                ),
                disk_size_gb: self.disk_size_gb.to_string(),
                disk_type: format!("zones/{}/diskTypes/{}", zone, self.disk_type),
            }),
        };

        let nic = NetworkInterface {
            network: Some(DEFAULT_NETWORK.to_string()),
            access_configs: if self.ephemeral_ip {
                vec![AccessConfig::ephemeral()]
            } else {
                Vec::new()
            },
            ..Default::default()
        };

        Instance {
            name: self.name.clone(),
            machine_type: Some(format!("zones/{}/machineTypes/{}", zone, self.machine_type)),
            disks: vec![boot_disk],
            network_interfaces: vec![nic],
            tags: if self.network_tags.is_empty() {
                None
            } else {
                Some(Tags {
                    items: self.network_tags.clone(),
                })
            },
            metadata: self.startup_script.as_ref().map(|script| Metadata {
                items: vec![MetadataItem {
                    key: "startup-script".to_string(),
                    value: script.clone(),
                }],
            }),
        }
    }
}
