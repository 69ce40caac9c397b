use clap::Parser;
use std::path::PathBuf;

use crate::PLACEHOLDER_PROJECT_ID;

/// Provision a ZNC bouncer VM on Google Compute Engine.
#[derive(Parser, Debug)]
#[command(name = "znc-deploy")]
#[command(about = "Deploy a ZNC bouncer VM with a static IP and firewall rule", long_about = None)]
pub struct DeployArgs {
    /// Google Cloud project ID
    #[arg(long, default_value = PLACEHOLDER_PROJECT_ID)]
    pub project_id: String,

    /// Compute zone for the VM (e.g. us-west1-a)
    #[arg(long, default_value = "us-west1-a")]
    pub zone: String,

    /// Region for the static IP; derived from the zone when omitted
    #[arg(long)]
    pub region: Option<String>,

    /// Name of the VM instance
    #[arg(long, default_value = "znc-bouncer-vm")]
    pub instance_name: String,

    /// Machine type for the VM
    #[arg(long, default_value = "e2-micro")]
    pub machine_type: String,

    /// Project hosting the boot image
    #[arg(long, default_value = "debian-cloud")]
    pub image_project: String,

    /// Image family for the boot disk
    #[arg(long, default_value = "debian-11")]
    pub image_family: String,

    /// Boot disk size in GB
    #[arg(long, default_value_t = 10)]
    pub disk_size_gb: u32,

    /// Boot disk type
    #[arg(long, default_value = "pd-balanced")]
    pub disk_type: String,

    /// Local startup script file; a missing file is a warning, not fatal
    #[arg(long, default_value = "startup-script.sh")]
    pub startup_script_path: PathBuf,

    /// Reserve and attach a static IP with this name; omit for an
    /// ephemeral IP
    #[arg(long)]
    pub static_ip_name: Option<String>,

    /// Network tag applied to the VM and targeted by the firewall rule
    #[arg(long, default_value = "znc-bouncer-node")]
    pub network_tag: String,

    /// Name of the firewall rule to create
    #[arg(long, default_value = "allow-znc-access")]
    pub firewall_rule_name: String,

    /// ZNC listener port, opened as tcp:<port>
    #[arg(long, default_value_t = 6697)]
    pub znc_port: u16,
}

/// Tear down the ZNC bouncer VM and its associated resources.
#[derive(Parser, Debug)]
#[command(name = "znc-undeploy")]
#[command(about = "Delete the ZNC bouncer VM, its static IP and firewall rule", long_about = None)]
pub struct UndeployArgs {
    /// Google Cloud project ID
    #[arg(long, default_value = PLACEHOLDER_PROJECT_ID)]
    pub project_id: String,

    /// Compute zone of the VM instance (e.g. us-west1-a)
    #[arg(long)]
    pub zone: String,

    /// Name of the VM instance to delete
    #[arg(long, default_value = "znc-bouncer-vm")]
    pub instance_name: String,

    /// Static IP to release; omit to skip the step
    #[arg(long)]
    pub static_ip_name: Option<String>,

    /// Region of the static IP; derived from the zone when omitted
    #[arg(long)]
    pub region: Option<String>,

    /// Firewall rule to delete
    #[arg(long, default_value = "allow-znc-access")]
    pub firewall_rule_name: String,

    /// Bypass the interactive confirmation prompt
    #[arg(long)]
    pub yes: bool,
}
