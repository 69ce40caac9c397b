use colored::Colorize;
use zncup_cloud::{run_deploy, DeployRequest, InstanceSpec, LookupPolicy, PollPolicy};
use zncup_gce::GceClient;

use crate::cli::DeployArgs;
use crate::{output, utils};

fn instance_spec(args: &DeployArgs, startup_script: Option<String>) -> InstanceSpec {
    InstanceSpec {
        name: args.instance_name.clone(),
        machine_type: args.machine_type.clone(),
        image_project: args.image_project.clone(),
        image_family: args.image_family.clone(),
        disk_size_gb: args.disk_size_gb,
        disk_type: args.disk_type.clone(),
        // The static IP is attached after creation; only ask for an
        // ephemeral address when none was reserved.
        ephemeral_ip: args.static_ip_name.is_none(),
        // An explicitly empty tag means no tags at all; the firewall
        // step then has nothing to target and is skipped downstream.
        network_tags: if args.network_tag.is_empty() {
            Vec::new()
        } else {
            vec![args.network_tag.clone()]
        },
        startup_script,
    }
}

pub async fn handle(args: DeployArgs) -> anyhow::Result<()> {
    if let Err(msg) = utils::validate_project_id(&args.project_id) {
        eprintln!("{} {msg}", "Error:".red().bold());
        std::process::exit(1);
    }

    let region = match args
        .region
        .clone()
        .or_else(|| utils::derive_region(&args.zone))
    {
        Some(region) => region,
        None => {
            eprintln!(
                "{} could not derive a region from zone '{}'; pass --region explicitly",
                "Error:".red().bold(),
                args.zone
            );
            std::process::exit(1);
        }
    };

    println!("{}", "--- ZNC Bouncer Deployment ---".bold());
    println!("Project: {}", args.project_id.cyan());
    println!("Zone: {} (region {})", args.zone.cyan(), region.cyan());
    println!("Instance: {}", args.instance_name.cyan());
    match &args.static_ip_name {
        Some(name) => println!("Static IP: {}", name.cyan()),
        None => println!("Static IP: none (ephemeral address)"),
    }
    println!();

    let startup_script = utils::read_startup_script(&args.startup_script_path);
    let had_script = startup_script.is_some();

    let instance = instance_spec(&args, startup_script);

    let request = DeployRequest {
        zone: args.zone.clone(),
        region,
        instance,
        static_ip_name: args.static_ip_name.clone(),
        firewall_rule_name: (!args.firewall_rule_name.is_empty())
            .then(|| args.firewall_rule_name.clone()),
        allowed_ports: vec![format!("tcp:{}", args.znc_port)],
        lookup: LookupPolicy::Lenient,
    };

    let client = GceClient::from_env(args.project_id.clone()).await?;
    let report = run_deploy(&client, &request, &PollPolicy::default()).await;

    output::print_deploy_summary(&args, &report, had_script);

    if !report.required_ok() {
        std::process::exit(1);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn empty_network_tag_means_no_tags() {
        let args = DeployArgs::parse_from(["znc-deploy", "--network-tag", ""]);
        let spec = instance_spec(&args, None);
        assert!(spec.network_tags.is_empty());
    }

    #[test]
    fn network_tag_is_carried_into_the_spec() {
        let args = DeployArgs::parse_from(["znc-deploy"]);
        let spec = instance_spec(&args, None);
        assert_eq!(spec.network_tags, vec!["znc-bouncer-node".to_string()]);
        assert!(spec.ephemeral_ip);
    }

    #[test]
    fn static_ip_suppresses_the_ephemeral_config() {
        let args = DeployArgs::parse_from(["znc-deploy", "--static-ip-name", "ip1"]);
        let spec = instance_spec(&args, None);
        assert!(!spec.ephemeral_ip);
    }
}
