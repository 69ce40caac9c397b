use colored::Colorize;
use zncup_cloud::{run_teardown, PollPolicy, TeardownRequest};
use zncup_gce::GceClient;

use crate::cli::UndeployArgs;
use crate::{output, utils};

pub async fn handle(args: UndeployArgs) -> anyhow::Result<()> {
    if let Err(msg) = utils::validate_project_id(&args.project_id) {
        eprintln!("{} {msg}", "Error:".red().bold());
        std::process::exit(1);
    }

    println!("{}", "--- ZNC Bouncer Undeployment ---".bold());
    println!("Project: {}", args.project_id.cyan());
    println!("Zone: {}", args.zone.cyan());

    let region = match (&args.static_ip_name, &args.region) {
        (Some(_), Some(region)) => {
            println!("Region for static IP: {}", region.cyan());
            Some(region.clone())
        }
        (Some(ip_name), None) => match utils::derive_region(&args.zone) {
            Some(region) => {
                println!(
                    "Derived region '{}' from zone '{}' for static IP deletion",
                    region.cyan(),
                    args.zone.cyan()
                );
                Some(region)
            }
            None => {
                eprintln!(
                    "{} region for static IP '{}' could not be derived from zone '{}'; pass --region",
                    "Error:".red().bold(),
                    ip_name,
                    args.zone
                );
                std::process::exit(1);
            }
        },
        (None, region) => region.clone(),
    };

    let firewall_rule_name =
        (!args.firewall_rule_name.is_empty()).then(|| args.firewall_rule_name.clone());

    println!();
    println!("{}", "--- Planned Actions ---".bold());
    println!(
        "  1. Delete VM instance '{}' in zone '{}'",
        args.instance_name.cyan(),
        args.zone.cyan()
    );
    match (&args.static_ip_name, &region) {
        (Some(ip_name), Some(region)) => println!(
            "  2. Delete static IP '{}' in region '{}'",
            ip_name.cyan(),
            region.cyan()
        ),
        _ => println!("  2. Delete static IP: skipped (no --static-ip-name provided)"),
    }
    match &firewall_rule_name {
        Some(rule) => println!("  3. Delete firewall rule '{}'", rule.cyan()),
        None => println!("  3. Delete firewall rule: skipped (no name provided)"),
    }

    if args.yes {
        println!();
        println!("--yes flag set, bypassing confirmation");
    } else {
        println!();
        println!(
            "{}",
            "This will delete the resources listed above.".yellow()
        );
        if !utils::confirm("Are you sure you want to proceed?")? {
            println!("{}", "Undeployment aborted.".yellow());
            return Ok(());
        }
    }

    let client = GceClient::from_env(args.project_id.clone()).await?;
    let request = TeardownRequest {
        zone: args.zone.clone(),
        instance_name: args.instance_name.clone(),
        static_ip_name: args.static_ip_name.clone(),
        region,
        firewall_rule_name,
    };
    let report = run_teardown(&client, &request, &PollPolicy::default()).await;

    output::print_teardown_summary(&report);
    Ok(())
}
