//! Summary rendering
//!
//! Reports come out of the flows as per-step records; this module is
//! the single place that turns them into console output.

use colored::Colorize;
use zncup_cloud::{DeployReport, StepOutcome, TeardownReport};

use crate::cli::DeployArgs;

fn outcome_line(outcome: &StepOutcome) -> String {
    match outcome {
        StepOutcome::Created => format!("{} created", "✓".green()),
        StepOutcome::AlreadyExists { mismatch: false } => {
            format!("{} already exists, adopted", "✓".green())
        }
        StepOutcome::AlreadyExists { mismatch: true } => format!(
            "{} already exists with a different configuration (left untouched, review manually)",
            "⚠".yellow()
        ),
        StepOutcome::Attached => format!("{} attached", "✓".green()),
        StepOutcome::Deleted => format!("{} deleted", "✓".green()),
        StepOutcome::AlreadyAbsent => format!("{} already absent", "✓".green()),
        StepOutcome::Skipped(reason) => format!("{} skipped ({reason})", "ℹ".blue()),
        StepOutcome::Failed(reason) => format!("{} FAILED: {reason}", "✗".red()),
    }
}

pub fn print_deploy_summary(args: &DeployArgs, report: &DeployReport, had_script: bool) {
    println!();
    println!(
        "{}",
        format!("--- Deployment Summary for '{}' ---", args.instance_name).bold()
    );

    for step in &report.steps {
        println!("  {} '{}': {}", step.resource, step.name, outcome_line(&step.outcome));
    }

    match (&args.static_ip_name, &report.static_ip) {
        (Some(name), Some(ip)) => {
            println!("  IP address: static IP '{}' = {}", name.cyan(), ip.cyan());
        }
        (Some(name), None) => {
            println!(
                "  IP address: static IP '{}' was requested but no address was resolved",
                name.yellow()
            );
        }
        (None, _) => {
            println!(
                "  IP address: ephemeral; check the Cloud Console for the assigned address"
            );
        }
    }

    if had_script {
        println!(
            "  Startup script: provided from '{}'",
            args.startup_script_path.display()
        );
    } else {
        println!(
            "  Startup script: none (no readable file at '{}')",
            args.startup_script_path.display()
        );
    }

    if report.required_ok() {
        println!();
        println!("{}", "NEXT STEPS:".bold());
        println!("  1. Connect to the VM: gcloud compute ssh {} --zone {}", args.instance_name, args.zone);
        println!("  2. Check ZNC status: sudo systemctl status znc.service");
        println!("  3. Check startup script output: sudo cat /var/log/startup-script.log");
        println!("  4. Configure ZNC if the startup script did not: sudo -u zncuser znc --makeconf");
    } else {
        println!();
        println!(
            "{}",
            "✗ Deployment did not complete; see the failures above.".red().bold()
        );
    }
}

pub fn print_teardown_summary(report: &TeardownReport) {
    println!();
    println!("{}", "--- Deprovisioning Summary ---".bold());

    for step in &report.steps {
        if step.name.is_empty() {
            println!("  {}: {}", step.resource, outcome_line(&step.outcome));
        } else {
            println!("  {} '{}': {}", step.resource, step.name, outcome_line(&step.outcome));
        }
    }

    println!();
    if report.all_ok() {
        println!("{}", "✓ Deprovisioning complete.".green().bold());
    } else {
        println!(
            "{}",
            "⚠ Deprovisioning finished with failures; verify the remaining resources in the Cloud Console."
                .yellow()
                .bold()
        );
    }
}
