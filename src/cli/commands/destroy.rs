use anyhow::Result;
use std::io::{self, Write};

use super::helpers::{build_arm_client, poll_config, resolve_environment, resolve_names};
use crate::cli::config::try_load_config;
use crate::cli::DestroyArgs;
use crate::repro::{self, DeleteOutcome};

pub async fn execute_destroy(args: DestroyArgs) -> Result<()> {
    let config = try_load_config()?;
    let names = resolve_names(args.target.prefix, &config)?;
    let env = resolve_environment(args.target.cloud, &config)?;
    let arm = build_arm_client(&env, poll_config(10, args.timeout_mins))?;

    eprintln!("==> Destroying resources for prefix: {}", names.prefix);
    eprintln!();

    if !args.force {
        eprintln!("This will delete:");
        eprintln!(
            "  - Resource group: {} (including everything in it)",
            names.resource_group
        );
        eprintln!("  - Storage account: {}", names.storage_account);
        eprintln!("  - Classic container registry: {}", names.registry);
        eprintln!();
        eprint!("Are you sure? (yes/no): ");
        io::stderr().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        if input.trim() != "yes" {
            eprintln!("Aborted.");
            return Ok(());
        }
    }

    let report = repro::teardown(&arm, &names).await;

    for step in &report.steps {
        match &step.outcome {
            DeleteOutcome::Deleted => eprintln!("    {} {}: deleted", step.kind.label(), step.name),
            DeleteOutcome::AlreadyGone => {
                eprintln!("    {} {}: does not exist (skipping)", step.kind.label(), step.name)
            }
            DeleteOutcome::Failed(e) => {
                eprintln!("    {} {}: failed: {}", step.kind.label(), step.name, e)
            }
        }
    }

    eprintln!("\n==========================================");
    if report.is_clean() {
        eprintln!("[ok] Destroy complete");
    } else {
        eprintln!(
            "[warn] Destroy finished with {} failure(s)",
            report.failures().count()
        );
    }
    eprintln!("==========================================\n");

    Ok(())
}
