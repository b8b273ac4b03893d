use anyhow::{bail, Result};

use super::helpers::{
    build_arm_client, poll_config, resolve_environment, resolve_location, resolve_names,
};
use crate::cli::config::try_load_config;
use crate::cli::RunArgs;
use crate::repro::{self, DeleteOutcome, Linkage, ReproSettings};

pub async fn execute_run(args: RunArgs) -> Result<()> {
    let config = try_load_config()?;
    let names = resolve_names(args.target.prefix, &config)?;
    let location = resolve_location(args.location, &config);
    let env = resolve_environment(args.target.cloud, &config)?;
    let arm = build_arm_client(&env, poll_config(args.poll_interval_secs, args.timeout_mins))?;

    eprintln!("==> Reproducing classic registry storage linkage");
    eprintln!("    Cloud:           {}", env.name);
    eprintln!("    Subscription:    {}", arm.subscription_id());
    eprintln!("    Location:        {}", location);
    eprintln!("    Resource Group:  {}", names.resource_group);
    eprintln!("    Storage Account: {}", names.storage_account);
    eprintln!("    Registry:        {}", names.registry);
    eprintln!();

    let settings = ReproSettings {
        names,
        location,
        keep: args.keep,
    };
    let report = repro::run(&arm, &settings).await?;

    eprintln!("\n==========================================");
    eprintln!("Storage Account ID (from Storage Account): {:?}", report.storage_account_id);
    eprintln!(
        "Storage Account ID (from Registry):        {:?}",
        report.storage_account_id_from_registry
    );
    eprintln!("Linkage: {}", report.linkage);
    eprintln!("==========================================\n");

    match report.teardown {
        Some(ref teardown) => {
            for step in &teardown.steps {
                let outcome = match &step.outcome {
                    DeleteOutcome::Deleted => "deleted".to_string(),
                    DeleteOutcome::AlreadyGone => "already gone".to_string(),
                    DeleteOutcome::Failed(e) => format!("failed (ignored): {}", e),
                };
                eprintln!("    {} {}: {}", step.kind.label(), step.name, outcome);
            }
        }
        None => {
            eprintln!("Resources kept. Clean up with:");
            eprintln!(
                "  acr-classic-repro destroy --prefix {}",
                settings.names.prefix
            );
        }
    }

    if args.strict && report.linkage != Linkage::Identical {
        bail!(
            "Storage account IDs are not identical ({}): {:?} vs {:?}",
            report.linkage,
            report.storage_account_id,
            report.storage_account_id_from_registry
        );
    }

    Ok(())
}
