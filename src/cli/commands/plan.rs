use anyhow::Result;

use super::helpers::{resolve_location, resolve_names};
use crate::azure::{registry, resources, storage};
use crate::cli::config::try_load_config;
use crate::cli::PlanArgs;

pub fn execute_plan(args: PlanArgs) -> Result<()> {
    let config = try_load_config()?;
    let names = resolve_names(args.prefix, &config)?;
    let location = resolve_location(args.location, &config);

    println!("==> Dry run for prefix: {}", names.prefix);
    println!("    Location: {}", location);
    println!();
    println!("Would create, in order:");
    println!(
        "  1. Resource group:  {} (api-version {})",
        names.resource_group,
        resources::API_VERSION
    );
    println!(
        "  2. Storage account: {} (Storage, Standard_LRS, api-version {})",
        names.storage_account,
        storage::API_VERSION
    );
    println!(
        "  3. Registry:        {} (Classic, linked to {}, api-version {})",
        names.registry,
        names.storage_account,
        registry::API_VERSION
    );
    println!();
    println!("Then delete, in order:");
    println!("  1. Resource group:  {}", names.resource_group);
    println!("  2. Storage account: {}", names.storage_account);
    println!("  3. Registry:        {}", names.registry);

    Ok(())
}
