use anyhow::Result;

use super::helpers::{build_arm_client, resolve_environment, resolve_names};
use crate::azure::PollConfig;
use crate::cli::config::try_load_config;
use crate::cli::StatusArgs;
use crate::repro::Linkage;

fn presence(exists: bool) -> &'static str {
    if exists {
        "EXISTS"
    } else {
        "NOT FOUND"
    }
}

pub async fn execute_status(args: StatusArgs) -> Result<()> {
    let config = try_load_config()?;
    let names = resolve_names(args.target.prefix, &config)?;
    let env = resolve_environment(args.target.cloud, &config)?;
    let arm = build_arm_client(&env, PollConfig::default())?;

    println!("==> Status for prefix: {}", names.prefix);
    println!("    Subscription: {}", arm.subscription_id());

    let group_exists = arm.resource_groups().exists(&names.resource_group).await?;
    println!(
        "\n    Resource group {}: {}",
        names.resource_group,
        presence(group_exists)
    );
    if !group_exists {
        return Ok(());
    }

    let storage = arm.storage_accounts();
    let account = if storage
        .exists(&names.storage_account, &names.resource_group)
        .await?
    {
        Some(
            storage
                .get_properties(&names.storage_account, &names.resource_group)
                .await?,
        )
    } else {
        None
    };
    println!(
        "    Storage account {}: {}",
        names.storage_account,
        presence(account.is_some())
    );

    let registries = arm.registries();
    if !registries
        .exists(&names.registry, &names.resource_group)
        .await?
    {
        println!("    Registry {}: {}", names.registry, presence(false));
        return Ok(());
    }

    let registry = registries.get(&names.registry, &names.resource_group).await?;
    println!("    Registry {}: {}", names.registry, presence(true));
    if let Some(server) = registry
        .properties
        .as_ref()
        .and_then(|p| p.login_server.as_deref())
    {
        println!("      Login server: {}", server);
    }

    match (registry.storage_account_id(), account) {
        (Some(linked), Some(account)) => {
            println!("      Linked storage account: {}", linked);
            println!(
                "      Linkage: {}",
                Linkage::compare(&account.id, linked)
            );
        }
        (Some(linked), None) => println!("      Linked storage account: {} (missing)", linked),
        (None, _) => println!("      Linked storage account: none"),
    }

    Ok(())
}
