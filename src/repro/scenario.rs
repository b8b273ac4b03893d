// src/repro/scenario.rs
use anyhow::{Context, Result};
use tracing::{info, warn};

use super::names::ReproNames;
use super::teardown::{teardown, TeardownReport};
use crate::azure::ArmClient;

/// Inputs for one reproduction run
#[derive(Debug, Clone)]
pub struct ReproSettings {
    pub names: ReproNames,
    pub location: String,
    /// Leave resources in place instead of tearing down
    pub keep: bool,
}

/// How the registry's view of the storage account ID compares to the account's own
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Linkage {
    Identical,
    CaseMismatch,
    Different,
}

impl Linkage {
    pub fn compare(from_storage_account: &str, from_registry: &str) -> Self {
        if from_storage_account == from_registry {
            Linkage::Identical
        } else if from_storage_account.eq_ignore_ascii_case(from_registry) {
            Linkage::CaseMismatch
        } else {
            Linkage::Different
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Linkage::Identical => "identical",
            Linkage::CaseMismatch => "case-mismatch",
            Linkage::Different => "different",
        }
    }
}

impl std::fmt::Display for Linkage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug)]
pub struct ReproReport {
    pub storage_account_id: String,
    pub storage_account_id_from_registry: String,
    pub linkage: Linkage,
    /// `None` when the run kept its resources
    pub teardown: Option<TeardownReport>,
}

/// Provision, read back the linkage, then tear down.
///
/// Any failure before the read-back completes aborts the run and leaves
/// whatever was created in place; `destroy` cleans up after such runs.
pub async fn run(arm: &ArmClient, settings: &ReproSettings) -> Result<ReproReport> {
    let names = &settings.names;
    let location = settings.location.as_str();

    arm.resource_groups()
        .create_or_update(&names.resource_group, location)
        .await
        .with_context(|| format!("Error creating Resource Group {:?}", names.resource_group))?;

    arm.storage_accounts()
        .create(&names.storage_account, &names.resource_group, location)
        .await
        .with_context(|| format!("Error creating Storage Account {:?}", names.storage_account))?;

    let account = arm
        .storage_accounts()
        .get_properties(&names.storage_account, &names.resource_group)
        .await
        .with_context(|| format!("Error retrieving Storage Account {:?}", names.storage_account))?;
    info!("Storage Account ID (from Storage Account): {:?}", account.id);

    arm.registries()
        .create_classic(&names.registry, &account.id, &names.resource_group, location)
        .await
        .with_context(|| {
            format!(
                "Error creating Classic Container Registry {:?}",
                names.registry
            )
        })?;

    let from_registry = arm
        .registries()
        .get_storage_account_id(&names.registry, &names.resource_group)
        .await
        .with_context(|| {
            format!(
                "Error retrieving Classic Container Registry {:?}",
                names.registry
            )
        })?;
    info!("Storage Account ID (from Registry): {:?}", from_registry);

    let linkage = Linkage::compare(&account.id, &from_registry);
    match linkage {
        Linkage::Identical => info!(%linkage, "storage account IDs match"),
        _ => warn!(%linkage, "storage account IDs differ"),
    }

    let cleanup = if settings.keep {
        info!(resource_group = %names.resource_group, "keeping resources");
        None
    } else {
        Some(teardown(arm, names).await)
    };

    Ok(ReproReport {
        storage_account_id: account.id,
        storage_account_id_from_registry: from_registry,
        linkage,
        teardown: cleanup,
    })
}
