// src/repro/teardown.rs
use tracing::{info, warn};

use super::names::ReproNames;
use crate::azure::{ArmClient, ArmError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    ResourceGroup,
    StorageAccount,
    Registry,
}

impl ResourceKind {
    pub fn label(&self) -> &'static str {
        match self {
            ResourceKind::ResourceGroup => "Resource group",
            ResourceKind::StorageAccount => "Storage account",
            ResourceKind::Registry => "Classic container registry",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    AlreadyGone,
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct TeardownStep {
    pub kind: ResourceKind,
    pub name: String,
    pub outcome: DeleteOutcome,
}

#[derive(Debug, Clone, Default)]
pub struct TeardownReport {
    pub steps: Vec<TeardownStep>,
}

impl TeardownReport {
    pub fn failures(&self) -> impl Iterator<Item = &TeardownStep> {
        self.steps
            .iter()
            .filter(|s| matches!(s.outcome, DeleteOutcome::Failed(_)))
    }

    pub fn is_clean(&self) -> bool {
        self.failures().next().is_none()
    }

    fn record(&mut self, kind: ResourceKind, name: &str, result: Result<(), ArmError>) {
        let outcome = match result {
            Ok(()) => DeleteOutcome::Deleted,
            Err(e) if e.is_not_found() => DeleteOutcome::AlreadyGone,
            Err(e) => {
                warn!(resource = kind.label(), name, error = %e, "cleanup failed, ignoring");
                DeleteOutcome::Failed(e.to_string())
            }
        };
        self.steps.push(TeardownStep {
            kind,
            name: name.to_string(),
            outcome,
        });
    }
}

/// Best-effort cleanup. Never fails: each error is logged and recorded.
///
/// Order is resource group, storage account, registry. The group delete
/// normally takes the other two with it, so they usually end `AlreadyGone`.
pub async fn teardown(arm: &ArmClient, names: &ReproNames) -> TeardownReport {
    let mut report = TeardownReport::default();

    let result = arm.resource_groups().delete(&names.resource_group).await;
    report.record(ResourceKind::ResourceGroup, &names.resource_group, result);

    let result = arm
        .storage_accounts()
        .delete(&names.storage_account, &names.resource_group)
        .await;
    report.record(ResourceKind::StorageAccount, &names.storage_account, result);

    let result = arm
        .registries()
        .delete(&names.registry, &names.resource_group)
        .await;
    report.record(ResourceKind::Registry, &names.registry, result);

    info!(
        clean = report.is_clean(),
        steps = report.steps.len(),
        "teardown finished"
    );
    report
}
