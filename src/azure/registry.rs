use serde::{Deserialize, Serialize};
use tracing::info;

use super::client::ArmClient;
use super::error::ArmError;
use super::storage::Sku;

pub const API_VERSION: &str = "2017-10-01";
const PROVIDER: &str = "Microsoft.ContainerRegistry";
const RESOURCE_TYPE: &str = "registries";
const CLASSIC: &str = "Classic";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StorageAccountProperties {
    pub id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registry {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub sku: Option<Sku>,
    #[serde(default)]
    pub properties: Option<RegistryProperties>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryProperties {
    #[serde(default)]
    pub login_server: Option<String>,
    #[serde(default)]
    pub provisioning_state: Option<String>,
    #[serde(default)]
    pub storage_account: Option<StorageAccountProperties>,
}

impl Registry {
    /// ID of the storage account the registry reports as linked
    pub fn storage_account_id(&self) -> Option<&str> {
        self.properties
            .as_ref()
            .and_then(|p| p.storage_account.as_ref())
            .map(|s| s.id.as_str())
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateRegistry<'a> {
    location: &'a str,
    sku: Sku,
    properties: CreateRegistryProperties,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateRegistryProperties {
    storage_account: StorageAccountProperties,
}

/// Container registry operations
pub struct Registries<'a> {
    arm: &'a ArmClient,
}

impl<'a> Registries<'a> {
    pub(crate) fn new(arm: &'a ArmClient) -> Self {
        Self { arm }
    }

    fn url(&self, name: &str, resource_group: &str) -> String {
        let path = self
            .arm
            .provider_path(resource_group, PROVIDER, RESOURCE_TYPE, name);
        self.arm.url(&path, API_VERSION)
    }

    /// Create a Classic-tier registry backed by an existing storage account
    pub async fn create_classic(
        &self,
        name: &str,
        storage_account_id: &str,
        resource_group: &str,
        location: &str,
    ) -> Result<(), ArmError> {
        info!(name, resource_group, location, "Creating Classic Container Registry..");
        let url = self.url(name, resource_group);
        let body = CreateRegistry {
            location,
            sku: Sku {
                name: CLASSIC.to_string(),
                tier: Some(CLASSIC.to_string()),
            },
            properties: CreateRegistryProperties {
                storage_account: StorageAccountProperties {
                    id: storage_account_id.to_string(),
                },
            },
        };

        let response = self.arm.put(&url, &body).await?;
        self.arm.wait_for_completion(response, &url).await
    }

    pub async fn get(&self, name: &str, resource_group: &str) -> Result<Registry, ArmError> {
        self.arm.get(&self.url(name, resource_group)).await
    }

    /// Read back the linked storage account ID
    pub async fn get_storage_account_id(&self, name: &str, resource_group: &str) -> Result<String, ArmError> {
        info!(name, resource_group, "Retrieving Storage Account ID from Classic Container Registry..");
        let registry = self.get(name, resource_group).await?;
        registry
            .storage_account_id()
            .map(str::to_string)
            .ok_or_else(|| {
                ArmError::Decode(format!(
                    "registry '{}' reports no linked storage account",
                    name
                ))
            })
    }

    pub async fn exists(&self, name: &str, resource_group: &str) -> Result<bool, ArmError> {
        self.arm.exists(&self.url(name, resource_group)).await
    }

    pub async fn delete(&self, name: &str, resource_group: &str) -> Result<(), ArmError> {
        info!(name, resource_group, "Deleting Classic Container Registry..");
        let url = self.url(name, resource_group);
        let response = self.arm.delete(&url).await?;
        self.arm.wait_for_completion(response, &url).await
    }
}
