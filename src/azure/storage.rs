use serde::{Deserialize, Serialize};
use tracing::info;

use super::client::ArmClient;
use super::error::ArmError;

pub const API_VERSION: &str = "2018-02-01";
const PROVIDER: &str = "Microsoft.Storage";
const RESOURCE_TYPE: &str = "storageAccounts";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Sku {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tier: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageAccount {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub sku: Option<Sku>,
    #[serde(default)]
    pub properties: Option<StorageAccountProperties>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageAccountProperties {
    #[serde(default)]
    pub provisioning_state: Option<String>,
}

#[derive(Serialize)]
struct AccountCreateParameters<'a> {
    location: &'a str,
    kind: &'static str,
    sku: Sku,
}

/// Storage account operations
pub struct StorageAccounts<'a> {
    arm: &'a ArmClient,
}

impl<'a> StorageAccounts<'a> {
    pub(crate) fn new(arm: &'a ArmClient) -> Self {
        Self { arm }
    }

    fn url(&self, name: &str, resource_group: &str) -> String {
        let path = self
            .arm
            .provider_path(resource_group, PROVIDER, RESOURCE_TYPE, name);
        self.arm.url(&path, API_VERSION)
    }

    /// Create a general-purpose Standard_LRS account and wait for it
    pub async fn create(&self, name: &str, resource_group: &str, location: &str) -> Result<(), ArmError> {
        info!(name, resource_group, location, "Creating Storage Account..");
        let url = self.url(name, resource_group);
        let params = AccountCreateParameters {
            location,
            kind: "Storage",
            sku: Sku {
                name: "Standard_LRS".to_string(),
                tier: Some("Standard".to_string()),
            },
        };

        let response = self.arm.put(&url, &params).await?;
        self.arm.wait_for_completion(response, &url).await
    }

    pub async fn get_properties(&self, name: &str, resource_group: &str) -> Result<StorageAccount, ArmError> {
        info!(name, resource_group, "Retrieving Storage Account..");
        self.arm.get(&self.url(name, resource_group)).await
    }

    pub async fn exists(&self, name: &str, resource_group: &str) -> Result<bool, ArmError> {
        self.arm.exists(&self.url(name, resource_group)).await
    }

    /// Delete the account; ARM completes this synchronously
    pub async fn delete(&self, name: &str, resource_group: &str) -> Result<(), ArmError> {
        info!(name, resource_group, "Deleting Storage Account..");
        self.arm.delete(&self.url(name, resource_group)).await?;
        Ok(())
    }
}
