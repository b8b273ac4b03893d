use serde::{Deserialize, Serialize};
use tracing::info;

use super::client::{decode_json, ArmClient};
use super::error::ArmError;

pub const API_VERSION: &str = "2018-02-01";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceGroup {
    pub id: String,
    pub name: String,
    pub location: String,
    #[serde(default)]
    pub properties: Option<ResourceGroupProperties>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceGroupProperties {
    #[serde(default)]
    pub provisioning_state: Option<String>,
}

#[derive(Serialize)]
struct CreateGroup<'a> {
    location: &'a str,
}

/// Resource group operations
pub struct ResourceGroups<'a> {
    arm: &'a ArmClient,
}

impl<'a> ResourceGroups<'a> {
    pub(crate) fn new(arm: &'a ArmClient) -> Self {
        Self { arm }
    }

    fn url(&self, name: &str) -> String {
        self.arm.url(&self.arm.resource_group_path(name), API_VERSION)
    }

    /// Create or update a resource group (synchronous in ARM)
    pub async fn create_or_update(&self, name: &str, location: &str) -> Result<ResourceGroup, ArmError> {
        info!(name, location, "Creating Resource Group..");
        let url = self.url(name);
        let response = self.arm.put(&url, &CreateGroup { location }).await?;
        decode_json(response, &url).await
    }

    pub async fn get(&self, name: &str) -> Result<ResourceGroup, ArmError> {
        self.arm.get(&self.url(name)).await
    }

    pub async fn exists(&self, name: &str) -> Result<bool, ArmError> {
        self.arm.exists(&self.url(name)).await
    }

    /// Delete a resource group and everything in it, waiting for completion
    pub async fn delete(&self, name: &str) -> Result<(), ArmError> {
        info!(name, "Deleting Resource Group..");
        let url = self.url(name);
        let response = self.arm.delete(&url).await?;

        info!(name, "Waiting for deletion of Resource Group to complete..");
        self.arm.wait_for_completion(response, &url).await
    }
}
