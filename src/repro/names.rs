// src/repro/names.rs
use anyhow::{bail, Result};

pub const DEFAULT_PREFIX: &str = "bug1943";
pub const DEFAULT_LOCATION: &str = "West Europe";

/// Names of the three resources a run touches
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReproNames {
    pub prefix: String,
    pub registry: String,
    pub storage_account: String,
    pub resource_group: String,
}

impl ReproNames {
    /// Derive and validate all names from a prefix
    pub fn from_prefix(prefix: &str) -> Result<Self> {
        if prefix.is_empty() {
            bail!("Prefix must not be empty");
        }

        let names = Self {
            prefix: prefix.to_string(),
            registry: registry_name(prefix),
            storage_account: storage_account_name(prefix),
            resource_group: resource_group_name(prefix),
        };
        names.validate()?;
        Ok(names)
    }

    pub fn validate(&self) -> Result<()> {
        validate_storage_account_name(&self.storage_account)?;
        validate_registry_name(&self.registry)?;
        validate_resource_group_name(&self.resource_group)?;
        Ok(())
    }
}

pub fn registry_name(prefix: &str) -> String {
    format!("{}ClassicReg", prefix)
}

pub fn storage_account_name(prefix: &str) -> String {
    format!("{}stor", prefix)
}

pub fn resource_group_name(prefix: &str) -> String {
    format!("{}-resources", prefix)
}

/// Azure constraint: 3-24 chars, lowercase letters and digits
fn validate_storage_account_name(name: &str) -> Result<()> {
    if !(3..=24).contains(&name.len()) {
        bail!(
            "Storage account name '{}' must be 3-24 characters (got {}). Use a shorter prefix.",
            name,
            name.len()
        );
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
    {
        bail!(
            "Storage account name '{}' may only contain lowercase letters and digits",
            name
        );
    }
    Ok(())
}

/// Azure constraint: 5-50 chars, letters and digits
fn validate_registry_name(name: &str) -> Result<()> {
    if !(5..=50).contains(&name.len()) {
        bail!(
            "Container registry name '{}' must be 5-50 characters (got {})",
            name,
            name.len()
        );
    }
    if !name.chars().all(|c| c.is_ascii_alphanumeric()) {
        bail!(
            "Container registry name '{}' may only contain letters and digits",
            name
        );
    }
    Ok(())
}

/// Azure constraint: 1-90 chars, letters, digits, `-_.()`, no trailing period
fn validate_resource_group_name(name: &str) -> Result<()> {
    if name.is_empty() || name.len() > 90 {
        bail!(
            "Resource group name '{}' must be 1-90 characters (got {})",
            name,
            name.len()
        );
    }
    if !name
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.' | '(' | ')'))
    {
        bail!(
            "Resource group name '{}' may only contain letters, digits, '-', '_', '.', '(' and ')'",
            name
        );
    }
    if name.ends_with('.') {
        bail!("Resource group name '{}' must not end with '.'", name);
    }
    Ok(())
}
