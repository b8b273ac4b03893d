// src/cli/commands/helpers.rs
use anyhow::{Context, Result};
use std::time::Duration;
use tracing::debug;

use crate::azure::{ArmClient, AzureEnvironment, PollConfig};
use crate::cli::auth;
use crate::cli::config::Config;
use crate::repro::{ReproNames, DEFAULT_LOCATION, DEFAULT_PREFIX};

/// Resolve name prefix from args or config
pub fn resolve_prefix(prefix_arg: Option<String>, config: &Option<Config>) -> String {
    prefix_arg
        .or_else(|| config.as_ref().and_then(|c| c.prefix.clone()))
        .unwrap_or_else(|| DEFAULT_PREFIX.to_string())
}

/// Resolve location from args or config
pub fn resolve_location(location_arg: Option<String>, config: &Option<Config>) -> String {
    location_arg
        .or_else(|| config.as_ref().and_then(|c| c.location.clone()))
        .unwrap_or_else(|| DEFAULT_LOCATION.to_string())
}

/// Resolve the cloud from args or config, applying any endpoint overrides
pub fn resolve_environment(
    cloud_arg: Option<String>,
    config: &Option<Config>,
) -> Result<AzureEnvironment> {
    let env = match cloud_arg.or_else(|| config.as_ref().and_then(|c| c.cloud.clone())) {
        Some(name) => AzureEnvironment::from_name(&name)?,
        None => AzureEnvironment::public(),
    };

    Ok(match config {
        Some(c) => env.with_endpoints(
            c.active_directory_endpoint.clone(),
            c.resource_manager_endpoint.clone(),
        ),
        None => env,
    })
}

pub fn resolve_names(prefix_arg: Option<String>, config: &Option<Config>) -> Result<ReproNames> {
    let prefix = resolve_prefix(prefix_arg, config);
    ReproNames::from_prefix(&prefix).with_context(|| format!("Invalid prefix '{}'", prefix))
}

pub fn poll_config(interval_secs: u64, timeout_mins: u64) -> PollConfig {
    PollConfig {
        interval: Duration::from_secs(interval_secs.max(1)),
        timeout: Duration::from_secs(timeout_mins.max(1).saturating_mul(60)),
    }
}

/// Build an authenticated ARM client from ARM_* environment variables
pub fn build_arm_client(env: &AzureEnvironment, polling: PollConfig) -> Result<ArmClient> {
    let resolved = auth::resolve_credentials()
        .context("Error building Azure Client. Set ARM_SUBSCRIPTION_ID plus ARM_TENANT_ID, ARM_CLIENT_ID and ARM_CLIENT_SECRET")?;
    debug!(cloud = %env.name, credentials = ?resolved.credentials, "building ARM client");

    let http = ArmClient::http_client()?;
    let credential = resolved.token_credential(http.clone(), env);
    Ok(ArmClient::new(http, env, resolved.subscription_id, credential).with_polling(polling))
}
