use anyhow::{bail, Result};
use reqwest::Client;
use std::env;
use std::sync::Arc;

use crate::azure::{AzureEnvironment, ServicePrincipalToken, StaticToken, TokenCredential};

pub const TENANT_ID_VAR: &str = "ARM_TENANT_ID";
pub const SUBSCRIPTION_ID_VAR: &str = "ARM_SUBSCRIPTION_ID";
pub const CLIENT_ID_VAR: &str = "ARM_CLIENT_ID";
pub const CLIENT_SECRET_VAR: &str = "ARM_CLIENT_SECRET";
pub const ACCESS_TOKEN_VAR: &str = "ARM_ACCESS_TOKEN";

/// How requests are authenticated
pub enum Credentials {
    ServicePrincipal {
        tenant_id: String,
        client_id: String,
        client_secret: String,
    },
    AccessToken(String),
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Credentials::ServicePrincipal {
                tenant_id,
                client_id,
                ..
            } => f
                .debug_struct("ServicePrincipal")
                .field("tenant_id", tenant_id)
                .field("client_id", client_id)
                .field("client_secret", &"<redacted>")
                .finish(),
            Credentials::AccessToken(_) => f.write_str("AccessToken(<redacted>)"),
        }
    }
}

/// Resolved subscription plus credentials
#[derive(Debug)]
pub struct ResolvedAuth {
    pub subscription_id: String,
    pub credentials: Credentials,
}

impl ResolvedAuth {
    pub fn token_credential(&self, client: Client, env: &AzureEnvironment) -> Arc<dyn TokenCredential> {
        match &self.credentials {
            Credentials::ServicePrincipal {
                tenant_id,
                client_id,
                client_secret,
            } => Arc::new(ServicePrincipalToken::new(
                client,
                env,
                tenant_id,
                client_id.clone(),
                client_secret.clone(),
            )),
            Credentials::AccessToken(token) => Arc::new(StaticToken::new(token.clone())),
        }
    }
}

/// Resolve credentials from the process environment
pub fn resolve_credentials() -> Result<ResolvedAuth> {
    resolve_credentials_with(|name| env::var(name).ok())
}

/// Resolve credentials through `lookup`; empty values count as unset.
///
/// A pre-acquired `ARM_ACCESS_TOKEN` takes precedence over the service
/// principal variables.
pub fn resolve_credentials_with(lookup: impl Fn(&str) -> Option<String>) -> Result<ResolvedAuth> {
    let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    let Some(subscription_id) = get(SUBSCRIPTION_ID_VAR) else {
        bail!("{} is not set", SUBSCRIPTION_ID_VAR);
    };

    if let Some(token) = get(ACCESS_TOKEN_VAR) {
        return Ok(ResolvedAuth {
            subscription_id,
            credentials: Credentials::AccessToken(token),
        });
    }

    let tenant_id = get(TENANT_ID_VAR);
    let client_id = get(CLIENT_ID_VAR);
    let client_secret = get(CLIENT_SECRET_VAR);

    match (tenant_id, client_id, client_secret) {
        (Some(tenant_id), Some(client_id), Some(client_secret)) => Ok(ResolvedAuth {
            subscription_id,
            credentials: Credentials::ServicePrincipal {
                tenant_id,
                client_id,
                client_secret,
            },
        }),
        (tenant_id, client_id, client_secret) => {
            let missing: Vec<&str> = [
                (TENANT_ID_VAR, tenant_id.is_none()),
                (CLIENT_ID_VAR, client_id.is_none()),
                (CLIENT_SECRET_VAR, client_secret.is_none()),
            ]
            .iter()
            .filter(|(_, missing)| *missing)
            .map(|(name, _)| *name)
            .collect();
            bail!(
                "Missing service principal credentials: {} (or set {})",
                missing.join(", "),
                ACCESS_TOKEN_VAR
            )
        }
    }
}
