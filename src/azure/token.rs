use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::debug;

use super::environment::AzureEnvironment;
use super::error::ArmError;

/// Refresh the cached token once it is this close to expiry
const REFRESH_MARGIN_SECS: i64 = 300;

/// Source of bearer tokens for ARM requests
#[async_trait]
pub trait TokenCredential: Send + Sync {
    async fn token(&self) -> Result<String, ArmError>;
}

/// A token acquired elsewhere (e.g. `az account get-access-token`)
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

#[async_trait]
impl TokenCredential for StaticToken {
    async fn token(&self) -> Result<String, ArmError> {
        Ok(self.0.clone())
    }
}

#[derive(Clone)]
struct AccessToken {
    value: String,
    expires_at: DateTime<Utc>,
}

impl AccessToken {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        self.expires_at
            .checked_sub_signed(Duration::seconds(REFRESH_MARGIN_SECS))
            .is_some_and(|refresh_at| refresh_at > now)
    }
}

/// Service principal client-credentials flow against the AAD v1 token endpoint
pub struct ServicePrincipalToken {
    client: Client,
    token_url: String,
    client_id: String,
    client_secret: String,
    resource: String,
    cached: Mutex<Option<AccessToken>>,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: Seconds,
}

/// AAD v1 sends `expires_in` as a string; v2 and most mocks send a number
#[derive(Deserialize)]
#[serde(untagged)]
enum Seconds {
    Number(i64),
    Text(String),
}

impl Seconds {
    fn as_secs(&self) -> Result<i64, ArmError> {
        match self {
            Seconds::Number(n) => Ok(*n),
            Seconds::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| ArmError::Decode(format!("invalid expires_in '{}'", s))),
        }
    }

    fn expiry_from(&self, now: DateTime<Utc>) -> Result<DateTime<Utc>, ArmError> {
        let secs = self.as_secs()?;
        Duration::try_seconds(secs)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or_else(|| ArmError::Decode(format!("expires_in out of range: {}", secs)))
    }
}

#[derive(Deserialize)]
struct AadError {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

impl ServicePrincipalToken {
    pub fn new(
        client: Client,
        env: &AzureEnvironment,
        tenant_id: &str,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            client,
            token_url: env.token_url(tenant_id),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            resource: env.resource_manager_endpoint.clone(),
            cached: Mutex::new(None),
        }
    }

    async fn acquire(&self) -> Result<AccessToken, ArmError> {
        debug!(url = %self.token_url, "acquiring service principal token");

        let form = [
            ("grant_type", "client_credentials"),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("resource", self.resource.as_str()),
        ];

        let response = self
            .client
            .post(&self.token_url)
            .form(&form)
            .send()
            .await
            .map_err(|e| ArmError::Auth(format!("token request failed: {}", e)))?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let detail = match serde_json::from_str::<AadError>(&body) {
                Ok(err) => match err.error_description {
                    Some(desc) => format!("{}: {}", err.error, desc),
                    None => err.error,
                },
                Err(_) => body.trim().to_string(),
            };
            return Err(ArmError::Auth(format!("HTTP {}: {}", status.as_u16(), detail)));
        }

        let token: TokenResponse = serde_json::from_str(&body)
            .map_err(|e| ArmError::Decode(format!("token response: {}", e)))?;

        Ok(AccessToken {
            value: token.access_token,
            expires_at: token.expires_in.expiry_from(Utc::now())?,
        })
    }
}

#[async_trait]
impl TokenCredential for ServicePrincipalToken {
    async fn token(&self) -> Result<String, ArmError> {
        let mut cached = self.cached.lock().await;

        if let Some(token) = cached.as_ref() {
            if token.is_fresh(Utc::now()) {
                return Ok(token.value.clone());
            }
        }

        let token = self.acquire().await?;
        let value = token.value.clone();
        *cached = Some(token);
        Ok(value)
    }
}
