use reqwest::{Client, Method, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use super::environment::AzureEnvironment;
use super::error::ArmError;
use super::lro::PollConfig;
use super::registry::Registries;
use super::resources::ResourceGroups;
use super::storage::StorageAccounts;
use super::token::TokenCredential;

const USER_AGENT: &str = concat!("acr-classic-repro/", env!("CARGO_PKG_VERSION"));
const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Azure Resource Manager client scoped to one subscription
pub struct ArmClient {
    client: Client,
    endpoint: String,
    subscription_id: String,
    credential: Arc<dyn TokenCredential>,
    polling: PollConfig,
}

impl ArmClient {
    pub fn new(
        client: Client,
        env: &AzureEnvironment,
        subscription_id: impl Into<String>,
        credential: Arc<dyn TokenCredential>,
    ) -> Self {
        Self {
            client,
            endpoint: env.resource_manager_endpoint.trim_end_matches('/').to_string(),
            subscription_id: subscription_id.into(),
            credential,
            polling: PollConfig::default(),
        }
    }

    /// Shared HTTP client for ARM and AAD calls
    pub fn http_client() -> Result<Client, ArmError> {
        Self::http_client_with_timeout(REQUEST_TIMEOUT)
    }

    /// Like [`ArmClient::http_client`] but with a custom per-request timeout
    pub fn http_client_with_timeout(timeout: Duration) -> Result<Client, ArmError> {
        Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(CONNECT_TIMEOUT.min(timeout))
            .timeout(timeout)
            .build()
            .map_err(|e| ArmError::Network(format!("failed to build HTTP client: {}", e)))
    }

    pub fn with_polling(mut self, polling: PollConfig) -> Self {
        self.polling = polling;
        self
    }

    pub fn subscription_id(&self) -> &str {
        &self.subscription_id
    }

    pub(crate) fn polling(&self) -> &PollConfig {
        &self.polling
    }

    pub fn resource_groups(&self) -> ResourceGroups<'_> {
        ResourceGroups::new(self)
    }

    pub fn storage_accounts(&self) -> StorageAccounts<'_> {
        StorageAccounts::new(self)
    }

    pub fn registries(&self) -> Registries<'_> {
        Registries::new(self)
    }

    /// `/subscriptions/{id}/resourcegroups/{name}`
    pub fn resource_group_path(&self, resource_group: &str) -> String {
        format!(
            "/subscriptions/{}/resourcegroups/{}",
            urlencoding::encode(&self.subscription_id),
            urlencoding::encode(resource_group)
        )
    }

    /// `/subscriptions/{id}/resourceGroups/{rg}/providers/{provider}/{type}/{name}`
    pub fn provider_path(
        &self,
        resource_group: &str,
        provider: &str,
        resource_type: &str,
        name: &str,
    ) -> String {
        format!(
            "/subscriptions/{}/resourceGroups/{}/providers/{}/{}/{}",
            urlencoding::encode(&self.subscription_id),
            urlencoding::encode(resource_group),
            provider,
            resource_type,
            urlencoding::encode(name)
        )
    }

    pub(crate) fn url(&self, path: &str, api_version: &str) -> String {
        format!("{}{}?api-version={}", self.endpoint, path, api_version)
    }

    async fn request(&self, method: Method, url: &str) -> Result<RequestBuilder, ArmError> {
        let token = self.credential.token().await?;
        Ok(self.client.request(method, url).bearer_auth(token))
    }

    /// Send and map non-2xx statuses to `ArmError::Http`
    async fn send(&self, builder: RequestBuilder, url: &str) -> Result<Response, ArmError> {
        let response = builder.send().await?;
        let status = response.status();
        debug!(url, status = status.as_u16(), "ARM response");

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(ArmError::from_response(status.as_u16(), url, &body))
    }

    pub(crate) async fn get_raw(&self, url: &str) -> Result<Response, ArmError> {
        let builder = self.request(Method::GET, url).await?;
        self.send(builder, url).await
    }

    /// GET and decode a JSON body
    pub(crate) async fn get<T: DeserializeOwned>(&self, url: &str) -> Result<T, ArmError> {
        let response = self.get_raw(url).await?;
        decode_json(response, url).await
    }

    /// GET that maps 404 to `false`
    pub(crate) async fn exists(&self, url: &str) -> Result<bool, ArmError> {
        match self.get_raw(url).await {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }

    pub(crate) async fn put<B: Serialize>(&self, url: &str, body: &B) -> Result<Response, ArmError> {
        let builder = self.request(Method::PUT, url).await?.json(body);
        self.send(builder, url).await
    }

    pub(crate) async fn delete(&self, url: &str) -> Result<Response, ArmError> {
        let builder = self.request(Method::DELETE, url).await?;
        self.send(builder, url).await
    }
}

pub(crate) async fn decode_json<T: DeserializeOwned>(
    response: Response,
    url: &str,
) -> Result<T, ArmError> {
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| ArmError::Decode(format!("{}: {}", url, e)))
}
