use reqwest::header::{HeaderMap, LOCATION, RETRY_AFTER};
use reqwest::Response;
use serde::Deserialize;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

use super::client::ArmClient;
use super::error::{ArmError, ErrorDetail};

const AZURE_ASYNC_OPERATION: &str = "azure-asyncoperation";

/// Stand-in deadline for timeouts too large to represent
const FAR_FUTURE: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

/// How long-running operations are polled
#[derive(Clone, Debug)]
pub struct PollConfig {
    /// Delay between polls when the service sends no Retry-After
    pub interval: Duration,
    /// Give up after this long
    pub timeout: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(10),
            timeout: Duration::from_secs(15 * 60),
        }
    }
}

/// Where to look for completion, decided from the initial response
#[derive(Debug, PartialEq, Eq)]
enum PollTarget {
    AsyncOperation(String),
    Location(String),
    ProvisioningState(String),
    Done,
}

#[derive(Debug)]
enum PollOutcome {
    Pending,
    Succeeded,
    Failed(ArmError),
}

#[derive(Deserialize)]
struct OperationStatus {
    status: String,
    #[serde(default)]
    error: Option<ErrorDetail>,
}

#[derive(Deserialize)]
struct ProvisioningEnvelope {
    #[serde(default)]
    properties: Option<ProvisioningProperties>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProvisioningProperties {
    #[serde(default)]
    provisioning_state: Option<String>,
}

fn header<'a>(headers: &'a HeaderMap, name: impl reqwest::header::AsHeaderName) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    header(headers, RETRY_AFTER)
        .and_then(|v| v.parse::<u64>().ok())
        .map(Duration::from_secs)
}

fn provisioning_state(body: &str) -> Option<String> {
    serde_json::from_str::<ProvisioningEnvelope>(body)
        .ok()
        .and_then(|e| e.properties)
        .and_then(|p| p.provisioning_state)
}

fn is_terminal(state: &str) -> bool {
    ["succeeded", "failed", "canceled"]
        .iter()
        .any(|s| state.eq_ignore_ascii_case(s))
}

impl PollTarget {
    fn from_initial(status: u16, headers: &HeaderMap, body: &str, resource_url: &str) -> Self {
        if let Some(url) = header(headers, AZURE_ASYNC_OPERATION) {
            return PollTarget::AsyncOperation(url.to_string());
        }
        if status == 202 {
            if let Some(url) = header(headers, LOCATION) {
                return PollTarget::Location(url.to_string());
            }
        }
        match provisioning_state(body) {
            Some(state) if !is_terminal(&state) => {
                PollTarget::ProvisioningState(resource_url.to_string())
            }
            _ => PollTarget::Done,
        }
    }

    fn url(&self) -> Option<&str> {
        match self {
            PollTarget::AsyncOperation(url)
            | PollTarget::Location(url)
            | PollTarget::ProvisioningState(url) => Some(url),
            PollTarget::Done => None,
        }
    }
}

fn failure(status: &str, error: Option<ErrorDetail>) -> ArmError {
    let detail = error.unwrap_or_default();
    ArmError::OperationFailed {
        status: status.to_string(),
        code: detail.code,
        message: detail.message,
    }
}

fn async_operation_outcome(body: &str) -> Result<PollOutcome, ArmError> {
    let op: OperationStatus = serde_json::from_str(body)
        .map_err(|e| ArmError::Decode(format!("operation status: {}", e)))?;

    if op.status.eq_ignore_ascii_case("succeeded") {
        Ok(PollOutcome::Succeeded)
    } else if is_terminal(&op.status) {
        Ok(PollOutcome::Failed(failure(&op.status, op.error)))
    } else {
        Ok(PollOutcome::Pending)
    }
}

fn location_outcome(status: u16) -> PollOutcome {
    if status == 202 {
        PollOutcome::Pending
    } else {
        PollOutcome::Succeeded
    }
}

fn provisioning_outcome(body: &str) -> PollOutcome {
    match provisioning_state(body) {
        Some(state) if state.eq_ignore_ascii_case("succeeded") => PollOutcome::Succeeded,
        Some(state) if is_terminal(&state) => PollOutcome::Failed(failure(&state, None)),
        Some(_) => PollOutcome::Pending,
        // Resources without a provisioning state are ready once readable
        None => PollOutcome::Succeeded,
    }
}

impl ArmClient {
    /// Block until the operation started by `initial` finishes
    pub(crate) async fn wait_for_completion(
        &self,
        initial: Response,
        resource_url: &str,
    ) -> Result<(), ArmError> {
        let status = initial.status().as_u16();
        let headers = initial.headers().clone();
        let body = initial.text().await?;

        let target = PollTarget::from_initial(status, &headers, &body, resource_url);
        let poll_url = match target.url() {
            Some(url) => url.to_string(),
            None => return Ok(()),
        };

        let config = self.polling();
        let started = Instant::now();
        let deadline = started
            .checked_add(config.timeout)
            .unwrap_or_else(|| started + FAR_FUTURE);
        let mut delay = retry_after(&headers).unwrap_or(config.interval);

        loop {
            // Retry-After never pushes a wait past the deadline
            let wake = Instant::now().checked_add(delay).unwrap_or(deadline);
            tokio::time::sleep_until(wake.min(deadline)).await;
            if Instant::now() >= deadline {
                return Err(ArmError::Timeout {
                    url: poll_url,
                    elapsed: started.elapsed(),
                });
            }

            let response = match tokio::time::timeout_at(deadline, self.get_raw(&poll_url)).await {
                Ok(response) => response?,
                Err(_) => {
                    return Err(ArmError::Timeout {
                        url: poll_url,
                        elapsed: started.elapsed(),
                    })
                }
            };
            let poll_status = response.status().as_u16();
            delay = retry_after(response.headers()).unwrap_or(config.interval);

            let outcome = match &target {
                PollTarget::AsyncOperation(_) => async_operation_outcome(&response.text().await?)?,
                PollTarget::Location(_) => location_outcome(poll_status),
                PollTarget::ProvisioningState(_) => provisioning_outcome(&response.text().await?),
                PollTarget::Done => PollOutcome::Succeeded,
            };

            match outcome {
                PollOutcome::Succeeded => return Ok(()),
                PollOutcome::Failed(e) => return Err(e),
                PollOutcome::Pending => {
                    debug!(
                        url = %poll_url,
                        elapsed_secs = started.elapsed().as_secs(),
                        "operation still in progress"
                    );
                }
            }
        }
    }
}
