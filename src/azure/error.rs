use serde::Deserialize;
use std::time::Duration;

/// Errors returned by ARM and AAD calls
#[derive(Debug)]
pub enum ArmError {
    /// Token acquisition failed
    Auth(String),
    /// Transport-level failure (DNS, TLS, connection reset)
    Network(String),
    /// Non-success HTTP status with the decoded ARM error envelope
    Http {
        status: u16,
        code: String,
        message: String,
        url: String,
    },
    /// Long-running operation reached a terminal failure state
    OperationFailed {
        status: String,
        code: String,
        message: String,
    },
    /// Long-running operation did not finish in time
    Timeout { url: String, elapsed: Duration },
    /// Response body did not match the expected shape
    Decode(String),
}

impl std::fmt::Display for ArmError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArmError::Auth(msg) => write!(f, "authentication failed: {}", msg),
            ArmError::Network(msg) => write!(f, "network error: {}", msg),
            ArmError::Http {
                status,
                code,
                message,
                url,
            } => write!(f, "HTTP {} from {}: {}: {}", status, url, code, message),
            ArmError::OperationFailed {
                status,
                code,
                message,
            } => write!(f, "operation {}: {}: {}", status, code, message),
            ArmError::Timeout { url, elapsed } => write!(
                f,
                "timed out after {}s waiting for {}",
                elapsed.as_secs(),
                url
            ),
            ArmError::Decode(msg) => write!(f, "decode error: {}", msg),
        }
    }
}

impl std::error::Error for ArmError {}

impl From<reqwest::Error> for ArmError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ArmError::Decode(e.to_string())
        } else {
            ArmError::Network(e.to_string())
        }
    }
}

impl ArmError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ArmError::Http { status: 404, .. })
    }

    /// Build an `Http` error from a failed response body
    pub(crate) fn from_response(status: u16, url: &str, body: &str) -> Self {
        let (code, message) = match serde_json::from_str::<ErrorEnvelope>(body) {
            Ok(envelope) => (envelope.error.code, envelope.error.message),
            Err(_) if body.trim().is_empty() => {
                ("Unknown".to_string(), "empty response body".to_string())
            }
            Err(_) => ("Unknown".to_string(), body.trim().to_string()),
        };

        ArmError::Http {
            status,
            code,
            message,
            url: url.to_string(),
        }
    }
}

/// `{"error": {"code": ..., "message": ...}}`
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorEnvelope {
    pub error: ErrorDetail,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorDetail {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
}
