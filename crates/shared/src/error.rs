use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error body the backend attaches to non-2xx responses.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiError {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: Some(message.into()),
        }
    }

    /// Extracts a non-blank `message` from a raw response body, if the body is
    /// a JSON object carrying one.
    pub fn message_from_body(body: &str) -> Option<String> {
        serde_json::from_str::<ApiError>(body)
            .ok()
            .and_then(|err| err.message)
            .map(|message| message.trim().to_string())
            .filter(|message| !message.is_empty())
    }
}

#[derive(Debug, Error)]
#[error("api error {status}: {}", message.as_deref().unwrap_or("<no message>"))]
pub struct ApiException {
    pub status: u16,
    pub message: Option<String>,
}

impl ApiException {
    pub fn new(status: u16, message: Option<String>) -> Self {
        Self { status, message }
    }

    pub fn from_body(status: u16, body: &str) -> Self {
        Self::new(status, ApiError::message_from_body(body))
    }
}

impl From<ApiException> for ApiError {
    fn from(value: ApiException) -> Self {
        Self {
            status: Some(value.status.to_string()),
            message: value.message,
        }
    }
}
