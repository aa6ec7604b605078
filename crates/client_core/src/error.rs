use shared::error::ApiException;
use thiserror::Error;

/// Shown when the backend rejects a request without saying why.
pub const GENERIC_ERROR_MESSAGE: &str = "Unknown error";

pub type Result<T, E = ClientError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{0}")]
    Validation(String),
    #[error("missing {0}; complete the previous step first")]
    MissingContext(&'static str),
    #[error("{0} is not available at this stage")]
    OutOfStage(&'static str),
    #[error(transparent)]
    Api(#[from] ApiException),
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("invalid response payload: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid base url '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

impl ClientError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Text surfaced to the user: the server's own message when it sent one,
    /// the generic fallback for a bare non-2xx, otherwise the error itself.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Validation(message) => message.clone(),
            ClientError::Api(err) => err
                .message
                .clone()
                .unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_string()),
            other => other.to_string(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api(err) => Some(err.status),
            ClientError::Transport(err) => err.status().map(|status| status.as_u16()),
            _ => None,
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(
            self,
            ClientError::Validation(_)
                | ClientError::MissingContext(_)
                | ClientError::OutOfStage(_)
        )
    }
}
