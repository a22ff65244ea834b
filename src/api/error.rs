//! Gateway error types.

use thiserror::Error;

/// Errors returned by a [`StegoGateway`](super::StegoGateway).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// No response: connection refused, timeout, broken body stream.
    #[error("Transport error: {0}")]
    Transport(String),

    /// A response arrived but its body is not a valid envelope.
    #[error("Invalid response: {0}")]
    Decode(String),

    /// The requested record does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The backend answered with `success=false` or an error status.
    #[error("Backend error: {message}")]
    Backend {
        /// HTTP status, when the failure came with a non-2xx code.
        status: Option<u16>,
        /// Message from the envelope; empty when the backend sent none.
        message: String,
        /// Verification flag carried by the failure, if any.
        verified: Option<bool>,
    },

    /// The request could not be built locally.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    /// Message to show the user: the backend's own message when it sent
    /// one, otherwise `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Backend { message, .. } | ApiError::NotFound(message)
                if !message.trim().is_empty() =>
            {
                message.clone()
            }
            _ => fallback.to_string(),
        }
    }

    /// True when the backend rejected an extraction because the extracted
    /// text does not match the anchored hash.
    pub fn is_integrity_failure(&self) -> bool {
        matches!(
            self,
            ApiError::Backend {
                verified: Some(false),
                ..
            }
        )
    }

    /// True for failures where no usable response was received.
    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Transport(_) | ApiError::Decode(_))
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Transport("request timed out".to_string())
        } else if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else if err.is_builder() {
            ApiError::InvalidRequest(err.to_string())
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}
