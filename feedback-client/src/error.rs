//! Client error types

use thiserror::Error;

/// Message shown for transport failures
pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Please try again.";

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport failure (connection refused, DNS, timeout)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response carrying a `detail`/`message` body
    #[error("{message}")]
    Api { status: u16, message: String },

    /// Non-2xx response whose body could not be parsed
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Success response with an unexpected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rejected client side before any request was sent
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The caller cancelled the request
    #[error("Request cancelled")]
    Cancelled,
}

impl ClientError {
    /// Message to show the user. `fallback` covers failures that carry no
    /// usable text of their own (unparseable bodies, bad responses).
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Http(_) => NETWORK_ERROR_MESSAGE.to_string(),
            Self::Api { message, .. } => message.clone(),
            Self::Validation(message) => message.clone(),
            _ => fallback.to_string(),
        }
    }

    /// HTTP status of a failed response, if the server answered
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } | Self::Status { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
