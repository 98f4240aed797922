//! Application error types

use feedback_client::ClientError;
use thiserror::Error;

use super::config::ConfigError;
use super::session::SessionError;

#[derive(Debug, Error)]
pub enum AppError {
    /// The page needs an identity the session does not have
    #[error("{0}")]
    NotAuthenticated(String),

    /// Rejected before any request was sent
    #[error("{0}")]
    Validation(String),

    #[error("Client error: {0}")]
    Client(#[from] ClientError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Text for the error banner
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::NotAuthenticated(message) | Self::Validation(message) => message.clone(),
            Self::Client(e) => e.user_message(fallback),
            _ => fallback.to_string(),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Client(e) if e.is_cancelled())
    }
}

pub type AppResult<T> = Result<T, AppError>;

/// Reject a blank required field
pub fn require(value: &str, message: &str) -> AppResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::validation(message));
    }
    Ok(value.to_string())
}
