//! Typed backend API
//!
//! One method per backend endpoint, generic over the transport. Calls whose
//! response body is not used decode into `IgnoredAny`, so an empty body, a
//! `{"message": ..}` acknowledgement or the updated entity are all accepted.

mod feedback;
mod notifications;
mod requests;
mod users;

use crate::client::{HttpClient, NetworkHttpClient};
use crate::{ClientConfig, ClientError, ClientResult};

/// Typed client for the feedback backend
#[derive(Debug, Clone)]
pub struct FeedbackApi<H> {
    http: H,
}

impl<H: HttpClient> FeedbackApi<H> {
    pub fn new(http: H) -> Self {
        Self { http }
    }

    /// Underlying transport
    pub fn http(&self) -> &H {
        &self.http
    }
}

impl FeedbackApi<NetworkHttpClient> {
    /// Build a network-backed API from configuration
    pub fn from_config(config: &ClientConfig) -> ClientResult<Self> {
        Ok(Self::new(NetworkHttpClient::new(config)?))
    }
}

/// Encode one path segment. Blank values are rejected so a missing id never
/// turns into a different endpoint (`/users/manager//employees`).
pub(crate) fn segment(value: &str, field: &str) -> ClientResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ClientError::Validation(format!("{} is required", field)));
    }
    Ok(urlencoding::encode(value).into_owned())
}
