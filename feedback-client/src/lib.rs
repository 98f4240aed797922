//! Feedback Client - HTTP client for the feedback backend
//!
//! Provides typed access to the backend REST API over the network
//! (`NetworkHttpClient`) or, with the `in-process` feature, directly
//! against an axum `Router` (`OneshotHttpClient`).

pub mod api;
pub mod client;
pub mod config;
pub mod error;

pub use api::FeedbackApi;
pub use client::{HttpClient, NetworkHttpClient};
#[cfg(feature = "in-process")]
pub use client::OneshotHttpClient;
pub use config::{ClientConfig, DEFAULT_BASE_URL};
pub use error::{ClientError, ClientResult, NETWORK_ERROR_MESSAGE};

// Re-export shared types for convenience
pub use shared::client::{ChangePasswordRequest, LoginRequest, LoginResponse, ResetPasswordRequest};
