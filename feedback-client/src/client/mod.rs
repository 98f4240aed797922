//! Client module - transport implementations.
//!
//! `HttpClient` is the seam between the typed API and the transport:
//! `NetworkHttpClient` talks to a remote backend with reqwest, and
//! `OneshotHttpClient` (feature "in-process") calls an axum Router directly.

// Core modules
pub mod http;
#[cfg(feature = "in-process")]
pub mod http_oneshot;

// Re-export main types
pub use http::{HttpClient, NetworkHttpClient};
#[cfg(feature = "in-process")]
pub use http_oneshot::OneshotHttpClient;
