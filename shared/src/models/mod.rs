//! Data models
//!
//! Transient copies of backend-owned entities, as returned by the API.
//! Optional or late-added backend fields use `#[serde(default)]` so older
//! payloads still deserialize.

pub mod dashboard;
pub mod employee;
pub mod feedback;
pub mod feedback_request;
pub mod notification;
pub mod role;

// Re-exports
pub use dashboard::*;
pub use employee::*;
pub use feedback::*;
pub use feedback_request::*;
pub use notification::*;
pub use role::*;
