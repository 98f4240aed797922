//! Shared types for the feedback client
//!
//! Wire models, request/response DTOs and backend error-body parsing.
//! These types are shared between feedback-client and feedback-app.

pub mod client;
pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use error::ApiErrorBody;
pub use models::{
    Employee, Feedback, FeedbackRequest, ManagerDashboardRow, Notification, Role, Sentiment,
    TimelineEntry,
};
