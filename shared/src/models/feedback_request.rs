//! Feedback Request Model

use serde::{Deserialize, Serialize};

/// An employee's request for feedback from a manager
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackRequest {
    pub id: i64,
    pub employee_id: String,
    pub manager_employee_id: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub seen: bool,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Create request payload (`POST /feedback/request`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackRequestCreate {
    pub employee_id: String,
    pub manager_employee_id: String,
    pub message: String,
}

/// `GET /feedback/requests/{manager_id}/count-unseen`
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct UnseenCount {
    #[serde(default)]
    pub unseen_count: u64,
}
