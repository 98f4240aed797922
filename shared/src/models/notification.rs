//! Notification Model

use serde::{Deserialize, Serialize};

/// Notification created by the backend on feedback/request events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: i64,
    pub employee_id: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub manager_name: Option<String>,
    #[serde(default)]
    pub seen: bool,
    #[serde(default)]
    pub created_at: Option<String>,
}
