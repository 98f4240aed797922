//! Client-related types shared between the API client and the app
//!
//! Request/response DTOs for the `/users` auth endpoints.

use serde::{Deserialize, Serialize};

use crate::models::Role;

// =============================================================================
// Auth API DTOs
// =============================================================================

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub employee_id: String,
    pub password: String,
}

/// Login response data (the authenticated identity)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub employee_id: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub role: Role,
}

/// Reset password request (no old password, keyed by employee id)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetPasswordRequest {
    pub employee_id: String,
    pub new_password: String,
}

/// Change password request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}
