//! Employee Model

use serde::{Deserialize, Serialize};

use super::Role;

/// Employee as listed under a manager (without password)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub employee_id: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub role: Role,
    /// Set iff role = employee
    #[serde(default)]
    pub manager_employee_id: Option<String>,
}

/// Register user payload (`POST /users/`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeCreate {
    pub employee_id: String,
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manager_employee_id: Option<String>,
}

/// Update employee payload (`PUT /users/{manager_id}/{employee_id}`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeUpdate {
    pub name: String,
    pub email: String,
    pub role: Role,
    /// Omitted when the manager does not change the password
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub manager_employee_id: String,
}

impl EmployeeUpdate {
    /// Apply this update to a local copy (used for optimistic edits).
    pub fn apply_to(&self, employee: &mut Employee) {
        employee.name = self.name.clone();
        employee.email = self.email.clone();
        employee.role = self.role;
        employee.manager_employee_id = match self.role {
            Role::Employee => Some(self.manager_employee_id.clone()),
            Role::Manager => None,
        };
    }
}
