//! `/users` endpoints: auth, registration, employee directory, dashboards

use serde::de::IgnoredAny;
use shared::client::{ChangePasswordRequest, LoginRequest, LoginResponse, ResetPasswordRequest};
use shared::models::{Employee, EmployeeCreate, EmployeeUpdate, ManagerDashboardRow, TimelineEntry};

use super::{FeedbackApi, segment};
use crate::ClientResult;
use crate::client::HttpClient;

impl<H: HttpClient> FeedbackApi<H> {
    // ========== Auth API ==========

    /// Authenticate, returns identity + role
    pub async fn login(&self, request: &LoginRequest) -> ClientResult<LoginResponse> {
        self.http.post("/users/login", request).await
    }

    /// Register a manager or an employee
    pub async fn register(&self, user: &EmployeeCreate) -> ClientResult<()> {
        let _: IgnoredAny = self.http.post("/users/", user).await?;
        Ok(())
    }

    /// Reset a password by employee id (no old password)
    pub async fn reset_password(&self, request: &ResetPasswordRequest) -> ClientResult<()> {
        let _: IgnoredAny = self.http.post("/users/reset-password", request).await?;
        Ok(())
    }

    /// Change a password given the old one
    pub async fn change_password(
        &self,
        employee_id: &str,
        request: &ChangePasswordRequest,
    ) -> ClientResult<()> {
        let path = format!(
            "/users/change-password/{}",
            segment(employee_id, "Employee ID")?
        );
        let _: IgnoredAny = self.http.patch(&path, request).await?;
        Ok(())
    }

    // ========== Employee directory ==========

    /// Employees under a manager
    pub async fn manager_employees(&self, manager_id: &str) -> ClientResult<Vec<Employee>> {
        let path = format!("/users/manager/{}/employees", segment(manager_id, "Manager ID")?);
        self.http.get(&path).await
    }

    pub async fn update_employee(
        &self,
        manager_id: &str,
        employee_id: &str,
        update: &EmployeeUpdate,
    ) -> ClientResult<()> {
        let path = format!(
            "/users/{}/{}",
            segment(manager_id, "Manager ID")?,
            segment(employee_id, "Employee ID")?
        );
        let _: IgnoredAny = self.http.put(&path, update).await?;
        Ok(())
    }

    pub async fn delete_employee(&self, manager_id: &str, employee_id: &str) -> ClientResult<()> {
        let path = format!(
            "/users/{}/{}",
            segment(manager_id, "Manager ID")?,
            segment(employee_id, "Employee ID")?
        );
        let _: IgnoredAny = self.http.delete(&path).await?;
        Ok(())
    }

    // ========== Dashboards ==========

    /// Per-employee feedback counts for a manager
    pub async fn manager_dashboard(&self, manager_id: &str) -> ClientResult<Vec<ManagerDashboardRow>> {
        let path = format!("/users/dashboard/manager/{}", segment(manager_id, "Manager ID")?);
        self.http.get(&path).await
    }

    /// Feedback timeline of an employee
    pub async fn employee_dashboard(&self, employee_id: &str) -> ClientResult<Vec<TimelineEntry>> {
        let path = format!(
            "/users/dashboard/employee/{}",
            segment(employee_id, "Employee ID")?
        );
        self.http.get(&path).await
    }
}
