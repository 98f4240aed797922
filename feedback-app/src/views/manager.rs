//! Manager pages
//!
//! Structural mutations (edit, delete, delete-all) patch the list, send the
//! request, roll back on failure or when abandoned, and refetch on success. Marking a request
//! seen keeps the local patch.

use feedback_client::HttpClient;
use shared::models::{
    Employee, EmployeeUpdate, Feedback, FeedbackCreate, FeedbackRequest, FeedbackUpdate,
    ManagerDashboardRow, ManagerDashboardSummary, Role, Sentiment,
};
use shared::util::parse_tags;

use super::{NO_MANAGER_MESSAGE, ViewContext, report};
use crate::core::activity::{Rollback, RowActivity};
use crate::core::error::{AppError, AppResult, require};
use crate::core::flash::Flash;
use crate::core::search::{FilteredList, employee_matches, history_matches};

// ========== Dashboard ==========

pub struct ManagerDashboard<H> {
    ctx: ViewContext<H>,
    unseen_requests: u64,
    employees: Vec<Employee>,
    rows: Vec<ManagerDashboardRow>,
    /// One message shared by all three cards
    error: Option<String>,
    loading: bool,
    flash: Flash,
}

impl<H: HttpClient> ManagerDashboard<H> {
    pub fn new(ctx: ViewContext<H>) -> Self {
        let flash = ctx.flash();
        Self {
            ctx,
            unseen_requests: 0,
            employees: Vec::new(),
            rows: Vec::new(),
            error: None,
            loading: false,
            flash,
        }
    }

    /// Fetch the unseen-request count, employee list and dashboard rows
    /// concurrently. Any failure fails all three.
    pub async fn load(&mut self) -> AppResult<()> {
        let manager_id = report(
            &mut self.flash,
            self.ctx.require_id(NO_MANAGER_MESSAGE).await,
            NO_MANAGER_MESSAGE,
        )?;

        self.loading = true;
        let api = &self.ctx.api;
        let result = tokio::try_join!(
            api.unseen_request_count(&manager_id),
            api.manager_employees(&manager_id),
            api.manager_dashboard(&manager_id),
        );
        self.loading = false;

        match result {
            Ok((unseen, employees, rows)) => {
                self.unseen_requests = unseen;
                self.employees = employees;
                self.rows = rows;
                self.error = None;
                Ok(())
            }
            Err(e) => {
                let fallback = "Failed to fetch dashboard data.";
                self.error = Some(e.user_message(fallback));
                report(&mut self.flash, Err(e.into()), fallback)
            }
        }
    }

    pub fn unseen_requests(&self) -> u64 {
        self.unseen_requests
    }

    pub fn employees(&self) -> &[Employee] {
        &self.employees
    }

    pub fn rows(&self) -> &[ManagerDashboardRow] {
        &self.rows
    }

    pub fn summary(&self) -> ManagerDashboardSummary {
        ManagerDashboardSummary::from_rows(&self.rows)
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn flash(&self) -> &Flash {
        &self.flash
    }
}

// ========== Employees ==========

/// Edit dialog fields. A blank password keeps the current one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeEdit {
    pub name: String,
    pub email: String,
    pub role: Role,
    pub password: String,
}

impl EmployeeEdit {
    pub fn from_employee(employee: &Employee) -> Self {
        Self {
            name: employee.name.clone(),
            email: employee.email.clone(),
            role: employee.role,
            password: String::new(),
        }
    }
}

pub struct EmployeesView<H> {
    ctx: ViewContext<H>,
    list: FilteredList<Employee>,
    rows: RowActivity<String>,
    loading: bool,
    flash: Flash,
}

impl<H: HttpClient> EmployeesView<H> {
    pub fn new(ctx: ViewContext<H>) -> Self {
        let list: FilteredList<Employee> = ctx.list(employee_matches);
        let flash = ctx.flash();
        Self {
            ctx,
            list,
            rows: RowActivity::new(),
            loading: false,
            flash,
        }
    }

    pub async fn load(&mut self) -> AppResult<()> {
        let manager_id = report(
            &mut self.flash,
            self.ctx.require_id(NO_MANAGER_MESSAGE).await,
            NO_MANAGER_MESSAGE,
        )?;
        self.loading = true;
        let result = self.ctx.api.manager_employees(&manager_id).await;
        self.loading = false;

        let employees = report(&mut self.flash, result.map_err(AppError::from), "Failed to fetch employees")?;
        self.list.replace_all(employees);
        Ok(())
    }

    pub fn list(&self) -> &FilteredList<Employee> {
        &self.list
    }

    /// Search box access
    pub fn list_mut(&mut self) -> &mut FilteredList<Employee> {
        &mut self.list
    }

    pub fn edit_for(&self, employee_id: &str) -> Option<EmployeeEdit> {
        self.list
            .find(|e| e.employee_id == employee_id)
            .map(EmployeeEdit::from_employee)
    }

    pub fn is_pending(&self, employee_id: &str) -> bool {
        self.rows.is_pending(&employee_id.to_string())
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn flash(&self) -> &Flash {
        &self.flash
    }

    pub async fn update(&mut self, employee_id: &str, edit: EmployeeEdit) -> AppResult<()> {
        let manager_id = report(
            &mut self.flash,
            self.ctx.require_id(NO_MANAGER_MESSAGE).await,
            NO_MANAGER_MESSAGE,
        )?;
        let fields = require(employee_id, "Employee ID is required").and_then(|id| {
            let name = require(&edit.name, "Name is required")?;
            let email = require(&edit.email, "Email is required")?;
            Ok((id, name, email))
        });
        let (employee_id, name, email) = report(&mut self.flash, fields, "")?;

        let payload = EmployeeUpdate {
            name,
            email,
            role: edit.role,
            password: Some(edit.password).filter(|p| !p.is_empty()),
            manager_employee_id: manager_id.clone(),
        };
        let Some(mut row) = self.rows.track(employee_id.clone(), &mut self.list) else {
            tracing::debug!(employee_id = %employee_id, "Employee update already in flight");
            return Ok(());
        };
        row.update_where(|e| e.employee_id == employee_id, |e| payload.apply_to(e));

        let result = self
            .ctx
            .api
            .update_employee(&manager_id, &employee_id, &payload)
            .await;
        if let Err(e) = result {
            drop(row);
            return report(&mut self.flash, Err(e.into()), "Failed to update employee");
        }
        row.commit();
        tracing::info!(employee_id = %employee_id, "Employee updated");
        self.flash.success("Employee updated successfully.");
        self.load().await
    }

    pub async fn delete(&mut self, employee_id: &str) -> AppResult<()> {
        let manager_id = report(
            &mut self.flash,
            self.ctx.require_id(NO_MANAGER_MESSAGE).await,
            NO_MANAGER_MESSAGE,
        )?;
        let employee_id = report(&mut self.flash, require(employee_id, "Employee ID is required"), "")?;
        let Some(mut row) = self.rows.track(employee_id.clone(), &mut self.list) else {
            tracing::debug!(employee_id = %employee_id, "Employee delete already in flight");
            return Ok(());
        };
        row.remove_where(|e| e.employee_id == employee_id);

        if let Err(e) = self.ctx.api.delete_employee(&manager_id, &employee_id).await {
            drop(row);
            return report(&mut self.flash, Err(e.into()), "Failed to delete employee");
        }
        row.commit();
        tracing::info!(employee_id = %employee_id, "Employee deleted");
        self.flash.success("Employee deleted successfully.");
        self.load().await
    }
}

// ========== Submit feedback ==========

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedbackDraft {
    pub employee_id: String,
    pub strengths: String,
    pub improvement: String,
    pub sentiment: Sentiment,
    pub anonymous: bool,
    /// Comma separated
    pub tags: String,
}

pub struct FeedbackForm<H> {
    ctx: ViewContext<H>,
    pub draft: FeedbackDraft,
    loading: bool,
    flash: Flash,
}

impl<H: HttpClient> FeedbackForm<H> {
    pub fn new(ctx: ViewContext<H>) -> Self {
        let flash = ctx.flash();
        Self {
            ctx,
            draft: FeedbackDraft::default(),
            loading: false,
            flash,
        }
    }

    pub fn flash(&self) -> &Flash {
        &self.flash
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    fn payload(&self) -> AppResult<FeedbackCreate> {
        let d = &self.draft;
        Ok(FeedbackCreate {
            employee_id: require(&d.employee_id, "Employee ID is required")?,
            manager_employee_id: None,
            strengths: require(&d.strengths, "Strengths are required")?,
            improvement: require(&d.improvement, "Areas to improve are required")?,
            sentiment: d.sentiment,
            anonymous: d.anonymous,
            tags: parse_tags(&d.tags),
        })
    }

    pub async fn submit(&mut self) -> AppResult<()> {
        let payload = self.payload();
        let mut payload = report(&mut self.flash, payload, "")?;
        payload.manager_employee_id = Some(report(
            &mut self.flash,
            self.ctx.require_id(NO_MANAGER_MESSAGE).await,
            NO_MANAGER_MESSAGE,
        )?);

        self.loading = true;
        let result = self.ctx.api.create_feedback(&payload).await;
        self.loading = false;

        report(&mut self.flash, result.map_err(AppError::from), "Submission failed")?;
        tracing::info!(employee_id = %payload.employee_id, "Feedback submitted");
        self.draft = FeedbackDraft::default();
        self.flash.success("Feedback submitted successfully!");
        Ok(())
    }
}

// ========== Feedback history ==========

pub struct FeedbackHistoryView<H> {
    ctx: ViewContext<H>,
    list: FilteredList<Feedback>,
    rows: RowActivity,
    loading: bool,
    flash: Flash,
}

impl<H: HttpClient> FeedbackHistoryView<H> {
    pub fn new(ctx: ViewContext<H>) -> Self {
        let list: FilteredList<Feedback> = ctx.list(history_matches);
        let flash = ctx.flash();
        Self {
            ctx,
            list,
            rows: RowActivity::new(),
            loading: false,
            flash,
        }
    }

    async fn manager_id(&mut self) -> AppResult<String> {
        report(
            &mut self.flash,
            self.ctx.require_id(NO_MANAGER_MESSAGE).await,
            NO_MANAGER_MESSAGE,
        )
    }

    pub async fn load(&mut self) -> AppResult<()> {
        let manager_id = self.manager_id().await?;
        self.loading = true;
        let result = self.ctx.api.manager_feedback(&manager_id).await;
        self.loading = false;

        let feedback = report(&mut self.flash, result.map_err(AppError::from), "Failed to fetch feedbacks.")?;
        self.list.replace_all(feedback);
        Ok(())
    }

    pub fn list(&self) -> &FilteredList<Feedback> {
        &self.list
    }

    pub fn list_mut(&mut self) -> &mut FilteredList<Feedback> {
        &mut self.list
    }

    /// Edit dialog prefilled from the row
    pub fn edit_for(&self, id: i64) -> Option<FeedbackUpdate> {
        self.list.find(|f| f.id == id).map(|f| {
            FeedbackUpdate::from_feedback(f, f.manager_employee_id.clone().unwrap_or_default())
        })
    }

    pub fn is_pending(&self, id: i64) -> bool {
        self.rows.is_pending(&id)
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn flash(&self) -> &Flash {
        &self.flash
    }

    pub async fn update(&mut self, id: i64, mut update: FeedbackUpdate) -> AppResult<()> {
        update.manager_employee_id = self.manager_id().await?;
        let checked = require(&update.employee_id, "Employee ID is required")
            .and_then(|_| require(&update.strengths, "Strengths are required"))
            .and_then(|_| require(&update.improvement, "Areas to improve are required"));
        report(&mut self.flash, checked, "")?;

        let Some(mut row) = self.rows.track(id, &mut self.list) else {
            tracing::debug!(feedback_id = id, "Feedback update already in flight");
            return Ok(());
        };
        row.update_where(|f| f.id == id, |f| update.apply_to(f));

        if let Err(e) = self.ctx.api.update_feedback(id, &update).await {
            drop(row);
            return report(&mut self.flash, Err(e.into()), "Failed to update feedback");
        }
        row.commit();
        tracing::info!(feedback_id = id, "Feedback updated");
        self.flash.success("Feedback updated successfully.");
        self.load().await
    }

    pub async fn delete(&mut self, id: i64) -> AppResult<()> {
        self.manager_id().await?;
        let Some(mut row) = self.rows.track(id, &mut self.list) else {
            tracing::debug!(feedback_id = id, "Feedback delete already in flight");
            return Ok(());
        };
        row.remove_where(|f| f.id == id);

        if let Err(e) = self.ctx.api.delete_feedback(id).await {
            drop(row);
            return report(&mut self.flash, Err(e.into()), "Failed to delete feedback");
        }
        row.commit();
        tracing::info!(feedback_id = id, "Feedback deleted");
        self.load().await
    }

    /// Delete every feedback this manager wrote
    pub async fn delete_all(&mut self) -> AppResult<()> {
        let manager_id = self.manager_id().await?;
        let mut list = Rollback::new(&mut self.list);
        let removed = list.len();
        list.replace_all(Vec::new());

        if let Err(e) = self.ctx.api.delete_manager_feedback(&manager_id).await {
            drop(list);
            return report(&mut self.flash, Err(e.into()), "Failed to delete all feedbacks");
        }
        list.commit();
        tracing::info!(manager_id = %manager_id, removed, "All feedback deleted");
        self.load().await
    }
}

// ========== Feedback requests ==========

pub struct FeedbackRequestsView<H> {
    ctx: ViewContext<H>,
    requests: Vec<FeedbackRequest>,
    rows: RowActivity,
    loading: bool,
    flash: Flash,
}

impl<H: HttpClient> FeedbackRequestsView<H> {
    pub fn new(ctx: ViewContext<H>) -> Self {
        let flash = ctx.flash();
        Self {
            ctx,
            requests: Vec::new(),
            rows: RowActivity::new(),
            loading: false,
            flash,
        }
    }

    pub async fn load(&mut self) -> AppResult<()> {
        let manager_id = report(
            &mut self.flash,
            self.ctx.require_id(NO_MANAGER_MESSAGE).await,
            NO_MANAGER_MESSAGE,
        )?;
        self.loading = true;
        let result = self.ctx.api.feedback_requests(&manager_id).await;
        self.loading = false;

        self.requests = report(
            &mut self.flash,
            result.map_err(AppError::from),
            "Failed to fetch feedback requests.",
        )?;
        Ok(())
    }

    pub fn requests(&self) -> &[FeedbackRequest] {
        &self.requests
    }

    pub fn unseen_count(&self) -> usize {
        self.requests.iter().filter(|r| !r.seen).count()
    }

    pub fn is_pending(&self, id: i64) -> bool {
        self.rows.is_pending(&id)
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn flash(&self) -> &Flash {
        &self.flash
    }

    pub async fn mark_seen(&mut self, id: i64) -> AppResult<()> {
        let Some(mut row) = self.rows.track(id, &mut self.requests) else {
            tracing::debug!(request_id = id, "Request update already in flight");
            return Ok(());
        };
        for r in row.iter_mut().filter(|r| r.id == id) {
            r.seen = true;
        }

        if let Err(e) = self.ctx.api.mark_request_seen(id).await {
            drop(row);
            return report(&mut self.flash, Err(e.into()), "Error updating request.");
        }
        row.commit();
        Ok(())
    }
}
