//! Employee pages

use feedback_client::HttpClient;
use shared::models::{
    CommentCreate, Feedback, FeedbackRequestCreate, ManagerGroup, TimelineEntry, group_by_manager,
};

use super::{NO_EMPLOYEE_MESSAGE, ViewContext, report};
use crate::core::activity::RowActivity;
use crate::core::error::{AppError, AppResult, require};
use crate::core::flash::Flash;
use crate::core::search::{FilteredList, feedback_matches};

pub struct EmployeeDashboard<H> {
    ctx: ViewContext<H>,
    timeline: Vec<TimelineEntry>,
    error: Option<String>,
    loading: bool,
}

impl<H: HttpClient> EmployeeDashboard<H> {
    pub fn new(ctx: ViewContext<H>) -> Self {
        Self {
            ctx,
            timeline: Vec::new(),
            error: None,
            loading: false,
        }
    }

    pub async fn load(&mut self) -> AppResult<()> {
        let result = match self.ctx.require_id(NO_EMPLOYEE_MESSAGE).await {
            Ok(employee_id) => {
                self.loading = true;
                let r = self.ctx.api.employee_dashboard(&employee_id).await;
                self.loading = false;
                r.map_err(AppError::from)
            }
            Err(e) => Err(e),
        };
        match result {
            Ok(timeline) => {
                self.timeline = timeline;
                self.error = None;
                Ok(())
            }
            Err(e) => {
                self.error = Some(e.user_message("Failed to fetch dashboard data."));
                Err(e)
            }
        }
    }

    pub fn timeline(&self) -> &[TimelineEntry] {
        &self.timeline
    }

    /// Timeline grouped by manager, in first-seen order
    pub fn groups(&self) -> Vec<ManagerGroup<'_>> {
        group_by_manager(&self.timeline)
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }
}

/// The employee's feedback list with acknowledge and comment actions.
///
/// Both actions patch the row first and keep the patch on success; a failed
/// or abandoned request restores the row.
pub struct EmployeeFeedbackView<H> {
    ctx: ViewContext<H>,
    list: FilteredList<Feedback>,
    rows: RowActivity,
    loading: bool,
    flash: Flash,
}

impl<H: HttpClient> EmployeeFeedbackView<H> {
    pub fn new(ctx: ViewContext<H>) -> Self {
        let list: FilteredList<Feedback> = ctx.list(feedback_matches);
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
        let employee_id = report(
            &mut self.flash,
            self.ctx.require_id(NO_EMPLOYEE_MESSAGE).await,
            NO_EMPLOYEE_MESSAGE,
        )?;
        self.loading = true;
        let result = self.ctx.api.employee_feedback(&employee_id).await;
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

    pub fn is_pending(&self, id: i64) -> bool {
        self.rows.is_pending(&id)
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn flash(&self) -> &Flash {
        &self.flash
    }

    /// "Acknowledged" once done, otherwise the "Acknowledge" action
    pub fn ack_label(&self, id: i64) -> Option<&'static str> {
        self.list
            .find(|f| f.id == id)
            .map(|f| if f.acknowledged { "Acknowledged" } else { "Acknowledge" })
    }

    pub async fn acknowledge(&mut self, id: i64) -> AppResult<()> {
        let Some(previous) = self.list.find(|f| f.id == id).map(|f| f.acknowledged) else {
            return report(&mut self.flash, Err(AppError::validation("Feedback not found")), "");
        };
        if previous {
            return Ok(());
        }
        let Some(mut row) = self.rows.track(id, &mut self.list) else {
            tracing::debug!(feedback_id = id, "Acknowledge already in flight");
            return Ok(());
        };
        row.update_where(|f| f.id == id, |f| f.acknowledged = true);

        if let Err(e) = self.ctx.api.acknowledge_feedback(id).await {
            drop(row);
            return report(&mut self.flash, Err(e.into()), "Acknowledge failed.");
        }
        row.commit();
        tracing::info!(feedback_id = id, "Feedback acknowledged");
        Ok(())
    }

    pub async fn comment(&mut self, id: i64, text: &str) -> AppResult<()> {
        let comment = report(&mut self.flash, require(text, "Comment cannot be empty"), "")?;
        if self.list.find(|f| f.id == id).is_none() {
            return report(&mut self.flash, Err(AppError::validation("Feedback not found")), "");
        }
        let Some(mut row) = self.rows.track(id, &mut self.list) else {
            tracing::debug!(feedback_id = id, "Comment already in flight");
            return Ok(());
        };
        row.update_where(|f| f.id == id, |f| f.comments.push(comment.clone()));

        let result = self
            .ctx
            .api
            .comment_feedback(id, &CommentCreate { comment: comment.clone() })
            .await;
        if let Err(e) = result {
            drop(row);
            return report(&mut self.flash, Err(e.into()), "Comment failed.");
        }
        row.commit();
        tracing::info!(feedback_id = id, "Comment posted");
        self.flash.success("Comment submitted.");
        Ok(())
    }
}

/// Employee asks a manager for feedback
pub struct FeedbackRequestForm<H> {
    ctx: ViewContext<H>,
    pub manager_employee_id: String,
    pub message: String,
    loading: bool,
    flash: Flash,
}

impl<H: HttpClient> FeedbackRequestForm<H> {
    pub fn new(ctx: ViewContext<H>) -> Self {
        let flash = ctx.flash();
        Self {
            ctx,
            manager_employee_id: String::new(),
            message: String::new(),
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

    pub async fn submit(&mut self) -> AppResult<()> {
        let employee_id = report(
            &mut self.flash,
            self.ctx.require_id(NO_EMPLOYEE_MESSAGE).await,
            NO_EMPLOYEE_MESSAGE,
        )?;
        let fields = require(&self.manager_employee_id, "Manager ID is required")
            .and_then(|m| require(&self.message, "Message is required").map(|msg| (m, msg)));
        let (manager_employee_id, message) = report(&mut self.flash, fields, "")?;

        let request = FeedbackRequestCreate {
            employee_id,
            manager_employee_id,
            message,
        };
        self.loading = true;
        let result = self.ctx.api.request_feedback(&request).await;
        self.loading = false;

        report(&mut self.flash, result.map_err(AppError::from), "Request failed")?;
        tracing::info!(manager_employee_id = %request.manager_employee_id, "Feedback requested");
        self.manager_employee_id.clear();
        self.message.clear();
        self.flash.success("Your feedback request has been sent successfully!");
        Ok(())
    }
}
