//! Page state machines
//!
//! Each view owns its form/list state and a [`Flash`] banner, and talks to
//! the backend through the shared [`ViewContext`]. A shell (the CLI, a GUI)
//! renders whatever state the view exposes.

pub mod auth;
pub mod employee;
pub mod manager;
pub mod notifications;

use std::sync::Arc;

use feedback_client::{FeedbackApi, HttpClient};

use crate::core::config::Timing;
use crate::core::error::{AppError, AppResult};
use crate::core::flash::Flash;
use crate::core::search::{FilteredList, Matcher};
use crate::core::session::SessionStore;

pub use auth::{ChangePasswordView, LoginState, LoginView, PasswordResetDialog, RegisterView};
pub use employee::{EmployeeDashboard, EmployeeFeedbackView, FeedbackRequestForm};
pub use manager::{
    EmployeesView, FeedbackForm, FeedbackHistoryView, FeedbackRequestsView, ManagerDashboard,
};
pub use notifications::NotificationCenter;

/// Shown by employee pages opened without an employee id
pub const NO_EMPLOYEE_MESSAGE: &str = "No employee logged in.";
/// Shown by manager pages opened without a manager id
pub const NO_MANAGER_MESSAGE: &str = "No manager logged in.";

/// What every view needs: the API, the session and the timing knobs
pub struct ViewContext<H> {
    pub api: Arc<FeedbackApi<H>>,
    pub session: SessionStore,
    pub timing: Timing,
}

impl<H> Clone for ViewContext<H> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            session: self.session.clone(),
            timing: self.timing,
        }
    }
}

impl<H: HttpClient> ViewContext<H> {
    pub fn new(api: FeedbackApi<H>, session: SessionStore, timing: Timing) -> Self {
        Self {
            api: Arc::new(api),
            session,
            timing,
        }
    }

    pub(crate) fn flash(&self) -> Flash {
        Flash::new(self.timing.flash_ttl)
    }

    pub(crate) fn list<T>(&self, matcher: Matcher<T>) -> FilteredList<T> {
        FilteredList::new(matcher, self.timing.search_debounce)
    }

    /// Current employee id, or `NotAuthenticated(missing)`
    pub(crate) async fn require_id(&self, missing: &str) -> AppResult<String> {
        self.session
            .employee_id()
            .await
            .ok_or_else(|| AppError::NotAuthenticated(missing.to_string()))
    }
}

/// Raise an error banner for a failed operation. Cancelled requests are
/// dropped silently.
pub(crate) fn report<T>(flash: &mut Flash, result: AppResult<T>, fallback: &str) -> AppResult<T> {
    match &result {
        Err(e) if !e.is_cancelled() => {
            tracing::warn!(error = %e, "{}", fallback);
            flash.error(e.user_message(fallback));
        }
        _ => {}
    }
    result
}
