//! App - 应用入口对象
//!
//! Holds the API client, the session store and the configuration, and hands
//! out views that share them.

use std::sync::Arc;

use feedback_client::{FeedbackApi, HttpClient, NetworkHttpClient};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::core::{
    Access, AppConfig, AppResult, NavShell, NotificationPoller, Route, RouteGuard, SessionStore,
};
use crate::views::{
    ChangePasswordView, EmployeeDashboard, EmployeeFeedbackView, EmployeesView, FeedbackForm,
    FeedbackHistoryView, FeedbackRequestForm, FeedbackRequestsView, LoginView, ManagerDashboard,
    NotificationCenter, PasswordResetDialog, RegisterView, ViewContext,
};

pub struct App<H> {
    config: AppConfig,
    ctx: ViewContext<H>,
}

impl App<NetworkHttpClient> {
    /// Network client plus the session persisted under `session_dir`
    pub fn from_config(config: AppConfig) -> AppResult<Self> {
        let api = FeedbackApi::from_config(&config.client_config())?;
        let session = SessionStore::load(&config.session_dir)?;
        tracing::debug!(api_url = %config.api_url, "App initialized");
        Ok(Self::new(api, session, config))
    }
}

impl<H: HttpClient> App<H> {
    pub fn new(api: FeedbackApi<H>, session: SessionStore, config: AppConfig) -> Self {
        let ctx = ViewContext::new(api, session, config.timing());
        Self { config, ctx }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn session(&self) -> &SessionStore {
        &self.ctx.session
    }

    pub fn context(&self) -> &ViewContext<H> {
        &self.ctx
    }

    /// Resolve a path against the current session
    pub async fn navigate(&self, path: &str) -> Access {
        let session = self.ctx.session.current().await;
        RouteGuard::resolve(path, session.as_ref())
    }

    /// Check a protected route against the current session
    pub async fn guard(&self, route: Route) -> Access {
        let session = self.ctx.session.current().await;
        RouteGuard::check(route, session.as_ref())
    }

    /// Navigation shell for a granted route; `None` without a session
    pub async fn shell(&self, route: Route, unseen_notifications: usize) -> Option<NavShell> {
        let session = self.ctx.session.current().await?;
        Some(NavShell::new(&session, route, unseen_notifications))
    }

    pub async fn logout(&self) -> AppResult<()> {
        self.ctx.session.logout().await?;
        Ok(())
    }

    // ========== Views ==========

    pub fn login_view(&self) -> LoginView<H> {
        LoginView::new(self.ctx.clone())
    }

    pub fn password_reset_dialog(&self) -> PasswordResetDialog<H> {
        PasswordResetDialog::new(self.ctx.clone())
    }

    pub fn change_password_view(&self) -> ChangePasswordView<H> {
        ChangePasswordView::new(self.ctx.clone())
    }

    pub fn register_view(&self) -> RegisterView<H> {
        RegisterView::new(self.ctx.clone())
    }

    pub fn manager_dashboard(&self) -> ManagerDashboard<H> {
        ManagerDashboard::new(self.ctx.clone())
    }

    pub fn employees_view(&self) -> EmployeesView<H> {
        EmployeesView::new(self.ctx.clone())
    }

    pub fn feedback_form(&self) -> FeedbackForm<H> {
        FeedbackForm::new(self.ctx.clone())
    }

    pub fn feedback_history(&self) -> FeedbackHistoryView<H> {
        FeedbackHistoryView::new(self.ctx.clone())
    }

    pub fn feedback_requests(&self) -> FeedbackRequestsView<H> {
        FeedbackRequestsView::new(self.ctx.clone())
    }

    pub fn employee_dashboard(&self) -> EmployeeDashboard<H> {
        EmployeeDashboard::new(self.ctx.clone())
    }

    pub fn employee_feedback(&self) -> EmployeeFeedbackView<H> {
        EmployeeFeedbackView::new(self.ctx.clone())
    }

    pub fn feedback_request_form(&self) -> FeedbackRequestForm<H> {
        FeedbackRequestForm::new(self.ctx.clone())
    }

    pub fn notification_center(&self) -> NotificationCenter<H> {
        NotificationCenter::new(self.ctx.clone())
    }
}

impl<H: HttpClient + 'static> App<H> {
    /// Start refreshing `center` in the background until `shutdown` fires
    pub fn spawn_notification_poller(
        &self,
        center: Arc<Mutex<NotificationCenter<H>>>,
        shutdown: CancellationToken,
    ) -> JoinHandle<()> {
        NotificationPoller::new(center, self.ctx.timing.notification_poll).spawn(shutdown)
    }
}
