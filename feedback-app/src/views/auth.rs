//! Auth views: login, password reset, change password, register

use feedback_client::{ChangePasswordRequest, ClientError, HttpClient, LoginRequest, ResetPasswordRequest};
use shared::models::{EmployeeCreate, Role};
use tokio_util::sync::CancellationToken;

use super::{NO_EMPLOYEE_MESSAGE, ViewContext, report};
use crate::core::error::{AppError, AppResult, require};
use crate::core::flash::Flash;
use crate::core::routes::Route;
use crate::core::session::Session;

/// 登录状态
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginState {
    Anonymous,
    Submitting,
    Authenticated(Role),
    Error(String),
}

/// Login page.
///
/// Owns a cancellation token that fires on [`LoginView::teardown`] or drop.
/// A response that arrives after that is discarded and never reaches the
/// session.
pub struct LoginView<H> {
    ctx: ViewContext<H>,
    pub employee_id: String,
    pub password: String,
    state: LoginState,
    flash: Flash,
    cancel: CancellationToken,
}

impl<H: HttpClient> LoginView<H> {
    pub fn new(ctx: ViewContext<H>) -> Self {
        let flash = ctx.flash();
        Self {
            ctx,
            employee_id: String::new(),
            password: String::new(),
            state: LoginState::Anonymous,
            flash,
            cancel: CancellationToken::new(),
        }
    }

    pub fn state(&self) -> &LoginState {
        &self.state
    }

    pub fn flash(&self) -> &Flash {
        &self.flash
    }

    /// Token cancelled when the view goes away
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn teardown(&self) {
        self.cancel.cancel();
    }

    /// Submit the credentials. On success the session is written and the
    /// role's dashboard is returned.
    pub async fn submit(&mut self) -> AppResult<Route> {
        let fields = require(&self.employee_id, "Employee ID is required").and_then(|id| {
            if self.password.is_empty() {
                return Err(AppError::validation("Password is required"));
            }
            Ok(id)
        });
        let employee_id = match fields {
            Ok(id) => id,
            Err(e) => {
                self.state = LoginState::Error(e.user_message(""));
                return report(&mut self.flash, Err(e), "");
            }
        };

        self.state = LoginState::Submitting;
        let request = LoginRequest {
            employee_id,
            password: self.password.clone(),
        };
        let token = self.cancel.clone();
        let result = tokio::select! {
            biased;
            _ = token.cancelled() => Err(ClientError::Cancelled),
            r = self.ctx.api.login(&request) => r,
        };

        match result {
            Ok(_) if self.cancel.is_cancelled() => {
                tracing::debug!("Login response arrived after teardown, discarded");
                self.state = LoginState::Anonymous;
                Err(ClientError::Cancelled.into())
            }
            Ok(identity) => {
                let session = Session::from(identity);
                let role = session.role;
                let name = session.name.clone();
                if let Err(e) = self.ctx.session.login(session).await {
                    self.state = LoginState::Error("Login failed.".into());
                    return report(&mut self.flash, Err(e.into()), "Login failed.");
                }
                self.password.clear();
                self.state = LoginState::Authenticated(role);
                self.flash.success(format!("Welcome, {}! Redirecting...", name));
                Ok(Route::dashboard_for(role))
            }
            Err(e) if e.is_cancelled() => {
                tracing::debug!("Login cancelled");
                self.state = LoginState::Anonymous;
                Err(e.into())
            }
            Err(e) => {
                let message = e.user_message("Login failed.");
                self.state = LoginState::Error(message);
                report(&mut self.flash, Err(e.into()), "Login failed.")
            }
        }
    }
}

impl<H> Drop for LoginView<H> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResetState {
    Idle,
    Submitting,
    Success,
    Error(String),
}

/// "Forgot password" dialog on the login page. Never logs in.
pub struct PasswordResetDialog<H> {
    ctx: ViewContext<H>,
    open: bool,
    pub employee_id: String,
    pub new_password: String,
    state: ResetState,
    flash: Flash,
}

impl<H: HttpClient> PasswordResetDialog<H> {
    pub fn new(ctx: ViewContext<H>) -> Self {
        let flash = ctx.flash();
        Self {
            ctx,
            open: false,
            employee_id: String::new(),
            new_password: String::new(),
            state: ResetState::Idle,
            flash,
        }
    }

    pub fn open(&mut self) {
        self.open = true;
        self.state = ResetState::Idle;
    }

    pub fn close(&mut self) {
        self.open = false;
        self.flash.clear();
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn state(&self) -> &ResetState {
        &self.state
    }

    pub fn flash(&self) -> &Flash {
        &self.flash
    }

    pub async fn submit(&mut self) -> AppResult<()> {
        let fields = require(&self.employee_id, "Employee ID is required").and_then(|id| {
            require(&self.new_password, "New password is required").map(|pw| (id, pw))
        });
        let (employee_id, new_password) = match fields {
            Ok(fields) => fields,
            Err(e) => {
                self.state = ResetState::Error(e.user_message(""));
                return report(&mut self.flash, Err(e), "");
            }
        };

        self.state = ResetState::Submitting;
        let request = ResetPasswordRequest {
            employee_id,
            new_password,
        };
        match self.ctx.api.reset_password(&request).await {
            Ok(()) => {
                tracing::info!(employee_id = %request.employee_id, "Password reset");
                self.employee_id.clear();
                self.new_password.clear();
                self.state = ResetState::Success;
                self.flash.success("Password has been reset successfully.");
                Ok(())
            }
            Err(e) => {
                self.state = ResetState::Error(e.user_message("Something went wrong."));
                report(&mut self.flash, Err(e.into()), "Something went wrong.")
            }
        }
    }
}

/// Employee change-password page
pub struct ChangePasswordView<H> {
    ctx: ViewContext<H>,
    pub old_password: String,
    pub new_password: String,
    loading: bool,
    flash: Flash,
}

impl<H: HttpClient> ChangePasswordView<H> {
    pub fn new(ctx: ViewContext<H>) -> Self {
        let flash = ctx.flash();
        Self {
            ctx,
            old_password: String::new(),
            new_password: String::new(),
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
        if self.old_password.is_empty() {
            return report(&mut self.flash, Err(AppError::validation("Old password is required")), "");
        }
        if self.new_password.trim().is_empty() {
            return report(&mut self.flash, Err(AppError::validation("New password is required")), "");
        }

        let request = ChangePasswordRequest {
            old_password: self.old_password.clone(),
            new_password: self.new_password.clone(),
        };
        self.loading = true;
        let result = self.ctx.api.change_password(&employee_id, &request).await;
        self.loading = false;

        report(&mut self.flash, result.map_err(AppError::from), "Failed to change password.")?;
        self.old_password.clear();
        self.new_password.clear();
        self.flash.success("Password changed successfully.");
        Ok(())
    }
}

/// Registration form fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterDraft {
    pub employee_id: String,
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

impl Default for RegisterDraft {
    fn default() -> Self {
        Self {
            employee_id: String::new(),
            name: String::new(),
            email: String::new(),
            password: String::new(),
            role: Role::Manager,
        }
    }
}

/// Manager-only "register user" page
pub struct RegisterView<H> {
    ctx: ViewContext<H>,
    pub draft: RegisterDraft,
    loading: bool,
    flash: Flash,
}

impl<H: HttpClient> RegisterView<H> {
    pub fn new(ctx: ViewContext<H>) -> Self {
        let flash = ctx.flash();
        Self {
            ctx,
            draft: RegisterDraft::default(),
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

    fn payload(&self, manager_id: Option<String>) -> AppResult<EmployeeCreate> {
        let d = &self.draft;
        let employee_id = require(&d.employee_id, "Employee ID is required")?;
        let name = require(&d.name, "Name is required")?;
        let email = require(&d.email, "Email is required")?;
        if d.password.is_empty() {
            return Err(AppError::validation("Password is required"));
        }
        let manager_employee_id = match d.role {
            Role::Employee => Some(manager_id.ok_or_else(|| {
                AppError::validation("Manager ID not found. Cannot register employee.")
            })?),
            Role::Manager => None,
        };
        Ok(EmployeeCreate {
            employee_id,
            name,
            email,
            password: d.password.clone(),
            role: d.role,
            manager_employee_id,
        })
    }

    pub async fn submit(&mut self) -> AppResult<()> {
        let manager_id = self.ctx.session.employee_id().await;
        let payload = self.payload(manager_id);
        let payload = report(&mut self.flash, payload, "")?;

        self.loading = true;
        let result = self.ctx.api.register(&payload).await;
        self.loading = false;

        report(&mut self.flash, result.map_err(AppError::from), "Registration failed.")?;
        tracing::info!(employee_id = %payload.employee_id, role = %payload.role, "User registered");
        self.draft = RegisterDraft::default();
        self.flash.success("User registered successfully!");
        Ok(())
    }
}
