//! Role-gated routing
//!
//! Every protected page goes through [`RouteGuard`]: no session, or a session
//! with the wrong role, redirects to the login route without rendering.

use shared::models::Role;

use super::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    // manager
    ManagerDashboard,
    Employees,
    SubmitFeedback,
    FeedbackHistory,
    FeedbackRequests,
    Register,
    // employee
    EmployeeDashboard,
    EmployeeFeedback,
    RequestFeedback,
    ChangePassword,
    Notifications,
}

impl Route {
    pub const MANAGER_PAGES: [Route; 6] = [
        Route::ManagerDashboard,
        Route::Employees,
        Route::SubmitFeedback,
        Route::FeedbackHistory,
        Route::FeedbackRequests,
        Route::Register,
    ];

    pub const EMPLOYEE_PAGES: [Route; 5] = [
        Route::EmployeeDashboard,
        Route::EmployeeFeedback,
        Route::RequestFeedback,
        Route::ChangePassword,
        Route::Notifications,
    ];

    /// Parse a path. Query strings and trailing slashes are ignored.
    pub fn from_path(path: &str) -> Option<Route> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim().trim_end_matches('/');
        let route = match trimmed {
            "" | "/login" => Route::Login,
            "/dashboardformanager" => Route::ManagerDashboard,
            "/employee" | "/employees" => Route::Employees,
            "/feedback" => Route::SubmitFeedback,
            "/feedback-history" => Route::FeedbackHistory,
            "/requested-feedback" => Route::FeedbackRequests,
            "/register" => Route::Register,
            "/dashboardforemployee" => Route::EmployeeDashboard,
            "/employeefeedback" => Route::EmployeeFeedback,
            "/feedbackrequestform" => Route::RequestFeedback,
            "/changepassword" => Route::ChangePassword,
            "/notification" => Route::Notifications,
            _ => return None,
        };
        Some(route)
    }

    /// Canonical path
    pub fn path(self) -> &'static str {
        match self {
            Route::Login => "/",
            Route::ManagerDashboard => "/dashboardformanager",
            Route::Employees => "/employees",
            Route::SubmitFeedback => "/feedback",
            Route::FeedbackHistory => "/feedback-history",
            Route::FeedbackRequests => "/requested-feedback",
            Route::Register => "/register",
            Route::EmployeeDashboard => "/dashboardforemployee",
            Route::EmployeeFeedback => "/employeefeedback",
            Route::RequestFeedback => "/feedbackrequestform",
            Route::ChangePassword => "/changepassword",
            Route::Notifications => "/notification",
        }
    }

    /// Sidebar label
    pub fn title(self) -> &'static str {
        match self {
            Route::Login => "Login",
            Route::ManagerDashboard | Route::EmployeeDashboard => "Dashboard",
            Route::Employees => "Employees",
            Route::SubmitFeedback => "Give Feedback",
            Route::FeedbackHistory => "Feedback History",
            Route::FeedbackRequests => "Feedback Requests",
            Route::Register => "Register User",
            Route::EmployeeFeedback => "My Feedback",
            Route::RequestFeedback => "Request Feedback",
            Route::ChangePassword => "Change Password",
            Route::Notifications => "Notifications",
        }
    }

    /// Role a session needs to open this route; `None` for public routes
    pub fn required_role(self) -> Option<Role> {
        match self {
            Route::Login => None,
            Route::ManagerDashboard
            | Route::Employees
            | Route::SubmitFeedback
            | Route::FeedbackHistory
            | Route::FeedbackRequests
            | Route::Register => Some(Role::Manager),
            Route::EmployeeDashboard
            | Route::EmployeeFeedback
            | Route::RequestFeedback
            | Route::ChangePassword
            | Route::Notifications => Some(Role::Employee),
        }
    }

    pub fn dashboard_for(role: Role) -> Route {
        match role {
            Role::Manager => Route::ManagerDashboard,
            Role::Employee => Route::EmployeeDashboard,
        }
    }

    pub fn pages_for(role: Role) -> &'static [Route] {
        match role {
            Role::Manager => &Self::MANAGER_PAGES,
            Role::Employee => &Self::EMPLOYEE_PAGES,
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

/// Outcome of a navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Granted(Route),
    Redirect(Route),
}

impl Access {
    /// Route that ends up rendered
    pub fn route(self) -> Route {
        match self {
            Access::Granted(route) | Access::Redirect(route) => route,
        }
    }

    pub fn is_granted(self) -> bool {
        matches!(self, Access::Granted(_))
    }
}

pub struct RouteGuard;

impl RouteGuard {
    /// Check one route against the session
    pub fn check(route: Route, session: Option<&Session>) -> Access {
        let Some(required) = route.required_role() else {
            return Access::Granted(route);
        };
        match session {
            Some(s) if s.role == required && !s.employee_id.trim().is_empty() => {
                Access::Granted(route)
            }
            Some(s) => {
                tracing::warn!(route = %route, role = %s.role, "Role mismatch, redirecting to login");
                Access::Redirect(Route::Login)
            }
            None => {
                tracing::debug!(route = %route, "No session, redirecting to login");
                Access::Redirect(Route::Login)
            }
        }
    }

    /// Resolve a raw path. Unknown paths go to login; the login route sends a
    /// logged-in user to their dashboard.
    pub fn resolve(path: &str, session: Option<&Session>) -> Access {
        match Route::from_path(path) {
            None => Access::Redirect(Route::Login),
            Some(Route::Login) => match session {
                Some(s) => Access::Redirect(Route::dashboard_for(s.role)),
                None => Access::Granted(Route::Login),
            },
            Some(route) => Self::check(route, session),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavItem {
    pub label: &'static str,
    pub route: Route,
    pub active: bool,
}

/// Role-specific sidebar and header around a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavShell {
    pub role: Role,
    pub header: String,
    pub items: Vec<NavItem>,
    /// Unseen notification badge (employees only)
    pub unseen_notifications: Option<usize>,
}

impl NavShell {
    pub fn new(session: &Session, current: Route, unseen_notifications: usize) -> Self {
        let header = if session.name.trim().is_empty() {
            match session.role {
                Role::Manager => "Welcome, Manager!".to_string(),
                Role::Employee => "Welcome, Employee!".to_string(),
            }
        } else {
            format!("Welcome, {}!", session.name.trim())
        };
        let items = Route::pages_for(session.role)
            .iter()
            .map(|&route| NavItem {
                label: route.title(),
                route,
                active: route == current,
            })
            .collect();
        Self {
            role: session.role,
            header,
            items,
            unseen_notifications: (session.role == Role::Employee).then_some(unseen_notifications),
        }
    }
}
