//! Feedback App - role-based employee feedback client
//!
//! Session store, role-gated routing, page view-state and the notification
//! widget, driven by the `feedback` command line front end.

pub mod app;
pub mod core;
pub mod logging;
pub mod views;

pub use app::App;
pub use crate::core::{
    Access, AppConfig, AppError, AppResult, Flash, NavShell, Route, RouteGuard, Session,
    SessionStore,
};
pub use views::ViewContext;
