mod common;

use std::time::Duration;

use axum::http::StatusCode;
use common::{Backend, test_config};
use feedback_app::views::LoginState;
use feedback_app::views::auth::ResetState;
use feedback_app::{Access, App, AppConfig, AppError, Route, SessionStore};
use feedback_client::{ClientError, NETWORK_ERROR_MESSAGE};
use serde_json::json;
use shared::models::Role;

#[tokio::test]
async fn test_manager_login_populates_session() {
    let backend = Backend::seeded();
    let app = backend.app();

    let mut view = app.login_view();
    view.employee_id = "M1".into();
    view.password = "secret".into();
    let route = view.submit().await.unwrap();

    assert_eq!(route, Route::ManagerDashboard);
    assert_eq!(view.state(), &LoginState::Authenticated(Role::Manager));
    assert_eq!(view.flash().success_message(), Some("Welcome, Maria! Redirecting..."));

    let session = app.session().current().await.unwrap();
    assert_eq!(session.employee_id, "M1");
    assert_eq!(session.role, Role::Manager);
    assert_eq!(session.email, "maria@acme.io");
}

#[tokio::test]
async fn test_employee_login_goes_to_employee_dashboard() {
    let backend = Backend::seeded();
    let app = backend.app();

    let mut view = app.login_view();
    view.employee_id = " E1 ".into();
    view.password = "pw1".into();
    assert_eq!(view.submit().await.unwrap(), Route::EmployeeDashboard);
    assert_eq!(
        app.navigate("/").await,
        Access::Redirect(Route::EmployeeDashboard)
    );
    assert!(app.navigate("/employeefeedback").await.is_granted());
    assert_eq!(app.navigate("/employees").await, Access::Redirect(Route::Login));
}

#[tokio::test(start_paused = true)]
async fn test_invalid_login_shows_error_that_expires() {
    let backend = Backend::seeded();
    let app = backend.app();

    let mut view = app.login_view();
    view.employee_id = "M1".into();
    view.password = "wrong".into();
    let err = view.submit().await.unwrap_err();

    assert!(matches!(err, AppError::Client(_)));
    assert!(app.session().current().await.is_none());
    assert_eq!(
        view.state(),
        &LoginState::Error("Invalid employee ID or password".into())
    );
    assert_eq!(view.flash().error_message(), Some("Invalid employee ID or password"));

    tokio::time::advance(Duration::from_secs(5)).await;
    assert!(view.flash().current().is_none());
}

#[tokio::test]
async fn test_unparseable_login_error_uses_fallback() {
    let backend = Backend::seeded();
    backend.fail("POST /users/login", StatusCode::INTERNAL_SERVER_ERROR, json!([1, 2]));
    let app = backend.app();

    let mut view = app.login_view();
    view.employee_id = "M1".into();
    view.password = "secret".into();
    view.submit().await.unwrap_err();
    assert_eq!(view.flash().error_message(), Some("Login failed."));
}

#[tokio::test]
async fn test_blank_fields_never_reach_backend() {
    let backend = Backend::seeded();
    let app = backend.app();

    let mut view = app.login_view();
    view.password = "secret".into();
    let err = view.submit().await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    assert_eq!(view.flash().error_message(), Some("Employee ID is required"));

    view.employee_id = "M1".into();
    view.password.clear();
    view.submit().await.unwrap_err();
    assert_eq!(view.flash().error_message(), Some("Password is required"));

    assert!(backend.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_cancelled_login_never_writes_session() {
    let backend = Backend::seeded();
    backend.set_login_delay(Duration::from_secs(2));
    let app = backend.app();

    let mut view = app.login_view();
    view.employee_id = "M1".into();
    view.password = "secret".into();
    let token = view.cancellation_token();

    let (result, ()) = tokio::join!(view.submit(), async {
        tokio::time::sleep(Duration::from_millis(100)).await;
        token.cancel();
    });

    assert!(result.unwrap_err().is_cancelled());
    assert_eq!(view.state(), &LoginState::Anonymous);
    assert!(view.flash().current().is_none());
    assert!(app.session().current().await.is_none());
}

#[tokio::test]
async fn test_dropped_login_view_cancels() {
    let backend = Backend::seeded();
    let app = backend.app();

    let view = app.login_view();
    let token = view.cancellation_token();
    assert!(!token.is_cancelled());
    drop(view);
    assert!(token.is_cancelled());

    let mut view = app.login_view();
    view.employee_id = "M1".into();
    view.password = "secret".into();
    view.teardown();
    assert!(view.submit().await.unwrap_err().is_cancelled());
    assert!(app.session().current().await.is_none());
}

#[tokio::test]
async fn test_password_reset_dialog() {
    let backend = Backend::seeded();
    let app = backend.app();

    let mut dialog = app.password_reset_dialog();
    dialog.open();
    assert!(dialog.is_open());
    dialog.employee_id = "E1".into();
    dialog.new_password = "fresh".into();
    dialog.submit().await.unwrap();

    assert_eq!(dialog.state(), &ResetState::Success);
    assert_eq!(
        dialog.flash().success_message(),
        Some("Password has been reset successfully.")
    );
    assert!(dialog.employee_id.is_empty());
    assert!(dialog.new_password.is_empty());
    assert!(app.session().current().await.is_none());

    dialog.close();
    assert!(!dialog.is_open());

    let mut login = app.login_view();
    login.employee_id = "E1".into();
    login.password = "fresh".into();
    assert_eq!(login.submit().await.unwrap(), Route::EmployeeDashboard);
}

#[tokio::test]
async fn test_password_reset_unknown_user() {
    let backend = Backend::seeded();
    let app = backend.app();

    let mut dialog = app.password_reset_dialog();
    dialog.open();
    dialog.employee_id = "NOPE".into();
    dialog.new_password = "x".into();
    dialog.submit().await.unwrap_err();
    assert_eq!(dialog.state(), &ResetState::Error("User not found".into()));
    assert_eq!(dialog.employee_id, "NOPE");
}

#[tokio::test]
async fn test_change_password() {
    let backend = Backend::seeded();
    let app = backend.app_as("E1").await;

    let mut view = app.change_password_view();
    view.old_password = "bad".into();
    view.new_password = "next".into();
    view.submit().await.unwrap_err();
    assert_eq!(view.flash().error_message(), Some("Old password is incorrect"));

    view.old_password = "pw1".into();
    view.submit().await.unwrap();
    assert_eq!(view.flash().success_message(), Some("Password changed successfully."));
    assert!(view.old_password.is_empty());
    assert_eq!(
        backend.calls().last().map(String::as_str),
        Some("PATCH /users/change-password/E1")
    );
}

#[tokio::test]
async fn test_change_password_without_session() {
    let backend = Backend::seeded();
    let app = backend.app();

    let mut view = app.change_password_view();
    view.old_password = "a".into();
    view.new_password = "b".into();
    let err = view.submit().await.unwrap_err();
    assert!(matches!(err, AppError::NotAuthenticated(_)));
    assert_eq!(view.flash().error_message(), Some("No employee logged in."));
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn test_register_employee_attaches_manager() {
    let backend = Backend::seeded();
    let app = backend.app_as("M1").await;

    let mut view = app.register_view();
    view.draft.employee_id = "E9".into();
    view.draft.name = "Nina".into();
    view.draft.email = "nina@acme.io".into();
    view.draft.password = "pw".into();
    view.draft.role = Role::Employee;
    view.submit().await.unwrap();

    assert_eq!(view.flash().success_message(), Some("User registered successfully!"));
    assert_eq!(view.draft.role, Role::Manager);
    assert!(view.draft.employee_id.is_empty());

    let manager = backend.with_db(|db| {
        db.users
            .iter()
            .find(|u| u.employee.employee_id == "E9")
            .and_then(|u| u.employee.manager_employee_id.clone())
    });
    assert_eq!(manager.as_deref(), Some("M1"));
}

#[tokio::test]
async fn test_register_manager_sends_no_manager_id() {
    let backend = Backend::seeded();
    let app = backend.app_as("M1").await;

    let mut view = app.register_view();
    view.draft.employee_id = "M9".into();
    view.draft.name = "Mona".into();
    view.draft.email = "mona@acme.io".into();
    view.draft.password = "pw".into();
    view.submit().await.unwrap();

    let manager = backend.with_db(|db| {
        db.users
            .iter()
            .find(|u| u.employee.employee_id == "M9")
            .map(|u| u.employee.manager_employee_id.clone())
    });
    assert_eq!(manager, Some(None));
}

#[tokio::test]
async fn test_register_employee_without_manager_session() {
    let backend = Backend::seeded();
    let app = backend.app();

    let mut view = app.register_view();
    view.draft.employee_id = "E9".into();
    view.draft.name = "Nina".into();
    view.draft.email = "nina@acme.io".into();
    view.draft.password = "pw".into();
    view.draft.role = Role::Employee;
    view.submit().await.unwrap_err();

    assert_eq!(
        view.flash().error_message(),
        Some("Manager ID not found. Cannot register employee.")
    );
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn test_session_survives_restart_and_logout_clears_it() {
    let dir = tempfile::tempdir().unwrap();
    let backend = Backend::seeded();

    let app = App::new(backend.api(), SessionStore::load(dir.path()).unwrap(), test_config());
    let mut view = app.login_view();
    view.employee_id = "E2".into();
    view.password = "pw2".into();
    view.submit().await.unwrap();

    let restarted = App::new(backend.api(), SessionStore::load(dir.path()).unwrap(), test_config());
    assert_eq!(restarted.session().employee_id().await.as_deref(), Some("E2"));
    assert_eq!(restarted.guard(Route::Notifications).await, Access::Granted(Route::Notifications));

    restarted.logout().await.unwrap();
    let after_logout = SessionStore::load(dir.path()).unwrap();
    assert!(after_logout.current().await.is_none());
}

#[tokio::test]
async fn test_corrupted_session_file_redirects_to_login() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join(feedback_app::core::session::SESSION_FILE),
        "{ not json",
    )
    .unwrap();

    let backend = Backend::seeded();
    let app = App::new(backend.api(), SessionStore::load(dir.path()).unwrap(), test_config());
    assert_eq!(
        app.navigate("/dashboardforemployee").await,
        Access::Redirect(Route::Login)
    );
    assert_eq!(app.navigate("/").await, Access::Granted(Route::Login));
}

#[tokio::test]
async fn test_unreachable_backend_shows_network_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = AppConfig {
        api_url: "http://127.0.0.1:1".into(),
        session_dir: dir.path().to_path_buf(),
        request_timeout_secs: 5,
        ..AppConfig::default()
    };
    let app = App::from_config(config).unwrap();

    let mut view = app.login_view();
    view.employee_id = "M1".into();
    view.password = "secret".into();
    let err = view.submit().await.unwrap_err();

    assert!(matches!(err, AppError::Client(ClientError::Http(_))));
    assert_eq!(view.flash().error_message(), Some(NETWORK_ERROR_MESSAGE));
    assert_eq!(view.state(), &LoginState::Error(NETWORK_ERROR_MESSAGE.into()));
    assert!(app.session().current().await.is_none());
    assert!(!dir.path().join(feedback_app::core::session::SESSION_FILE).exists());
}
