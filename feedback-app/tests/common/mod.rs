//! In-memory fake of the feedback backend, served through an axum Router

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, patch, post, put};
use axum::{Json, Router};
use feedback_app::core::Timing;
use feedback_app::{App, AppConfig, Session, SessionStore};
use feedback_client::{FeedbackApi, OneshotHttpClient};
use serde_json::{Value, json};
use shared::models::{
    CommentCreate, Employee, EmployeeCreate, EmployeeUpdate, Feedback, FeedbackCreate,
    FeedbackRequest, FeedbackRequestCreate, FeedbackUpdate, Notification, Role, Sentiment,
};

pub struct User {
    pub employee: Employee,
    pub password: String,
}

#[derive(Default)]
pub struct FakeDb {
    pub users: Vec<User>,
    pub feedback: Vec<Feedback>,
    pub requests: Vec<FeedbackRequest>,
    pub notifications: Vec<Notification>,
    pub next_id: i64,
    pub calls: Vec<String>,
    pub failures: HashMap<String, (StatusCode, Value)>,
    pub login_delay: Option<Duration>,
    /// Calls that never get a reply
    pub stalls: HashSet<String>,
}

impl FakeDb {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn user(&self, employee_id: &str) -> Option<&User> {
        self.users.iter().find(|u| u.employee.employee_id == employee_id)
    }

    fn manager_name(&self, manager_id: &str) -> Option<String> {
        self.user(manager_id).map(|u| u.employee.name.clone())
    }
}

type Reply = (StatusCode, Json<Value>);
type Db = Arc<Mutex<FakeDb>>;

fn not_found(what: &str) -> Reply {
    (StatusCode::NOT_FOUND, Json(json!({ "detail": format!("{} not found", what) })))
}

/// Record the call and apply any injected failure or stall
async fn begin(db: &Db, call: String) -> Result<MutexGuard<'_, FakeDb>, Reply> {
    let stalled = db.lock().unwrap().stalls.contains(&call);
    if stalled {
        std::future::pending::<()>().await;
    }
    let mut guard = db.lock().unwrap();
    let failure = guard.failures.get(&call).cloned();
    guard.calls.push(call);
    match failure {
        Some((status, body)) => Err((status, Json(body))),
        None => Ok(guard),
    }
}

#[derive(Clone)]
pub struct Backend {
    db: Db,
}

impl Backend {
    pub fn empty() -> Self {
        Self {
            db: Arc::new(Mutex::new(FakeDb::default())),
        }
    }

    /// Two managers, two employees, three feedback rows, two requests and
    /// three notifications for E1.
    pub fn seeded() -> Self {
        let backend = Self::empty();
        backend.with_db(|db| {
            let user = |id: &str, name: &str, role: Role, manager: Option<&str>, password: &str| User {
                employee: Employee {
                    employee_id: id.into(),
                    name: name.into(),
                    email: format!("{}@acme.io", name.to_lowercase()),
                    role,
                    manager_employee_id: manager.map(str::to_string),
                },
                password: password.into(),
            };
            db.users = vec![
                user("M1", "Maria", Role::Manager, None, "secret"),
                user("M2", "Marco", Role::Manager, None, "secret"),
                user("E1", "Evan", Role::Employee, Some("M1"), "pw1"),
                user("E2", "Erin", Role::Employee, Some("M1"), "pw2"),
            ];
            let fb = |id: i64, emp: &str, s: Sentiment, strengths: &str, improvement: &str, tags: &[&str]| Feedback {
                id,
                employee_id: emp.into(),
                manager_employee_id: Some("M1".into()),
                manager_name: Some("Maria".into()),
                strengths: strengths.into(),
                improvement: improvement.into(),
                sentiment: s,
                anonymous: false,
                tags: tags.iter().map(|t| t.to_string()).collect(),
                acknowledged: false,
                comments: vec![],
                created_at: Some(format!("2024-05-0{}T10:00:00", id)),
            };
            db.feedback = vec![
                fb(1, "E1", Sentiment::Positive, "Great code reviews", "Estimates", &["reviews"]),
                fb(2, "E1", Sentiment::Neutral, "Clear docs", "Testing", &["docs", "testing"]),
                fb(3, "E2", Sentiment::Negative, "Helpful", "Punctuality", &[]),
            ];
            db.requests = vec![
                FeedbackRequest {
                    id: 1,
                    employee_id: "E1".into(),
                    manager_employee_id: "M1".into(),
                    message: "Please review my sprint".into(),
                    seen: false,
                    created_at: None,
                },
                FeedbackRequest {
                    id: 2,
                    employee_id: "E2".into(),
                    manager_employee_id: "M1".into(),
                    message: "Quarterly check-in".into(),
                    seen: true,
                    created_at: None,
                },
            ];
            db.notifications = (1..=3)
                .map(|id| Notification {
                    id,
                    employee_id: "E1".into(),
                    message: format!("New feedback #{}", id),
                    manager_name: Some("Maria".into()),
                    seen: id == 3,
                    created_at: None,
                })
                .collect();
            db.next_id = 100;
        });
        backend
    }

    pub fn with_db<R>(&self, f: impl FnOnce(&mut FakeDb) -> R) -> R {
        f(&mut self.db.lock().unwrap())
    }

    pub fn calls(&self) -> Vec<String> {
        self.with_db(|db| db.calls.clone())
    }

    pub fn clear_calls(&self) {
        self.with_db(|db| db.calls.clear());
    }

    /// Make `call` ("PATCH /feedback/acknowledge/1") fail with `status`
    pub fn fail(&self, call: &str, status: StatusCode, body: Value) {
        self.with_db(|db| {
            db.failures.insert(call.to_string(), (status, body));
        });
    }

    /// Make `call` hang forever
    pub fn stall(&self, call: &str) {
        self.with_db(|db| {
            db.stalls.insert(call.to_string());
        });
    }

    pub fn unstall(&self, call: &str) {
        self.with_db(|db| {
            db.stalls.remove(call);
        });
    }

    pub fn set_login_delay(&self, delay: Duration) {
        self.with_db(|db| db.login_delay = Some(delay));
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/users/login", post(login))
            .route("/users/", post(register))
            .route("/users/reset-password", post(reset_password))
            .route("/users/change-password/{id}", patch(change_password))
            .route("/users/manager/{id}/employees", get(manager_employees))
            .route("/users/dashboard/manager/{id}", get(manager_dashboard))
            .route("/users/dashboard/employee/{id}", get(employee_dashboard))
            .route("/users/{id}/{employee_id}", put(update_employee).delete(delete_employee))
            .route("/feedback/", post(create_feedback))
            .route("/feedback/manager/{id}", get(manager_feedback).delete(delete_manager_feedback))
            .route("/feedback/employee/{id}", get(employee_feedback))
            .route("/feedback/acknowledge/{id}", patch(acknowledge))
            .route("/feedback/comment/{id}", post(comment))
            .route("/feedback/request", post(request_feedback))
            .route("/feedback/requests/{id}", get(list_requests))
            .route("/feedback/requests/{id}/seen", patch(request_seen))
            .route("/feedback/requests/{id}/count-unseen", get(count_unseen))
            .route("/feedback/notifications/{id}", get(notifications).patch(toggle_notification))
            .route("/feedback/notifications/mark-all-seen/{id}", patch(mark_all_seen))
            .route("/feedback/{id}", put(update_feedback).delete(delete_feedback))
            .with_state(Arc::clone(&self.db))
    }

    pub fn api(&self) -> FeedbackApi<OneshotHttpClient> {
        FeedbackApi::new(OneshotHttpClient::new(self.router()))
    }

    /// App over this backend with an in-memory session
    pub fn app(&self) -> App<OneshotHttpClient> {
        App::new(self.api(), SessionStore::in_memory(), test_config())
    }

    /// App already logged in as `employee_id`
    pub async fn app_as(&self, employee_id: &str) -> App<OneshotHttpClient> {
        let app = self.app();
        let employee = self
            .with_db(|db| db.user(employee_id).map(|u| u.employee.clone()))
            .expect("seeded user");
        app.session()
            .login(Session {
                employee_id: employee.employee_id,
                name: employee.name,
                email: employee.email,
                role: employee.role,
            })
            .await
            .unwrap();
        self.clear_calls();
        app
    }
}

pub fn test_config() -> AppConfig {
    AppConfig {
        api_url: "http://fake-backend".into(),
        ..AppConfig::default()
    }
}

pub fn test_timing() -> Timing {
    test_config().timing()
}

// ========== Handlers ==========

async fn login(State(db): State<Db>, Json(body): Json<Value>) -> Result<Json<Value>, Reply> {
    let delay = db.lock().unwrap().login_delay;
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }
    let db = begin(&db, "POST /users/login".into()).await?;
    let id = body["employee_id"].as_str().unwrap_or_default();
    let password = body["password"].as_str().unwrap_or_default();
    match db.user(id) {
        Some(u) if u.password == password => Ok(Json(json!({
            "employee_id": u.employee.employee_id,
            "name": u.employee.name,
            "email": u.employee.email,
            "role": u.employee.role,
        }))),
        _ => Err((
            StatusCode::UNAUTHORIZED,
            Json(json!({ "detail": "Invalid employee ID or password" })),
        )),
    }
}

async fn register(State(db): State<Db>, Json(body): Json<EmployeeCreate>) -> Result<Json<Value>, Reply> {
    let mut db = begin(&db, "POST /users/".into()).await?;
    if db.user(&body.employee_id).is_some() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "detail": "Employee ID already registered" })),
        ));
    }
    db.users.push(User {
        employee: Employee {
            employee_id: body.employee_id,
            name: body.name,
            email: body.email,
            role: body.role,
            manager_employee_id: body.manager_employee_id,
        },
        password: body.password,
    });
    Ok(Json(json!({ "message": "User created" })))
}

async fn reset_password(State(db): State<Db>, Json(body): Json<Value>) -> Result<Json<Value>, Reply> {
    let mut db = begin(&db, "POST /users/reset-password".into()).await?;
    let id = body["employee_id"].as_str().unwrap_or_default().to_string();
    let new_password = body["new_password"].as_str().unwrap_or_default().to_string();
    let user = db
        .users
        .iter_mut()
        .find(|u| u.employee.employee_id == id)
        .ok_or_else(|| not_found("User"))?;
    user.password = new_password;
    Ok(Json(json!({ "message": "Password reset" })))
}

async fn change_password(
    State(db): State<Db>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<StatusCode, Reply> {
    let mut db = begin(&db, format!("PATCH /users/change-password/{}", id)).await?;
    let old = body["old_password"].as_str().unwrap_or_default().to_string();
    let new = body["new_password"].as_str().unwrap_or_default().to_string();
    let user = db
        .users
        .iter_mut()
        .find(|u| u.employee.employee_id == id)
        .ok_or_else(|| not_found("User"))?;
    if user.password != old {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "detail": "Old password is incorrect" })),
        ));
    }
    user.password = new;
    Ok(StatusCode::NO_CONTENT)
}

async fn manager_employees(State(db): State<Db>, Path(id): Path<String>) -> Result<Json<Value>, Reply> {
    let db = begin(&db, format!("GET /users/manager/{}/employees", id)).await?;
    let list: Vec<&Employee> = db
        .users
        .iter()
        .map(|u| &u.employee)
        .filter(|e| e.manager_employee_id.as_deref() == Some(id.as_str()))
        .collect();
    Ok(Json(json!(list)))
}

async fn manager_dashboard(State(db): State<Db>, Path(id): Path<String>) -> Result<Json<Value>, Reply> {
    let db = begin(&db, format!("GET /users/dashboard/manager/{}", id)).await?;
    let rows: Vec<Value> = db
        .users
        .iter()
        .map(|u| &u.employee)
        .filter(|e| e.manager_employee_id.as_deref() == Some(id.as_str()))
        .map(|e| {
            let mine: Vec<&Feedback> = db.feedback.iter().filter(|f| f.employee_id == e.employee_id).collect();
            let count = |s: Sentiment| mine.iter().filter(|f| f.sentiment == s).count();
            json!({
                "employee_id": e.employee_id,
                "name": e.name,
                "feedback_count": mine.len(),
                "positive": count(Sentiment::Positive),
                "neutral": count(Sentiment::Neutral),
                "negative": count(Sentiment::Negative),
            })
        })
        .collect();
    Ok(Json(json!(rows)))
}

async fn employee_dashboard(State(db): State<Db>, Path(id): Path<String>) -> Result<Json<Value>, Reply> {
    let db = begin(&db, format!("GET /users/dashboard/employee/{}", id)).await?;
    let timeline: Vec<Value> = db
        .feedback
        .iter()
        .filter(|f| f.employee_id == id)
        .map(|f| {
            json!({
                "feedback_id": f.id,
                "manager_name": f.manager_name,
                "sentiment": f.sentiment,
                "strengths": f.strengths,
                "improvement": f.improvement,
                "acknowledged": f.acknowledged,
                "created_at": f.created_at,
            })
        })
        .collect();
    Ok(Json(json!(timeline)))
}

async fn update_employee(
    State(db): State<Db>,
    Path((manager_id, employee_id)): Path<(String, String)>,
    Json(body): Json<EmployeeUpdate>,
) -> Result<Json<Value>, Reply> {
    let mut db = begin(&db, format!("PUT /users/{}/{}", manager_id, employee_id)).await?;
    let user = db
        .users
        .iter_mut()
        .find(|u| u.employee.employee_id == employee_id)
        .ok_or_else(|| not_found("Employee"))?;
    body.apply_to(&mut user.employee);
    if let Some(password) = body.password {
        user.password = password;
    }
    Ok(Json(json!(user.employee)))
}

async fn delete_employee(
    State(db): State<Db>,
    Path((manager_id, employee_id)): Path<(String, String)>,
) -> Result<StatusCode, Reply> {
    let mut db = begin(&db, format!("DELETE /users/{}/{}", manager_id, employee_id)).await?;
    let before = db.users.len();
    db.users.retain(|u| u.employee.employee_id != employee_id);
    if db.users.len() == before {
        return Err(not_found("Employee"));
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn create_feedback(State(db): State<Db>, Json(body): Json<FeedbackCreate>) -> Result<StatusCode, Reply> {
    let mut db = begin(&db, "POST /feedback/".into()).await?;
    let id = db.next_id();
    let manager_name = body.manager_employee_id.as_deref().and_then(|m| db.manager_name(m));
    db.feedback.push(Feedback {
        id,
        employee_id: body.employee_id,
        manager_employee_id: body.manager_employee_id,
        manager_name,
        strengths: body.strengths,
        improvement: body.improvement,
        sentiment: body.sentiment,
        anonymous: body.anonymous,
        tags: body.tags,
        acknowledged: false,
        comments: vec![],
        created_at: Some("2024-06-01T09:00:00".into()),
    });
    Ok(StatusCode::CREATED)
}

async fn manager_feedback(State(db): State<Db>, Path(id): Path<String>) -> Result<Json<Value>, Reply> {
    let db = begin(&db, format!("GET /feedback/manager/{}", id)).await?;
    let list: Vec<&Feedback> = db
        .feedback
        .iter()
        .filter(|f| f.manager_employee_id.as_deref() == Some(id.as_str()))
        .collect();
    Ok(Json(json!(list)))
}

async fn delete_manager_feedback(State(db): State<Db>, Path(id): Path<String>) -> Result<Json<Value>, Reply> {
    let mut db = begin(&db, format!("DELETE /feedback/manager/{}", id)).await?;
    db.feedback.retain(|f| f.manager_employee_id.as_deref() != Some(id.as_str()));
    Ok(Json(json!({ "message": "Deleted" })))
}

async fn employee_feedback(State(db): State<Db>, Path(id): Path<String>) -> Result<Json<Value>, Reply> {
    let db = begin(&db, format!("GET /feedback/employee/{}", id)).await?;
    let list: Vec<&Feedback> = db.feedback.iter().filter(|f| f.employee_id == id).collect();
    Ok(Json(json!(list)))
}

async fn update_feedback(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Json(body): Json<FeedbackUpdate>,
) -> Result<Json<Value>, Reply> {
    let mut db = begin(&db, format!("PUT /feedback/{}", id)).await?;
    let fb = db
        .feedback
        .iter_mut()
        .find(|f| f.id == id)
        .ok_or_else(|| not_found("Feedback"))?;
    body.apply_to(fb);
    Ok(Json(json!(fb)))
}

async fn delete_feedback(State(db): State<Db>, Path(id): Path<i64>) -> Result<StatusCode, Reply> {
    let mut db = begin(&db, format!("DELETE /feedback/{}", id)).await?;
    db.feedback.retain(|f| f.id != id);
    Ok(StatusCode::NO_CONTENT)
}

async fn acknowledge(State(db): State<Db>, Path(id): Path<i64>) -> Result<Json<Value>, Reply> {
    let mut db = begin(&db, format!("PATCH /feedback/acknowledge/{}", id)).await?;
    let fb = db
        .feedback
        .iter_mut()
        .find(|f| f.id == id)
        .ok_or_else(|| not_found("Feedback"))?;
    fb.acknowledged = true;
    Ok(Json(json!({ "message": "Acknowledged" })))
}

async fn comment(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Json(body): Json<CommentCreate>,
) -> Result<Json<Value>, Reply> {
    let mut db = begin(&db, format!("POST /feedback/comment/{}", id)).await?;
    let fb = db
        .feedback
        .iter_mut()
        .find(|f| f.id == id)
        .ok_or_else(|| not_found("Feedback"))?;
    fb.comments.push(body.comment);
    Ok(Json(json!({ "message": "Comment added" })))
}

async fn request_feedback(
    State(db): State<Db>,
    Json(body): Json<FeedbackRequestCreate>,
) -> Result<StatusCode, Reply> {
    let mut db = begin(&db, "POST /feedback/request".into()).await?;
    if db.user(&body.manager_employee_id).is_none() {
        return Err(not_found("Manager"));
    }
    let id = db.next_id();
    db.requests.push(FeedbackRequest {
        id,
        employee_id: body.employee_id,
        manager_employee_id: body.manager_employee_id,
        message: body.message,
        seen: false,
        created_at: None,
    });
    Ok(StatusCode::CREATED)
}

async fn list_requests(State(db): State<Db>, Path(id): Path<String>) -> Result<Json<Value>, Reply> {
    let db = begin(&db, format!("GET /feedback/requests/{}", id)).await?;
    let list: Vec<&FeedbackRequest> = db.requests.iter().filter(|r| r.manager_employee_id == id).collect();
    Ok(Json(json!(list)))
}

async fn request_seen(State(db): State<Db>, Path(id): Path<String>) -> Result<StatusCode, Reply> {
    let mut db = begin(&db, format!("PATCH /feedback/requests/{}/seen", id)).await?;
    let id: i64 = id.parse().map_err(|_| not_found("Request"))?;
    let request = db
        .requests
        .iter_mut()
        .find(|r| r.id == id)
        .ok_or_else(|| not_found("Request"))?;
    request.seen = true;
    Ok(StatusCode::NO_CONTENT)
}

async fn count_unseen(State(db): State<Db>, Path(id): Path<String>) -> Result<Json<Value>, Reply> {
    let db = begin(&db, format!("GET /feedback/requests/{}/count-unseen", id)).await?;
    let count = db
        .requests
        .iter()
        .filter(|r| r.manager_employee_id == id && !r.seen)
        .count();
    Ok(Json(json!({ "unseen_count": count })))
}

async fn notifications(State(db): State<Db>, Path(id): Path<String>) -> Result<Json<Value>, Reply> {
    let db = begin(&db, format!("GET /feedback/notifications/{}", id)).await?;
    let list: Vec<&Notification> = db.notifications.iter().filter(|n| n.employee_id == id).collect();
    Ok(Json(json!(list)))
}

async fn toggle_notification(
    State(db): State<Db>,
    Path(id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<StatusCode, Reply> {
    let seen = query.get("seen").map(String::as_str) == Some("true");
    let mut db = begin(&db, format!("PATCH /feedback/notifications/{}?seen={}", id, seen)).await?;
    let id: i64 = id.parse().map_err(|_| not_found("Notification"))?;
    let n = db
        .notifications
        .iter_mut()
        .find(|n| n.id == id)
        .ok_or_else(|| not_found("Notification"))?;
    n.seen = seen;
    Ok(StatusCode::NO_CONTENT)
}

async fn mark_all_seen(State(db): State<Db>, Path(id): Path<String>) -> Result<Json<Value>, Reply> {
    let mut db = begin(&db, format!("PATCH /feedback/notifications/mark-all-seen/{}", id)).await?;
    for n in db.notifications.iter_mut().filter(|n| n.employee_id == id) {
        n.seen = true;
    }
    Ok(Json(json!({ "message": "All notifications marked as seen" })))
}
