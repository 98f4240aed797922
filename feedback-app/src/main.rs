//! `feedback` - command line front end
//!
//! Each subcommand opens one page: the route guard runs first, then the
//! page's view is driven and its banner printed.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, anyhow, bail};
use clap::{ArgAction, Parser, Subcommand};
use feedback_app::core::flash::BannerKind;
use feedback_app::views::manager::EmployeeEdit;
use feedback_app::{Access, App, AppConfig, AppResult, Flash, Route};
use feedback_client::NetworkHttpClient;
use shared::models::{Role, Sentiment};
use shared::util::{date_part, parse_tags};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

#[derive(Parser, Debug)]
#[command(name = "feedback", author, version, about = "Employee feedback client")]
struct Cli {
    /// Configuration file (JSON)
    #[arg(long, env = "FEEDBACK_CONFIG", default_value = "feedback.json")]
    config: PathBuf,

    /// Backend base URL, overrides the configuration file
    #[arg(long, env = "FEEDBACK_API_URL")]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in and go to the role's dashboard
    Login {
        #[arg(long)]
        employee_id: String,
        #[arg(long, env = "FEEDBACK_PASSWORD", hide_env_values = true)]
        password: String,
    },
    Logout,
    /// Show the current session
    Whoami,
    /// Resolve a page path against the current session
    Open { path: String },
    /// Reset a password from the login page
    ResetPassword {
        #[arg(long)]
        employee_id: String,
        #[arg(long)]
        new_password: String,
    },
    ChangePassword {
        #[arg(long)]
        old_password: String,
        #[arg(long)]
        new_password: String,
    },
    /// Register a user (manager)
    Register {
        #[arg(long)]
        employee_id: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long, default_value = "manager")]
        role: Role,
    },
    /// Dashboard for the logged-in role
    Dashboard,
    Employees {
        #[arg(long)]
        search: Option<String>,
    },
    EmployeeUpdate {
        employee_id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        role: Option<Role>,
        #[arg(long)]
        password: Option<String>,
    },
    EmployeeDelete { employee_id: String },
    FeedbackSubmit {
        #[arg(long)]
        employee_id: String,
        #[arg(long)]
        strengths: String,
        #[arg(long)]
        improvement: String,
        #[arg(long, default_value = "positive")]
        sentiment: Sentiment,
        #[arg(long)]
        anonymous: bool,
        /// Comma separated
        #[arg(long, default_value = "")]
        tags: String,
    },
    FeedbackHistory {
        #[arg(long)]
        search: Option<String>,
    },
    FeedbackUpdate {
        id: i64,
        #[arg(long)]
        employee_id: Option<String>,
        #[arg(long)]
        strengths: Option<String>,
        #[arg(long)]
        improvement: Option<String>,
        #[arg(long)]
        sentiment: Option<Sentiment>,
        #[arg(long)]
        anonymous: Option<bool>,
        #[arg(long)]
        tags: Option<String>,
    },
    FeedbackDelete { id: i64 },
    /// Delete every feedback you wrote
    FeedbackDeleteAll {
        #[arg(long)]
        yes: bool,
    },
    /// Feedback requests sent to you (manager)
    Requests,
    RequestSeen { id: i64 },
    /// Feedback you received (employee)
    MyFeedback {
        #[arg(long)]
        search: Option<String>,
    },
    Ack { id: i64 },
    Comment { id: i64, text: String },
    RequestFeedback {
        #[arg(long)]
        manager_id: String,
        #[arg(long)]
        message: String,
    },
    Notifications,
    NotificationSeen {
        id: i64,
        #[arg(long, default_value_t = true, action = ArgAction::Set)]
        seen: bool,
    },
    NotificationsMarkAll,
    /// Poll notifications until Ctrl-C
    WatchNotifications,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut config = AppConfig::load(&cli.config)
        .with_context(|| format!("Failed to load {}", cli.config.display()))?;
    if let Some(api_url) = cli.api_url {
        config.api_url = api_url;
    }

    let _guard = feedback_app::logging::init_logging(&config.log_dir)
        .context("Failed to initialize logging")?;

    let app = App::from_config(config)?;
    run(&app, cli.command).await
}

fn print_flash(flash: &Flash) {
    if let Some(banner) = flash.current() {
        match banner.kind {
            BannerKind::Success => println!("{}", banner.message),
            BannerKind::Error => eprintln!("{}", banner.message),
        }
    }
}

/// Print the view's banner and turn a failure into its banner text
fn settle<T>(result: AppResult<T>, flash: &Flash) -> anyhow::Result<T> {
    print_flash(flash);
    result.map_err(|e| match flash.error_message() {
        Some(message) => anyhow!(message.to_string()),
        None => anyhow!(e.user_message("Something went wrong.")),
    })
}

/// Route guard for page commands
async fn enter(app: &App<NetworkHttpClient>, route: Route) -> anyhow::Result<()> {
    match app.guard(route).await {
        Access::Granted(_) => {
            if let Some(shell) = app.shell(route, 0).await {
                tracing::debug!(header = %shell.header, page = route.title(), "Page opened");
            }
            Ok(())
        }
        Access::Redirect(to) => {
            let role = route.required_role().map(|r| r.as_str()).unwrap_or("any");
            bail!("{} requires a {} session, redirected to {}", route, role, to)
        }
    }
}

async fn run(app: &App<NetworkHttpClient>, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Login {
            employee_id,
            password,
        } => {
            let mut view = app.login_view();
            view.employee_id = employee_id;
            view.password = password;
            let result = view.submit().await;
            let route = settle(result, view.flash())?;
            println!("-> {}", route);
        }
        Command::Logout => {
            app.logout().await?;
            println!("Logged out.");
        }
        Command::Whoami => match app.session().current().await {
            Some(s) => println!("{} ({}) <{}> [{}]", s.name, s.employee_id, s.email, s.role),
            None => println!("Not logged in."),
        },
        Command::Open { path } => match app.navigate(&path).await {
            Access::Granted(route) => {
                println!("{} {}", route, route.title());
                if let Some(shell) = app.shell(route, 0).await {
                    println!("{}", shell.header);
                    for item in shell.items {
                        let marker = if item.active { "*" } else { " " };
                        println!("{} {:<24} {}", marker, item.label, item.route);
                    }
                }
            }
            Access::Redirect(route) => println!("redirect -> {}", route),
        },
        Command::ResetPassword {
            employee_id,
            new_password,
        } => {
            let mut dialog = app.password_reset_dialog();
            dialog.open();
            dialog.employee_id = employee_id;
            dialog.new_password = new_password;
            let result = dialog.submit().await;
            settle(result, dialog.flash())?;
        }
        Command::ChangePassword {
            old_password,
            new_password,
        } => {
            enter(app, Route::ChangePassword).await?;
            let mut view = app.change_password_view();
            view.old_password = old_password;
            view.new_password = new_password;
            let result = view.submit().await;
            settle(result, view.flash())?;
        }
        Command::Register {
            employee_id,
            name,
            email,
            password,
            role,
        } => {
            enter(app, Route::Register).await?;
            let mut view = app.register_view();
            view.draft.employee_id = employee_id;
            view.draft.name = name;
            view.draft.email = email;
            view.draft.password = password;
            view.draft.role = role;
            let result = view.submit().await;
            settle(result, view.flash())?;
        }
        Command::Dashboard => match app.session().role().await {
            Some(Role::Manager) => manager_dashboard(app).await?,
            Some(Role::Employee) => employee_dashboard(app).await?,
            None => bail!("Not logged in."),
        },
        Command::Employees { search } => {
            enter(app, Route::Employees).await?;
            let mut view = app.employees_view();
            let result = view.load().await;
            settle(result, view.flash())?;
            if let Some(query) = search {
                view.list_mut().type_query(query);
                view.list_mut().settle().await;
            }
            for e in view.list().visible() {
                println!("{:<10} {:<24} {:<28} {}", e.employee_id, e.name, e.email, e.role);
            }
        }
        Command::EmployeeUpdate {
            employee_id,
            name,
            email,
            role,
            password,
        } => {
            enter(app, Route::Employees).await?;
            let mut view = app.employees_view();
            let result = view.load().await;
            settle(result, view.flash())?;
            let mut edit: EmployeeEdit = view
                .edit_for(&employee_id)
                .ok_or_else(|| anyhow!("Employee {} not found", employee_id))?;
            if let Some(name) = name {
                edit.name = name;
            }
            if let Some(email) = email {
                edit.email = email;
            }
            if let Some(role) = role {
                edit.role = role;
            }
            if let Some(password) = password {
                edit.password = password;
            }
            let result = view.update(&employee_id, edit).await;
            settle(result, view.flash())?;
        }
        Command::EmployeeDelete { employee_id } => {
            enter(app, Route::Employees).await?;
            let mut view = app.employees_view();
            let result = view.delete(&employee_id).await;
            settle(result, view.flash())?;
            println!("Deleted {}.", employee_id);
        }
        Command::FeedbackSubmit {
            employee_id,
            strengths,
            improvement,
            sentiment,
            anonymous,
            tags,
        } => {
            enter(app, Route::SubmitFeedback).await?;
            let mut form = app.feedback_form();
            form.draft.employee_id = employee_id;
            form.draft.strengths = strengths;
            form.draft.improvement = improvement;
            form.draft.sentiment = sentiment;
            form.draft.anonymous = anonymous;
            form.draft.tags = tags;
            let result = form.submit().await;
            settle(result, form.flash())?;
        }
        Command::FeedbackHistory { search } => {
            enter(app, Route::FeedbackHistory).await?;
            let mut view = app.feedback_history();
            let result = view.load().await;
            settle(result, view.flash())?;
            if let Some(query) = search {
                view.list_mut().type_query(query);
                view.list_mut().settle().await;
            }
            for f in view.list().visible() {
                println!(
                    "#{:<5} {:<10} {:<9} {} | {} | {}",
                    f.id,
                    f.employee_id,
                    f.sentiment,
                    f.strengths,
                    f.improvement,
                    f.tags.join(", ")
                );
            }
        }
        Command::FeedbackUpdate {
            id,
            employee_id,
            strengths,
            improvement,
            sentiment,
            anonymous,
            tags,
        } => {
            enter(app, Route::FeedbackHistory).await?;
            let mut view = app.feedback_history();
            let result = view.load().await;
            settle(result, view.flash())?;
            let mut update = view
                .edit_for(id)
                .ok_or_else(|| anyhow!("Feedback #{} not found", id))?;
            if let Some(employee_id) = employee_id {
                update.employee_id = employee_id;
            }
            if let Some(strengths) = strengths {
                update.strengths = strengths;
            }
            if let Some(improvement) = improvement {
                update.improvement = improvement;
            }
            if let Some(sentiment) = sentiment {
                update.sentiment = sentiment;
            }
            if let Some(anonymous) = anonymous {
                update.anonymous = anonymous;
            }
            if let Some(tags) = tags {
                update.tags = parse_tags(&tags);
            }
            let result = view.update(id, update).await;
            settle(result, view.flash())?;
        }
        Command::FeedbackDelete { id } => {
            enter(app, Route::FeedbackHistory).await?;
            let mut view = app.feedback_history();
            let result = view.delete(id).await;
            settle(result, view.flash())?;
            println!("Deleted #{}.", id);
        }
        Command::FeedbackDeleteAll { yes } => {
            enter(app, Route::FeedbackHistory).await?;
            if !yes {
                bail!("Refusing to delete all feedback without --yes");
            }
            let mut view = app.feedback_history();
            let result = view.delete_all().await;
            settle(result, view.flash())?;
            println!("All feedback deleted.");
        }
        Command::Requests => {
            enter(app, Route::FeedbackRequests).await?;
            let mut view = app.feedback_requests();
            let result = view.load().await;
            settle(result, view.flash())?;
            println!("{} unseen", view.unseen_count());
            for r in view.requests() {
                let state = if r.seen { "seen" } else { "new" };
                println!("#{:<5} {:<4} {:<10} {}", r.id, state, r.employee_id, r.message);
            }
        }
        Command::RequestSeen { id } => {
            enter(app, Route::FeedbackRequests).await?;
            let mut view = app.feedback_requests();
            let result = view.mark_seen(id).await;
            settle(result, view.flash())?;
            println!("Request #{} marked as seen.", id);
        }
        Command::MyFeedback { search } => {
            enter(app, Route::EmployeeFeedback).await?;
            let mut view = app.employee_feedback();
            let result = view.load().await;
            settle(result, view.flash())?;
            if let Some(query) = search {
                view.list_mut().type_query(query);
                view.list_mut().settle().await;
            }
            for f in view.list().visible() {
                let from = if f.anonymous {
                    "Anonymous"
                } else {
                    f.manager_name.as_deref().unwrap_or("Unknown manager")
                };
                println!(
                    "#{:<5} {} {:<16} {:<9} [{}] {} | {}",
                    f.id,
                    f.created_on().unwrap_or("-"),
                    from,
                    f.sentiment,
                    view.ack_label(f.id).unwrap_or_default(),
                    f.strengths,
                    f.improvement
                );
                for c in &f.comments {
                    println!("        > {}", c);
                }
            }
        }
        Command::Ack { id } => {
            enter(app, Route::EmployeeFeedback).await?;
            let mut view = app.employee_feedback();
            let result = view.load().await;
            settle(result, view.flash())?;
            let result = view.acknowledge(id).await;
            settle(result, view.flash())?;
            println!("#{} {}", id, view.ack_label(id).unwrap_or_default());
        }
        Command::Comment { id, text } => {
            enter(app, Route::EmployeeFeedback).await?;
            let mut view = app.employee_feedback();
            let result = view.load().await;
            settle(result, view.flash())?;
            let result = view.comment(id, &text).await;
            settle(result, view.flash())?;
        }
        Command::RequestFeedback {
            manager_id,
            message,
        } => {
            enter(app, Route::RequestFeedback).await?;
            let mut form = app.feedback_request_form();
            form.manager_employee_id = manager_id;
            form.message = message;
            let result = form.submit().await;
            settle(result, form.flash())?;
        }
        Command::Notifications => {
            enter(app, Route::Notifications).await?;
            let mut center = app.notification_center();
            let result = center.refresh().await;
            settle(result, center.flash())?;
            println!("Unseen ({})", center.unseen_count());
            for n in center.unseen() {
                println!("  #{:<5} {}", n.id, n.message);
            }
            println!("Seen");
            for n in center.seen() {
                println!("  #{:<5} {}", n.id, n.message);
            }
        }
        Command::NotificationSeen { id, seen } => {
            enter(app, Route::Notifications).await?;
            let mut center = app.notification_center();
            let result = center.toggle_seen(id, seen).await;
            settle(result, center.flash())?;
            println!("{} unseen", center.unseen_count());
        }
        Command::NotificationsMarkAll => {
            enter(app, Route::Notifications).await?;
            let mut center = app.notification_center();
            let result = center.mark_all_seen().await;
            settle(result, center.flash())?;
            println!("{} unseen", center.unseen_count());
        }
        Command::WatchNotifications => {
            enter(app, Route::Notifications).await?;
            watch_notifications(app).await?;
        }
    }
    Ok(())
}

async fn manager_dashboard(app: &App<NetworkHttpClient>) -> anyhow::Result<()> {
    enter(app, Route::ManagerDashboard).await?;
    let mut view = app.manager_dashboard();
    let result = view.load().await;
    settle(result, view.flash())?;

    let summary = view.summary();
    println!("Unseen requests: {}", view.unseen_requests());
    println!("Employees:       {}", view.employees().len());
    println!(
        "Feedback:        {} (positive {}, neutral {}, negative {})",
        summary.total_feedbacks, summary.positive, summary.neutral, summary.negative
    );
    for row in view.rows() {
        println!(
            "  {:<10} {:<24} {:>3}",
            row.employee_id.as_deref().unwrap_or("-"),
            row.name.as_deref().unwrap_or("-"),
            row.feedback_count
        );
    }
    Ok(())
}

async fn employee_dashboard(app: &App<NetworkHttpClient>) -> anyhow::Result<()> {
    enter(app, Route::EmployeeDashboard).await?;
    let mut view = app.employee_dashboard();
    if let Err(e) = view.load().await {
        bail!(view.error().map(str::to_string).unwrap_or_else(|| e.to_string()));
    }
    for group in view.groups() {
        println!("{}", group.manager_name);
        for entry in group.entries {
            let ack = if entry.acknowledged { "acknowledged" } else { "pending" };
            println!(
                "  #{:<5} {} {:<9} {}",
                entry.feedback_id,
                entry.created_at.as_deref().map(date_part).unwrap_or("-"),
                entry.sentiment.map(|s| s.as_str()).unwrap_or("-"),
                ack
            );
        }
    }
    Ok(())
}

async fn watch_notifications(app: &App<NetworkHttpClient>) -> anyhow::Result<()> {
    let center = Arc::new(Mutex::new(app.notification_center()));
    let shutdown = CancellationToken::new();
    let poller = app.spawn_notification_poller(Arc::clone(&center), shutdown.clone());

    let mut ticker = tokio::time::interval(app.config().timing().notification_poll);
    let mut last = None;
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            _ = ticker.tick() => {
                let unseen = center.lock().await.unseen_count();
                if last != Some(unseen) {
                    println!("{} unseen notification(s)", unseen);
                    last = Some(unseen);
                }
            }
        }
    }

    shutdown.cancel();
    poller.await.context("Notification poller panicked")?;
    Ok(())
}
