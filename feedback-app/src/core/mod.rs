//! Core module for the feedback client
//!
//! 包含核心组件:
//! - SessionStore: 当前登录用户（持久化到 JSON 文件）
//! - RouteGuard: 基于角色的路由守卫
//! - Flash: 自动消失的提示条
//! - FilteredList: 带防抖的客户端搜索
//! - NotificationPoller: 后台通知轮询

pub mod activity;
pub mod config;
pub mod error;
pub mod flash;
pub mod notification_poller;
pub mod routes;
pub mod search;
pub mod session;

pub use activity::{Rollback, RowActivity, RowGuard};
pub use config::{AppConfig, ConfigError, Timing};
pub use error::{AppError, AppResult};
pub use flash::{Banner, BannerKind, Flash};
pub use notification_poller::NotificationPoller;
pub use routes::{Access, NavItem, NavShell, Route, RouteGuard};
pub use search::FilteredList;
pub use session::{Session, SessionError, SessionStore};
