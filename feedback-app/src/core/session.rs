//! SessionStore - 当前登录用户
//!
//! 会话以单个 JSON 对象保存在 `{session_dir}/current_session.json`，
//! 重启 CLI 后仍然有效。文件缺失、不可读或损坏都视为未登录。

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use shared::client::LoginResponse;
use shared::models::Role;
use thiserror::Error;
use tokio::sync::RwLock;

/// Session file name inside the session directory
pub const SESSION_FILE: &str = "current_session.json";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// 已登录用户
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub employee_id: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub role: Role,
}

impl From<LoginResponse> for Session {
    fn from(identity: LoginResponse) -> Self {
        Self {
            employee_id: identity.employee_id,
            name: identity.name,
            email: identity.email,
            role: identity.role,
        }
    }
}

/// Shared handle to the current session.
///
/// Clones share the same state. Only the auth flows and logout write it.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<Option<Session>>>,
    file_path: Option<PathBuf>,
}

impl SessionStore {
    /// Store that lives only as long as the process
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Open the persisted session in `dir`, creating the directory if needed
    pub fn load(dir: &Path) -> Result<Self, SessionError> {
        std::fs::create_dir_all(dir)?;
        let file_path = dir.join(SESSION_FILE);
        let session = read_session_file(&file_path);
        if let Some(session) = &session {
            tracing::info!(employee_id = %session.employee_id, role = %session.role, "Session restored");
        }
        Ok(Self {
            inner: Arc::new(RwLock::new(session)),
            file_path: Some(file_path),
        })
    }

    /// 登录成功后写入会话 (先持久化，再更新内存)
    pub async fn login(&self, session: Session) -> Result<(), SessionError> {
        if let Some(path) = &self.file_path {
            let content = serde_json::to_string_pretty(&session)?;
            std::fs::write(path, content)?;
        }
        tracing::info!(employee_id = %session.employee_id, role = %session.role, "Logged in");
        *self.inner.write().await = Some(session);
        Ok(())
    }

    /// 登出并删除会话文件
    pub async fn logout(&self) -> Result<(), SessionError> {
        let previous = self.inner.write().await.take();
        if let Some(path) = self.file_path.as_ref().filter(|p| p.exists()) {
            std::fs::remove_file(path)?;
        }
        if let Some(session) = previous {
            tracing::info!(employee_id = %session.employee_id, "Logged out");
        }
        Ok(())
    }

    pub async fn current(&self) -> Option<Session> {
        self.inner.read().await.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.inner.read().await.is_some()
    }

    /// Current employee id, `None` when logged out or blank
    pub async fn employee_id(&self) -> Option<String> {
        self.inner
            .read()
            .await
            .as_ref()
            .map(|s| s.employee_id.trim().to_string())
            .filter(|id| !id.is_empty())
    }

    pub async fn role(&self) -> Option<Role> {
        self.inner.read().await.as_ref().map(|s| s.role)
    }

    pub async fn name(&self) -> Option<String> {
        self.inner.read().await.as_ref().map(|s| s.name.clone())
    }

    pub async fn email(&self) -> Option<String> {
        self.inner.read().await.as_ref().map(|s| s.email.clone())
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }
}

fn read_session_file(path: &Path) -> Option<Session> {
    if !path.exists() {
        return None;
    }
    let parsed = std::fs::read_to_string(path)
        .map_err(SessionError::from)
        .and_then(|content| Ok(serde_json::from_str::<Session>(&content)?));
    match parsed {
        Ok(session) if !session.employee_id.trim().is_empty() => Some(session),
        Ok(_) => {
            tracing::warn!(path = %path.display(), "Session file has no employee id, discarding");
            discard(path);
            None
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Unreadable session file, discarding");
            discard(path);
            None
        }
    }
}

fn discard(path: &Path) {
    if let Err(e) = std::fs::remove_file(path) {
        tracing::warn!(path = %path.display(), error = %e, "Failed to remove session file");
    }
}
