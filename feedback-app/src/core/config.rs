//! Application configuration

use std::path::{Path, PathBuf};
use std::time::Duration;

use feedback_client::ClientConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

fn default_api_url() -> String {
    ClientConfig::from_env().base_url
}

fn default_session_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("./logs")
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_flash_ttl_secs() -> u64 {
    5
}

fn default_search_debounce_ms() -> u64 {
    300
}

fn default_notification_poll_secs() -> u64 {
    30
}

/// 应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Backend base URL
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// 会话文件目录
    #[serde(default = "default_session_dir")]
    pub session_dir: PathBuf,
    /// 日志目录
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Banner lifetime
    #[serde(default = "default_flash_ttl_secs")]
    pub flash_ttl_secs: u64,
    /// Delay between the last keystroke and applying a search query
    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,
    #[serde(default = "default_notification_poll_secs")]
    pub notification_poll_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            session_dir: default_session_dir(),
            log_dir: default_log_dir(),
            request_timeout_secs: default_request_timeout_secs(),
            flash_ttl_secs: default_flash_ttl_secs(),
            search_debounce_ms: default_search_debounce_ms(),
            notification_poll_secs: default_notification_poll_secs(),
        }
    }
}

/// Durations the views work with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    pub flash_ttl: Duration,
    pub search_debounce: Duration,
    pub notification_poll: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            flash_ttl: Duration::from_secs(default_flash_ttl_secs()),
            search_debounce: Duration::from_millis(default_search_debounce_ms()),
            notification_poll: Duration::from_secs(default_notification_poll_secs()),
        }
    }
}

impl AppConfig {
    /// 从文件加载配置，文件不存在时使用默认值
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Ok(serde_json::from_str(&content)?)
        } else {
            Ok(Self::default())
        }
    }

    /// 保存配置到文件
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new(self.api_url.clone()).with_timeout(self.request_timeout_secs)
    }

    pub fn timing(&self) -> Timing {
        Timing {
            flash_ttl: Duration::from_secs(self.flash_ttl_secs),
            search_debounce: Duration::from_millis(self.search_debounce_ms),
            notification_poll: Duration::from_secs(self.notification_poll_secs.max(1)),
        }
    }
}
