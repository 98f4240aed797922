//! Client configuration

/// Backend used when nothing else is configured
pub const DEFAULT_BASE_URL: &str = "https://feedback-2uwd.onrender.com";

/// Environment variable overriding the backend URL
pub const BASE_URL_ENV: &str = "FEEDBACK_API_URL";

/// Client configuration for connecting to the feedback backend
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server base URL (e.g., "https://feedback-2uwd.onrender.com")
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout: u64,
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: 30,
        }
    }

    /// Base URL from `FEEDBACK_API_URL`, falling back to the default backend
    pub fn from_env() -> Self {
        let base_url = std::env::var(BASE_URL_ENV).unwrap_or_else(|_| {
            tracing::debug!("{} not set, using default backend", BASE_URL_ENV);
            DEFAULT_BASE_URL.to_string()
        });
        Self::new(base_url)
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}
