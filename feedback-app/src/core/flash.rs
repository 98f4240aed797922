//! Auto-dismissing banners

use std::time::Duration;

use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub kind: BannerKind,
    pub message: String,
    expires_at: Instant,
}

impl Banner {
    pub fn is_error(&self) -> bool {
        self.kind == BannerKind::Error
    }
}

/// Holds at most one banner; a new banner replaces the old one.
#[derive(Debug, Clone)]
pub struct Flash {
    ttl: Duration,
    banner: Option<Banner>,
}

impl Flash {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, banner: None }
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.show(BannerKind::Success, message.into());
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.show(BannerKind::Error, message.into());
    }

    fn show(&mut self, kind: BannerKind, message: String) {
        self.banner = Some(Banner {
            kind,
            message,
            expires_at: Instant::now() + self.ttl,
        });
    }

    /// Banner still visible at this instant
    pub fn current(&self) -> Option<&Banner> {
        self.banner
            .as_ref()
            .filter(|b| Instant::now() < b.expires_at)
    }

    pub fn error_message(&self) -> Option<&str> {
        self.current()
            .filter(|b| b.is_error())
            .map(|b| b.message.as_str())
    }

    pub fn success_message(&self) -> Option<&str> {
        self.current()
            .filter(|b| !b.is_error())
            .map(|b| b.message.as_str())
    }

    pub fn clear(&mut self) {
        self.banner = None;
    }
}

impl Default for Flash {
    fn default() -> Self {
        Self::new(Duration::from_secs(5))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_banner_expires() {
        let mut flash = Flash::default();
        flash.error("Login failed.");
        assert_eq!(flash.error_message(), Some("Login failed."));

        tokio::time::advance(Duration::from_millis(4_900)).await;
        assert!(flash.current().is_some());

        tokio::time::advance(Duration::from_millis(200)).await;
        assert!(flash.current().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_banner_replaces_old() {
        let mut flash = Flash::new(Duration::from_secs(1));
        flash.error("boom");
        tokio::time::advance(Duration::from_millis(800)).await;
        flash.success("saved");

        tokio::time::advance(Duration::from_millis(800)).await;
        assert_eq!(flash.success_message(), Some("saved"));
        assert!(flash.error_message().is_none());
    }
}
