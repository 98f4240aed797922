//! Notification Poller - 后台刷新通知
//!
//! 定期刷新 NotificationCenter，直到取消令牌被触发。

use std::sync::Arc;
use std::time::Duration;

use feedback_client::HttpClient;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;

use crate::views::NotificationCenter;

/// 通知轮询器
pub struct NotificationPoller<H> {
    center: Arc<Mutex<NotificationCenter<H>>>,
    poll_interval: Duration,
}

impl<H: HttpClient + 'static> NotificationPoller<H> {
    pub fn new(center: Arc<Mutex<NotificationCenter<H>>>, poll_interval: Duration) -> Self {
        Self {
            center,
            poll_interval,
        }
    }

    /// 启动轮询循环
    ///
    /// The first tick fires immediately. A failed refresh is logged and the
    /// loop keeps going; the widget keeps its last good state.
    pub async fn run(self, shutdown: CancellationToken) {
        let mut ticker = interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut polls = 0u64;

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    tracing::info!(polls, "Notification poller stopped");
                    break;
                }
                _ = ticker.tick() => {
                    polls += 1;
                    let mut center = self.center.lock().await;
                    match center.refresh().await {
                        Ok(()) => tracing::debug!(unseen = center.unseen_count(), "Notifications polled"),
                        Err(e) => tracing::warn!(error = %e, "Notification poll failed"),
                    }
                }
            }
        }
    }

    pub fn spawn(self, shutdown: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(self.run(shutdown))
    }
}
