//! `/feedback/notifications` endpoints

use serde::de::IgnoredAny;
use shared::models::Notification;

use super::{FeedbackApi, segment};
use crate::ClientResult;
use crate::client::HttpClient;

impl<H: HttpClient> FeedbackApi<H> {
    pub async fn notifications(&self, employee_id: &str) -> ClientResult<Vec<Notification>> {
        let path = format!(
            "/feedback/notifications/{}",
            segment(employee_id, "Employee ID")?
        );
        self.http.get(&path).await
    }

    /// Toggle one notification; the flag travels as a query parameter
    pub async fn set_notification_seen(&self, id: i64, seen: bool) -> ClientResult<()> {
        let path = format!("/feedback/notifications/{}?seen={}", id, seen);
        let _: IgnoredAny = self.http.patch_empty(&path).await?;
        Ok(())
    }

    pub async fn mark_all_notifications_seen(&self, employee_id: &str) -> ClientResult<()> {
        let path = format!(
            "/feedback/notifications/mark-all-seen/{}",
            segment(employee_id, "Employee ID")?
        );
        let _: IgnoredAny = self.http.patch_empty(&path).await?;
        Ok(())
    }
}
