//! `/feedback/request(s)` endpoints

use serde::de::IgnoredAny;
use shared::models::{FeedbackRequest, FeedbackRequestCreate, UnseenCount};

use super::{FeedbackApi, segment};
use crate::ClientResult;
use crate::client::HttpClient;

impl<H: HttpClient> FeedbackApi<H> {
    /// Employee asks a manager for feedback
    pub async fn request_feedback(&self, request: &FeedbackRequestCreate) -> ClientResult<()> {
        let _: IgnoredAny = self.http.post("/feedback/request", request).await?;
        Ok(())
    }

    pub async fn feedback_requests(&self, manager_id: &str) -> ClientResult<Vec<FeedbackRequest>> {
        let path = format!("/feedback/requests/{}", segment(manager_id, "Manager ID")?);
        self.http.get(&path).await
    }

    pub async fn mark_request_seen(&self, id: i64) -> ClientResult<()> {
        let _: IgnoredAny = self
            .http
            .patch_empty(&format!("/feedback/requests/{}/seen", id))
            .await?;
        Ok(())
    }

    pub async fn unseen_request_count(&self, manager_id: &str) -> ClientResult<u64> {
        let path = format!(
            "/feedback/requests/{}/count-unseen",
            segment(manager_id, "Manager ID")?
        );
        let count: UnseenCount = self.http.get(&path).await?;
        Ok(count.unseen_count)
    }
}
