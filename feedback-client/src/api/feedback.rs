//! `/feedback` endpoints

use serde::de::IgnoredAny;
use shared::models::{CommentCreate, Feedback, FeedbackCreate, FeedbackUpdate};

use super::{FeedbackApi, segment};
use crate::ClientResult;
use crate::client::HttpClient;

impl<H: HttpClient> FeedbackApi<H> {
    pub async fn create_feedback(&self, feedback: &FeedbackCreate) -> ClientResult<()> {
        let _: IgnoredAny = self.http.post("/feedback/", feedback).await?;
        Ok(())
    }

    /// Feedback written by a manager
    pub async fn manager_feedback(&self, manager_id: &str) -> ClientResult<Vec<Feedback>> {
        let path = format!("/feedback/manager/{}", segment(manager_id, "Manager ID")?);
        self.http.get(&path).await
    }

    /// Feedback received by an employee
    pub async fn employee_feedback(&self, employee_id: &str) -> ClientResult<Vec<Feedback>> {
        let path = format!("/feedback/employee/{}", segment(employee_id, "Employee ID")?);
        self.http.get(&path).await
    }

    pub async fn update_feedback(&self, id: i64, update: &FeedbackUpdate) -> ClientResult<()> {
        let _: IgnoredAny = self.http.put(&format!("/feedback/{}", id), update).await?;
        Ok(())
    }

    pub async fn delete_feedback(&self, id: i64) -> ClientResult<()> {
        let _: IgnoredAny = self.http.delete(&format!("/feedback/{}", id)).await?;
        Ok(())
    }

    /// Delete every feedback a manager has written
    pub async fn delete_manager_feedback(&self, manager_id: &str) -> ClientResult<()> {
        let path = format!("/feedback/manager/{}", segment(manager_id, "Manager ID")?);
        let _: IgnoredAny = self.http.delete(&path).await?;
        Ok(())
    }

    /// Partial update setting `acknowledged = true`
    pub async fn acknowledge_feedback(&self, id: i64) -> ClientResult<()> {
        let _: IgnoredAny = self
            .http
            .patch_empty(&format!("/feedback/acknowledge/{}", id))
            .await?;
        Ok(())
    }

    pub async fn comment_feedback(&self, id: i64, comment: &CommentCreate) -> ClientResult<()> {
        let _: IgnoredAny = self
            .http
            .post(&format!("/feedback/comment/{}", id), comment)
            .await?;
        Ok(())
    }
}
