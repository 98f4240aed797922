//! Notification widget (employee header badge + notification page)

use feedback_client::HttpClient;
use shared::models::Notification;

use super::{NO_EMPLOYEE_MESSAGE, ViewContext, report};
use crate::core::activity::{Rollback, RowActivity};
use crate::core::error::{AppError, AppResult};
use crate::core::flash::Flash;

pub struct NotificationCenter<H> {
    ctx: ViewContext<H>,
    items: Vec<Notification>,
    /// Employee the current items belong to
    loaded_for: Option<String>,
    loading: bool,
    rows: RowActivity,
    flash: Flash,
}

impl<H: HttpClient> NotificationCenter<H> {
    pub fn new(ctx: ViewContext<H>) -> Self {
        let flash = ctx.flash();
        Self {
            ctx,
            items: Vec::new(),
            loaded_for: None,
            loading: false,
            rows: RowActivity::new(),
            flash,
        }
    }

    /// Fetch all notifications for the current employee. Without a session
    /// the widget is emptied and no request is made.
    pub async fn refresh(&mut self) -> AppResult<()> {
        let Some(employee_id) = self.ctx.session.employee_id().await else {
            self.items.clear();
            self.loaded_for = None;
            return Ok(());
        };

        self.loading = true;
        let result = self.ctx.api.notifications(&employee_id).await;
        self.loading = false;

        let items = report(
            &mut self.flash,
            result.map_err(AppError::from),
            "Failed to fetch notifications.",
        )?;
        tracing::debug!(employee_id = %employee_id, count = items.len(), "Notifications loaded");
        self.items = items;
        self.loaded_for = Some(employee_id);
        Ok(())
    }

    /// Refetch if the session identity changed since the last load.
    /// Returns whether a fetch happened.
    pub async fn sync_identity(&mut self) -> AppResult<bool> {
        let current = self.ctx.session.employee_id().await;
        if current == self.loaded_for {
            return Ok(false);
        }
        self.refresh().await?;
        Ok(true)
    }

    pub fn items(&self) -> &[Notification] {
        &self.items
    }

    pub fn unseen(&self) -> Vec<&Notification> {
        self.items.iter().filter(|n| !n.seen).collect()
    }

    pub fn seen(&self) -> Vec<&Notification> {
        self.items.iter().filter(|n| n.seen).collect()
    }

    /// Badge count
    pub fn unseen_count(&self) -> usize {
        self.items.iter().filter(|n| !n.seen).count()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_pending(&self, id: i64) -> bool {
        self.rows.is_pending(&id)
    }

    pub fn flash(&self) -> &Flash {
        &self.flash
    }

    /// Mark one notification seen or unseen
    pub async fn toggle_seen(&mut self, id: i64, seen: bool) -> AppResult<()> {
        let Some(mut row) = self.rows.track(id, &mut self.items) else {
            tracing::debug!(notification_id = id, "Notification update already in flight");
            return Ok(());
        };
        for n in row.iter_mut().filter(|n| n.id == id) {
            n.seen = seen;
        }

        if let Err(e) = self.ctx.api.set_notification_seen(id, seen).await {
            drop(row);
            return report(&mut self.flash, Err(e.into()), "Failed to update notification.");
        }
        row.commit();
        self.refresh().await
    }

    /// Mark everything seen for the current employee
    pub async fn mark_all_seen(&mut self) -> AppResult<()> {
        let employee_id = report(
            &mut self.flash,
            self.ctx.require_id(NO_EMPLOYEE_MESSAGE).await,
            NO_EMPLOYEE_MESSAGE,
        )?;
        let mut items = Rollback::new(&mut self.items);
        for n in items.iter_mut() {
            n.seen = true;
        }

        if let Err(e) = self.ctx.api.mark_all_notifications_seen(&employee_id).await {
            drop(items);
            return report(
                &mut self.flash,
                Err(e.into()),
                "Failed to mark notifications as seen.",
            );
        }
        items.commit();
        self.refresh().await
    }
}
