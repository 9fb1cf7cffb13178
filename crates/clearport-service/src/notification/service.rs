//! Notification feed reads and delivery.
//!
//! Other services persist notification rows inside their own business
//! transaction through [`NotificationService::record_in`] and hand the
//! committed rows to [`NotificationService::publish`] afterwards. The bus
//! push is fire-and-forget; the row is the durable record either way.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use sqlx::PgConnection;
use tracing::info;
use uuid::Uuid;

use clearport_core::error::AppError;
use clearport_core::result::AppResult;
use clearport_core::types::pagination::{PageRequest, PageResponse};
use clearport_database::repositories::notification::NotificationRepository;
use clearport_entity::notification::{NewNotification, Notification};
use clearport_realtime::bus::EventBus;

use crate::context::RequestContext;

/// One page of a user's notification feed plus their unread total.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationFeed {
    /// The requested page, newest first.
    pub notifications: PageResponse<Notification>,
    /// Unread notifications across the whole feed, not just this page.
    pub unread_count: i64,
}

/// Manages the per-user notification feed.
#[derive(Debug, Clone)]
pub struct NotificationService {
    /// Notification repository.
    notifications: Arc<NotificationRepository>,
    /// In-process event bus for live push.
    bus: Arc<EventBus>,
}

impl NotificationService {
    /// Creates a new notification service.
    pub fn new(notifications: Arc<NotificationRepository>, bus: Arc<EventBus>) -> Self {
        Self { notifications, bus }
    }

    /// Lists notifications for the current user, newest first, together
    /// with the unread total.
    pub async fn feed(
        &self,
        ctx: &RequestContext,
        page: &PageRequest,
    ) -> AppResult<NotificationFeed> {
        let notifications = self
            .notifications
            .find_by_recipient(ctx.user_id, page)
            .await?;
        let unread_count = self.notifications.count_unread(ctx.user_id).await?;
        Ok(NotificationFeed {
            notifications,
            unread_count,
        })
    }

    /// Gets the unread notification count.
    pub async fn unread_count(&self, ctx: &RequestContext) -> AppResult<i64> {
        self.notifications.count_unread(ctx.user_id).await
    }

    /// Marks a batch of the current user's notifications as read.
    ///
    /// Already-read notifications still count as matched, so repeating the
    /// same call succeeds. Ids belonging to other users are ignored; if
    /// nothing matched at all the batch is treated as not found.
    pub async fn mark_read(&self, ctx: &RequestContext, ids: &[Uuid]) -> AppResult<u64> {
        if ids.is_empty() {
            return Err(AppError::validation("No notification ids provided"));
        }
        let updated = self.notifications.mark_read(ctx.user_id, ids).await?;
        if updated == 0 {
            return Err(AppError::not_found("No matching notifications"));
        }
        info!(user_id = %ctx.user_id, updated, "Notifications marked read");
        Ok(updated)
    }

    /// Persists a notification row inside an open business transaction.
    ///
    /// The row commits or rolls back together with the mutation that
    /// produced it. Call [`publish`](Self::publish) after the commit.
    pub async fn record_in(
        &self,
        conn: &mut PgConnection,
        new: &NewNotification,
    ) -> AppResult<Notification> {
        self.notifications.create_in(conn, new).await
    }

    /// Pushes an already-committed notification to the recipient's live
    /// event streams. Never fails; offline recipients read the table.
    pub fn publish(&self, notification: &Notification) {
        self.bus.publish(notification);
    }
}
