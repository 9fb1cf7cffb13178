//! Notification repository implementation.

use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use clearport_core::error::{AppError, ErrorKind};
use clearport_core::result::AppResult;
use clearport_core::types::pagination::{PageRequest, PageResponse};
use clearport_entity::notification::{NewNotification, Notification};

const INSERT_SQL: &str = "INSERT INTO notifications \
     (recipient_id, sender_id, title, message, entity_type, entity_id, shipment_id) \
     VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *";

/// Repository for notification records.
#[derive(Debug, Clone)]
pub struct NotificationRepository {
    pool: PgPool,
}

impl NotificationRepository {
    /// Create a new notification repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Persist a notification inside an open transaction.
    ///
    /// Used by status transitions so the notification row commits together
    /// with the business mutation it describes.
    pub async fn create_in(
        &self,
        conn: &mut PgConnection,
        new: &NewNotification,
    ) -> AppResult<Notification> {
        sqlx::query_as::<_, Notification>(INSERT_SQL)
            .bind(new.recipient_id)
            .bind(new.sender_id)
            .bind(&new.title)
            .bind(&new.message)
            .bind(new.entity_type)
            .bind(new.entity_id)
            .bind(new.shipment_id)
            .fetch_one(conn)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to create notification", e)
            })
    }

    /// List notifications for a recipient, newest first.
    pub async fn find_by_recipient(
        &self,
        recipient_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Notification>> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM notifications WHERE recipient_id = $1")
                .bind(recipient_id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to count notifications", e)
                })?;

        let notifs = sqlx::query_as::<_, Notification>(
            "SELECT * FROM notifications WHERE recipient_id = $1 \
             ORDER BY created_at DESC, id DESC LIMIT $2 OFFSET $3",
        )
        .bind(recipient_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list notifications", e)
        })?;

        Ok(PageResponse::new(
            notifs,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    /// Count unread notifications for a recipient.
    pub async fn count_unread(&self, recipient_id: Uuid) -> AppResult<i64> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications WHERE recipient_id = $1 AND is_read = FALSE",
        )
        .bind(recipient_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count unread", e))
    }

    /// Mark a batch of notifications as read.
    ///
    /// The update is restricted to rows owned by the recipient and returns
    /// the number of rows matched. Rows that were already read still count,
    /// which makes repeated calls idempotent.
    pub async fn mark_read(&self, recipient_id: Uuid, ids: &[Uuid]) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = TRUE WHERE recipient_id = $1 AND id = ANY($2)",
        )
        .bind(recipient_id)
        .bind(ids)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to mark read", e))?;
        Ok(result.rows_affected())
    }
}
