//! Shipment audit trail repository.

use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use clearport_core::error::{AppError, ErrorKind};
use clearport_core::result::AppResult;
use clearport_core::types::pagination::{PageRequest, PageResponse};
use clearport_entity::shipment::ShipmentUpdate;

/// Repository for append-only shipment audit entries.
#[derive(Debug, Clone)]
pub struct ShipmentUpdateRepository {
    pool: PgPool,
}

impl ShipmentUpdateRepository {
    /// Create a new shipment update repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Append an audit entry inside an open transaction.
    pub async fn append_in(
        &self,
        conn: &mut PgConnection,
        shipment_id: Uuid,
        message: &str,
        document_url: Option<&str>,
        created_by: Uuid,
    ) -> AppResult<ShipmentUpdate> {
        sqlx::query_as::<_, ShipmentUpdate>(
            "INSERT INTO shipment_updates (shipment_id, message, document_url, created_by) \
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(shipment_id)
        .bind(message)
        .bind(document_url)
        .bind(created_by)
        .fetch_one(conn)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to append shipment update", e)
        })
    }

    /// List audit entries for a shipment, newest first.
    pub async fn list_for_shipment(
        &self,
        shipment_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<ShipmentUpdate>> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM shipment_updates WHERE shipment_id = $1")
                .bind(shipment_id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to count updates", e)
                })?;

        let updates = sqlx::query_as::<_, ShipmentUpdate>(
            "SELECT * FROM shipment_updates WHERE shipment_id = $1 \
             ORDER BY created_at DESC LIMIT $2 OFFSET $3",
        )
        .bind(shipment_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list updates", e))?;

        Ok(PageResponse::new(
            updates,
            page.page,
            page.page_size,
            total as u64,
        ))
    }
}
