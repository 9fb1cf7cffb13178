//! Payment repository implementation.

use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use clearport_core::error::{AppError, ErrorKind};
use clearport_core::result::AppResult;
use clearport_core::types::pagination::{PageRequest, PageResponse};
use clearport_entity::payment::{Payment, PaymentStatus};

/// Repository for payment requests.
#[derive(Debug, Clone)]
pub struct PaymentRepository {
    pool: PgPool,
}

impl PaymentRepository {
    /// Create a new payment repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a payment inside an open transaction.
    pub async fn create_in(&self, conn: &mut PgConnection, payment: &Payment) -> AppResult<Payment> {
        sqlx::query_as::<_, Payment>(
            "INSERT INTO payments \
             (id, shipment_id, agent_id, importer_id, amount_minor, description, bill_number, \
              bayan_number, payment_deadline, payment_type, status, invoice_url, receipt_url, \
              created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15) \
             RETURNING *",
        )
        .bind(payment.id)
        .bind(payment.shipment_id)
        .bind(payment.agent_id)
        .bind(payment.importer_id)
        .bind(payment.amount_minor)
        .bind(&payment.description)
        .bind(&payment.bill_number)
        .bind(&payment.bayan_number)
        .bind(payment.payment_deadline)
        .bind(&payment.payment_type)
        .bind(payment.status)
        .bind(&payment.invoice_url)
        .bind(&payment.receipt_url)
        .bind(payment.created_at)
        .bind(payment.updated_at)
        .fetch_one(conn)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create payment", e))
    }

    /// Fetch a payment by id.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Payment>> {
        sqlx::query_as::<_, Payment>("SELECT * FROM payments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to fetch payment", e))
    }

    /// Fetch a payment inside an open transaction, locking the row.
    pub async fn find_by_id_for_update(
        &self,
        conn: &mut PgConnection,
        id: Uuid,
    ) -> AppResult<Option<Payment>> {
        sqlx::query_as::<_, Payment>("SELECT * FROM payments WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(conn)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to fetch payment", e))
    }

    /// List payments attached to a shipment, newest first.
    pub async fn list_for_shipment(&self, shipment_id: Uuid) -> AppResult<Vec<Payment>> {
        sqlx::query_as::<_, Payment>(
            "SELECT * FROM payments WHERE shipment_id = $1 ORDER BY created_at DESC",
        )
        .bind(shipment_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list payments", e))
    }

    /// List payments visible to a user (either side), newest first.
    pub async fn list_for_user(
        &self,
        user_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Payment>> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM payments WHERE importer_id = $1 OR agent_id = $1",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count payments", e))?;

        let payments = sqlx::query_as::<_, Payment>(
            "SELECT * FROM payments WHERE importer_id = $1 OR agent_id = $1 \
             ORDER BY created_at DESC LIMIT $2 OFFSET $3",
        )
        .bind(user_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list payments", e))?;

        Ok(PageResponse::new(
            payments,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    /// Set the status of a payment inside an open transaction.
    pub async fn set_status_in(
        &self,
        conn: &mut PgConnection,
        id: Uuid,
        status: PaymentStatus,
    ) -> AppResult<Payment> {
        sqlx::query_as::<_, Payment>(
            "UPDATE payments SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .fetch_one(conn)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update payment", e))
    }

    /// Mark a payment completed with its receipt document, inside an open
    /// transaction.
    pub async fn complete_in(
        &self,
        conn: &mut PgConnection,
        id: Uuid,
        receipt_url: &str,
    ) -> AppResult<Payment> {
        sqlx::query_as::<_, Payment>(
            "UPDATE payments SET status = $2, receipt_url = $3, updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(PaymentStatus::Completed)
        .bind(receipt_url)
        .fetch_one(conn)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to complete payment", e))
    }

    /// Delete a payment inside an open transaction.
    pub async fn delete_in(&self, conn: &mut PgConnection, id: Uuid) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM payments WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete payment", e)
            })?;
        Ok(result.rows_affected())
    }
}
