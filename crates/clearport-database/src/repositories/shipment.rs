//! Shipment repository implementation.

use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use clearport_core::error::{AppError, ErrorKind};
use clearport_core::result::AppResult;
use clearport_core::types::pagination::{PageRequest, PageResponse};
use clearport_entity::shipment::{Shipment, ShipmentStatus, ShipmentTruck};

/// Repository for shipments and their truck entries.
#[derive(Debug, Clone)]
pub struct ShipmentRepository {
    pool: PgPool,
}

impl ShipmentRepository {
    /// Create a new shipment repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a shipment inside an open transaction.
    pub async fn create_in(
        &self,
        conn: &mut PgConnection,
        shipment: &Shipment,
    ) -> AppResult<Shipment> {
        sqlx::query_as::<_, Shipment>(
            "INSERT INTO shipments \
             (id, reference, mode, origin_port, destination_port, etd, eta, \
              bill_of_lading_number, bayan_number, document_url, importer_id, agent_id, \
              created_by, clearance_charges_minor, status, is_accepted, is_completed, \
              created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19) \
             RETURNING *",
        )
        .bind(shipment.id)
        .bind(&shipment.reference)
        .bind(shipment.mode)
        .bind(&shipment.origin_port)
        .bind(&shipment.destination_port)
        .bind(shipment.etd)
        .bind(shipment.eta)
        .bind(&shipment.bill_of_lading_number)
        .bind(&shipment.bayan_number)
        .bind(&shipment.document_url)
        .bind(shipment.importer_id)
        .bind(shipment.agent_id)
        .bind(shipment.created_by)
        .bind(shipment.clearance_charges_minor)
        .bind(shipment.status)
        .bind(shipment.is_accepted)
        .bind(shipment.is_completed)
        .bind(shipment.created_at)
        .bind(shipment.updated_at)
        .fetch_one(conn)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create shipment", e))
    }

    /// Fetch a shipment by id.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Shipment>> {
        sqlx::query_as::<_, Shipment>("SELECT * FROM shipments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to fetch shipment", e))
    }

    /// Fetch a shipment inside an open transaction, locking the row for the
    /// remainder of the transaction.
    pub async fn find_by_id_for_update(
        &self,
        conn: &mut PgConnection,
        id: Uuid,
    ) -> AppResult<Option<Shipment>> {
        sqlx::query_as::<_, Shipment>("SELECT * FROM shipments WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(conn)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to fetch shipment", e))
    }

    /// List shipments visible to a user (either side of the shipment),
    /// newest first.
    pub async fn list_for_user(
        &self,
        user_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Shipment>> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM shipments WHERE importer_id = $1 OR agent_id = $1",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count shipments", e))?;

        let shipments = sqlx::query_as::<_, Shipment>(
            "SELECT * FROM shipments WHERE importer_id = $1 OR agent_id = $1 \
             ORDER BY created_at DESC LIMIT $2 OFFSET $3",
        )
        .bind(user_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list shipments", e))?;

        Ok(PageResponse::new(
            shipments,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    /// List all shipments (admin view), newest first.
    pub async fn list_all(&self, page: &PageRequest) -> AppResult<PageResponse<Shipment>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM shipments")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to count shipments", e)
            })?;

        let shipments = sqlx::query_as::<_, Shipment>(
            "SELECT * FROM shipments ORDER BY created_at DESC LIMIT $1 OFFSET $2",
        )
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list shipments", e))?;

        Ok(PageResponse::new(
            shipments,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    /// Apply a state transition inside an open transaction.
    pub async fn apply_transition_in(
        &self,
        conn: &mut PgConnection,
        id: Uuid,
        status: ShipmentStatus,
        is_accepted: bool,
        is_completed: bool,
    ) -> AppResult<Shipment> {
        sqlx::query_as::<_, Shipment>(
            "UPDATE shipments SET status = $2, is_accepted = $3, is_completed = $4, \
             updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .bind(is_accepted)
        .bind(is_completed)
        .fetch_one(conn)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update shipment", e))
    }

    /// Insert a truck entry for a land shipment inside an open transaction.
    pub async fn add_truck_in(
        &self,
        conn: &mut PgConnection,
        shipment_id: Uuid,
        truck_number: &str,
        driver_name: Option<&str>,
        driver_phone: Option<&str>,
    ) -> AppResult<ShipmentTruck> {
        sqlx::query_as::<_, ShipmentTruck>(
            "INSERT INTO shipment_trucks (shipment_id, truck_number, driver_name, driver_phone) \
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(shipment_id)
        .bind(truck_number)
        .bind(driver_name)
        .bind(driver_phone)
        .fetch_one(conn)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to add truck", e))
    }

    /// List truck entries for a shipment.
    pub async fn list_trucks(&self, shipment_id: Uuid) -> AppResult<Vec<ShipmentTruck>> {
        sqlx::query_as::<_, ShipmentTruck>(
            "SELECT * FROM shipment_trucks WHERE shipment_id = $1 ORDER BY created_at",
        )
        .bind(shipment_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list trucks", e))
    }

    /// Next sequence value used to build human-readable references.
    pub async fn next_reference_seq(&self, conn: &mut PgConnection) -> AppResult<i64> {
        sqlx::query_scalar("SELECT nextval('shipment_reference_seq')")
            .fetch_one(conn)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to allocate reference", e)
            })
    }
}
