//! Shared harness for the database-backed tests.

use std::sync::Arc;

use bytes::Bytes;
use sqlx::PgPool;
use uuid::Uuid;

use clearport_core::config::DatabaseConfig;
use clearport_database::repositories::notification::NotificationRepository;
use clearport_database::repositories::payment::PaymentRepository;
use clearport_database::repositories::shipment::ShipmentRepository;
use clearport_database::repositories::shipment_update::ShipmentUpdateRepository;
use clearport_entity::user::UserRole;
use clearport_realtime::bus::EventBus;
use clearport_service::context::RequestContext;
use clearport_service::document::DocumentUpload;
use clearport_service::notification::NotificationService;
use clearport_service::payment::{PaymentMachine, PaymentService};
use clearport_service::shipment::ShipmentService;
use clearport_storage::providers::local::LocalDocumentStore;

/// Wired services plus a pool for direct row assertions.
pub struct TestApp {
    pub db_pool: PgPool,
    pub shipments: ShipmentService,
    pub payments: PaymentService,
}

impl TestApp {
    /// Connects to the test database, or returns `None` when
    /// `CLEARPORT_TEST_DATABASE_URL` is not set.
    pub async fn new() -> Option<Self> {
        let url = std::env::var("CLEARPORT_TEST_DATABASE_URL").ok()?;
        let config = DatabaseConfig {
            url,
            max_connections: 5,
            min_connections: 1,
            connect_timeout_seconds: 5,
            idle_timeout_seconds: 60,
        };

        let db_pool = clearport_database::connection::create_pool(&config)
            .await
            .expect("connect to test database");
        clearport_database::connection::run_migrations(&db_pool)
            .await
            .expect("run migrations");

        let store_root = std::env::temp_dir().join(format!("clearport-it-{}", Uuid::new_v4()));
        let store = Arc::new(
            LocalDocumentStore::new(
                store_root.to_str().expect("utf8 temp path"),
                "http://localhost:8080/documents",
            )
            .await
            .expect("document store"),
        );

        let bus = Arc::new(EventBus::new(16));
        let notification_repo = Arc::new(NotificationRepository::new(db_pool.clone()));
        let shipment_repo = Arc::new(ShipmentRepository::new(db_pool.clone()));
        let update_repo = Arc::new(ShipmentUpdateRepository::new(db_pool.clone()));
        let payment_repo = Arc::new(PaymentRepository::new(db_pool.clone()));

        let notifier = Arc::new(NotificationService::new(notification_repo, bus));
        let shipments = ShipmentService::new(
            db_pool.clone(),
            Arc::clone(&shipment_repo),
            Arc::clone(&update_repo),
            Arc::clone(&notifier),
            store.clone(),
        );
        let payments = PaymentService::new(
            db_pool.clone(),
            payment_repo,
            shipment_repo,
            update_repo,
            notifier,
            store,
            PaymentMachine::new(false),
            "SAR".to_string(),
        );

        Some(Self {
            db_pool,
            shipments,
            payments,
        })
    }

    /// Inserts a user with a unique email and returns its id.
    pub async fn create_user(&self, role: &str) -> Uuid {
        let id = Uuid::new_v4();
        sqlx::query(
            "INSERT INTO users (id, email, name, password_hash, role) \
             VALUES ($1, $2, $3, 'x', $4::user_role)",
        )
        .bind(id)
        .bind(format!("{role}-{id}@test.local"))
        .bind(format!("Test {role}"))
        .bind(role)
        .execute(&self.db_pool)
        .await
        .expect("create test user");
        id
    }

    /// Inserts a shipment in the given status and returns its id.
    pub async fn create_shipment(
        &self,
        importer_id: Uuid,
        agent_id: Uuid,
        status: &str,
        is_accepted: bool,
    ) -> Uuid {
        let id = Uuid::new_v4();
        sqlx::query(
            "INSERT INTO shipments \
             (id, reference, mode, origin_port, destination_port, \
              importer_id, agent_id, created_by, status, is_accepted) \
             VALUES ($1, $2, 'sea'::shipment_mode, 'Shanghai', 'Jeddah', \
              $3, $4, $3, $5::shipment_status, $6)",
        )
        .bind(id)
        .bind(format!("SHP-TEST-{id}"))
        .bind(importer_id)
        .bind(agent_id)
        .bind(status)
        .bind(is_accepted)
        .execute(&self.db_pool)
        .await
        .expect("create test shipment");
        id
    }

    /// Inserts a payment in the given status and returns its id.
    pub async fn create_payment(
        &self,
        shipment_id: Uuid,
        agent_id: Uuid,
        importer_id: Uuid,
        amount_minor: i64,
        status: &str,
    ) -> Uuid {
        let id = Uuid::new_v4();
        sqlx::query(
            "INSERT INTO payments \
             (id, shipment_id, agent_id, importer_id, amount_minor, status) \
             VALUES ($1, $2, $3, $4, $5, $6::payment_status)",
        )
        .bind(id)
        .bind(shipment_id)
        .bind(agent_id)
        .bind(importer_id)
        .bind(amount_minor)
        .bind(status)
        .execute(&self.db_pool)
        .await
        .expect("create test payment");
        id
    }

    /// Counts audit trail rows for a shipment.
    pub async fn audit_count(&self, shipment_id: Uuid) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM shipment_updates WHERE shipment_id = $1")
            .bind(shipment_id)
            .fetch_one(&self.db_pool)
            .await
            .expect("count audit rows")
    }

    /// Fetches `(recipient_id, title, entity_type)` of the notifications
    /// attached to an entity, oldest first.
    pub async fn notifications_for_entity(&self, entity_id: Uuid) -> Vec<(Uuid, String, String)> {
        sqlx::query_as(
            "SELECT recipient_id, title, entity_type::text FROM notifications \
             WHERE entity_id = $1 ORDER BY created_at",
        )
        .bind(entity_id)
        .fetch_all(&self.db_pool)
        .await
        .expect("fetch notifications")
    }
}

pub fn ctx(user_id: Uuid, role: UserRole) -> RequestContext {
    RequestContext::new(user_id, role, format!("{user_id}@test.local"))
}

pub fn test_document(file_name: &str) -> DocumentUpload {
    DocumentUpload {
        file_name: file_name.to_string(),
        content_type: "application/pdf".to_string(),
        data: Bytes::from_static(b"%PDF-1.4 test"),
    }
}
