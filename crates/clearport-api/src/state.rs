//! Application state shared across all handlers.

use std::sync::Arc;

use sqlx::PgPool;

use clearport_auth::jwt::codec::JwtCodec;
use clearport_core::config::AppConfig;
use clearport_realtime::bus::EventBus;
use clearport_service::notification::NotificationService;
use clearport_service::payment::PaymentService;
use clearport_service::relationship::RelationshipService;
use clearport_service::shipment::ShipmentService;
use clearport_service::user::UserService;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// PostgreSQL connection pool.
    pub db_pool: PgPool,
    /// In-process event bus feeding the SSE streams.
    pub bus: Arc<EventBus>,
    /// JWT codec for bearer token validation.
    pub jwt_codec: Arc<JwtCodec>,
    /// Accounts and credentials.
    pub user_service: Arc<UserService>,
    /// Notification feed.
    pub notification_service: Arc<NotificationService>,
    /// Shipment lifecycle.
    pub shipment_service: Arc<ShipmentService>,
    /// Payment lifecycle.
    pub payment_service: Arc<PaymentService>,
    /// Importer↔agent relationships.
    pub relationship_service: Arc<RelationshipService>,
}
