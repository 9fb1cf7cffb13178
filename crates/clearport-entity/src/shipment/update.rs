//! Shipment audit trail entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// An append-only audit entry on a shipment.
///
/// One entry is written per meaningful state change or comment; entries are
/// listed newest first and never updated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ShipmentUpdate {
    /// Unique row identifier.
    pub id: Uuid,
    /// Owning shipment.
    pub shipment_id: Uuid,
    /// Free-text update message.
    pub message: String,
    /// Optional supporting document URL.
    pub document_url: Option<String>,
    /// The actor who produced the entry.
    pub created_by: Uuid,
    /// When the entry was appended.
    pub created_at: DateTime<Utc>,
}
