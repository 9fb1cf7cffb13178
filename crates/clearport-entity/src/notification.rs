//! Notification entity model.
//!
//! A notification is the durable record of a domain event directed at one
//! recipient. The event bus forwards freshly persisted rows to live event
//! streams; the table itself is the source of truth for polling reads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Kind of entity a notification refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "notification_entity_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationEntityType {
    /// A shipment lifecycle event.
    Shipment,
    /// A payment lifecycle event.
    Payment,
    /// A free-form message between parties.
    Message,
    /// Anything else.
    Other,
}

impl NotificationEntityType {
    /// Return the entity type as an uppercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Shipment => "SHIPMENT",
            Self::Payment => "PAYMENT",
            Self::Message => "MESSAGE",
            Self::Other => "OTHER",
        }
    }
}

/// A persisted notification directed at one recipient.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Notification {
    /// Unique notification identifier.
    pub id: Uuid,
    /// The recipient user.
    pub recipient_id: Uuid,
    /// The user whose action produced this notification.
    pub sender_id: Uuid,
    /// Short title.
    pub title: String,
    /// Notification body text.
    pub message: String,
    /// Kind of entity the notification refers to.
    pub entity_type: NotificationEntityType,
    /// Identifier of the referenced entity.
    pub entity_id: Uuid,
    /// Cross-reference to the shipment, when the entity is shipment-scoped.
    pub shipment_id: Option<Uuid>,
    /// Whether the recipient has read this notification.
    pub is_read: bool,
    /// When the notification was created. Authoritative ordering key for
    /// clients; push arrival order is not guaranteed.
    pub created_at: DateTime<Utc>,
}

/// Payload for creating a notification. The id, read flag, and timestamp
/// are assigned at insert time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewNotification {
    /// The recipient user.
    pub recipient_id: Uuid,
    /// The acting user.
    pub sender_id: Uuid,
    /// Short title.
    pub title: String,
    /// Body text.
    pub message: String,
    /// Kind of entity referenced.
    pub entity_type: NotificationEntityType,
    /// Identifier of the referenced entity.
    pub entity_id: Uuid,
    /// Optional shipment cross-reference.
    pub shipment_id: Option<Uuid>,
}
