//! Payment entity model.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::status::PaymentStatus;

/// A payment request raised against a shipment.
///
/// Many payments may reference one shipment. Deletion is permitted only
/// while the payment is still in `Requested`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Payment {
    /// Unique payment identifier.
    pub id: Uuid,
    /// The shipment this payment belongs to.
    pub shipment_id: Uuid,
    /// The requesting agent.
    pub agent_id: Uuid,
    /// The paying importer.
    pub importer_id: Uuid,
    /// Amount in minor currency units (halalas).
    pub amount_minor: i64,
    /// What the payment covers.
    pub description: Option<String>,
    /// Customs bill number.
    pub bill_number: Option<String>,
    /// Customs declaration (bayan) number.
    pub bayan_number: Option<String>,
    /// Date by which the payment is due.
    pub payment_deadline: Option<NaiveDate>,
    /// Kind of payment (customs duty, port fees, ...).
    pub payment_type: Option<String>,
    /// Lifecycle status.
    pub status: PaymentStatus,
    /// URL of the invoice document.
    pub invoice_url: Option<String>,
    /// URL of the uploaded completion receipt.
    pub receipt_url: Option<String>,
    /// When the payment was requested.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}
