//! Request DTOs.
//!
//! Documents travel as base64 payloads inside JSON bodies; the overall
//! body size is capped by `server.max_body_bytes`.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use bytes::Bytes;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use clearport_core::error::AppError;
use clearport_core::result::AppResult;
use clearport_entity::shipment::{ShipmentMode, ShipmentStatus};
use clearport_entity::user::UserRole;
use clearport_service::document::DocumentUpload;

/// A base64-encoded document attached to a JSON request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DocumentPayload {
    /// Original file name.
    #[validate(length(min = 1, max = 255))]
    pub file_name: String,
    /// MIME type.
    #[validate(length(min = 1, max = 127))]
    pub content_type: String,
    /// Base64-encoded file contents.
    #[validate(length(min = 1))]
    pub data_base64: String,
}

impl DocumentPayload {
    /// Decode into the service-level upload type.
    pub fn decode(&self) -> AppResult<DocumentUpload> {
        let data = BASE64
            .decode(&self.data_base64)
            .map_err(|e| AppError::validation(format!("Invalid base64 document data: {e}")))?;
        Ok(DocumentUpload {
            file_name: self.file_name.clone(),
            content_type: self.content_type.clone(),
            data: Bytes::from(data),
        })
    }
}

/// POST /api/auth/register
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Login email.
    #[validate(email)]
    pub email: String,
    /// Display name.
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    /// Password.
    #[validate(length(min = 8, max = 128))]
    pub password: String,
    /// Account role (`importer` or `agent`).
    pub role: UserRole,
    /// Contact phone number.
    #[validate(length(max = 32))]
    pub phone: Option<String>,
    /// Company name.
    #[validate(length(max = 160))]
    pub company: Option<String>,
}

/// POST /api/auth/login
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// Login email.
    #[validate(email)]
    pub email: String,
    /// Password.
    #[validate(length(min = 1))]
    pub password: String,
}

/// POST /api/shipments
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateShipmentRequest {
    /// Transport mode.
    pub mode: ShipmentMode,
    /// Port or terminal of origin.
    #[validate(length(min = 1, max = 160))]
    pub origin_port: String,
    /// Destination port or terminal.
    #[validate(length(min = 1, max = 160))]
    pub destination_port: String,
    /// Estimated departure date.
    pub etd: Option<NaiveDate>,
    /// Estimated arrival date.
    pub eta: Option<NaiveDate>,
    /// Bill of lading / airway bill number.
    #[validate(length(max = 64))]
    pub bill_of_lading_number: Option<String>,
    /// Customs declaration (bayan) number.
    #[validate(length(max = 64))]
    pub bayan_number: Option<String>,
    /// The counterparty: agent id when an importer creates, importer id
    /// when an agent does.
    pub counterparty_id: Uuid,
    /// Estimated clearance charges in minor currency units.
    #[validate(range(min = 0))]
    pub clearance_charges_minor: i64,
    /// Primary shipping document.
    #[validate(nested)]
    pub document: Option<DocumentPayload>,
    /// Trucks for land shipments.
    #[serde(default)]
    #[validate(nested)]
    pub trucks: Vec<TruckRequest>,
}

/// A truck entry inside a shipment creation request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TruckRequest {
    /// Plate number.
    #[validate(length(min = 1, max = 32))]
    pub truck_number: String,
    /// Driver name.
    #[validate(length(max = 120))]
    pub driver_name: Option<String>,
    /// Driver contact number.
    #[validate(length(max = 32))]
    pub driver_phone: Option<String>,
}

/// POST /api/shipments/{id}/accept and /complete
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct TransitionRequest {
    /// Optional note for the audit trail.
    #[validate(length(max = 2000))]
    pub note: Option<String>,
}

/// POST /api/shipments/{id}/status
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateShipmentRequest {
    /// New tracking status.
    pub status: Option<ShipmentStatus>,
    /// Free-form note for the audit trail.
    #[validate(length(max = 2000))]
    pub note: Option<String>,
    /// Supporting document.
    #[validate(nested)]
    pub document: Option<DocumentPayload>,
}

/// POST /api/payments
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreatePaymentRequest {
    /// The shipment the payment belongs to.
    pub shipment_id: Uuid,
    /// Amount in minor currency units.
    #[validate(range(min = 1))]
    pub amount_minor: i64,
    /// What the payment covers.
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    /// Customs bill number.
    #[validate(length(max = 64))]
    pub bill_number: Option<String>,
    /// Customs declaration (bayan) number.
    #[validate(length(max = 64))]
    pub bayan_number: Option<String>,
    /// Date by which the payment is due.
    pub payment_deadline: Option<NaiveDate>,
    /// Kind of payment (customs duty, port fees, ...).
    #[validate(length(max = 64))]
    pub payment_type: Option<String>,
    /// Invoice document.
    #[validate(nested)]
    pub invoice: Option<DocumentPayload>,
}

/// POST /api/payments/{id}/complete
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CompletePaymentRequest {
    /// Receipt document proving the payment.
    #[validate(nested)]
    pub receipt: DocumentPayload,
}

/// PUT /api/notifications/read
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MarkReadRequest {
    /// Notification ids to mark as read.
    #[validate(length(min = 1, max = 500))]
    pub ids: Vec<Uuid>,
}

/// POST /api/relationships/invite
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct InviteRequest {
    /// Email of the counterparty to invite.
    #[validate(email)]
    pub email: String,
}

/// Run validator checks, mapping failures to a validation error.
pub fn validated<T: Validate>(req: T) -> AppResult<T> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;
    Ok(req)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_payload_decodes_base64() {
        let payload = DocumentPayload {
            file_name: "invoice.pdf".into(),
            content_type: "application/pdf".into(),
            data_base64: BASE64.encode(b"%PDF-1.7"),
        };
        let doc = payload.decode().expect("decode");
        assert_eq!(doc.data.as_ref(), b"%PDF-1.7");
    }

    #[test]
    fn test_document_payload_rejects_garbage() {
        let payload = DocumentPayload {
            file_name: "invoice.pdf".into(),
            content_type: "application/pdf".into(),
            data_base64: "not base64 at all!!!".into(),
        };
        assert!(payload.decode().is_err());
    }

    #[test]
    fn test_register_request_validates_email() {
        let req = RegisterRequest {
            email: "not-an-email".into(),
            name: "Test".into(),
            password: "secret-password".into(),
            role: UserRole::Importer,
            phone: None,
            company: None,
        };
        assert!(validated(req).is_err());
    }
}
