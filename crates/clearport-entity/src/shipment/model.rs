//! Shipment entity model.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::status::{ShipmentMode, ShipmentStatus};

/// A shipment under customs clearance.
///
/// `importer_id` and `agent_id` are fixed at creation; the accept and
/// complete flags only ever move from false to true.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Shipment {
    /// Unique shipment identifier.
    pub id: Uuid,
    /// Human-readable business reference (e.g. `SHP-2026-000042`).
    pub reference: String,
    /// Transport mode.
    pub mode: ShipmentMode,
    /// Port or terminal of origin.
    pub origin_port: String,
    /// Destination port or terminal.
    pub destination_port: String,
    /// Estimated departure date.
    pub etd: Option<NaiveDate>,
    /// Estimated arrival date.
    pub eta: Option<NaiveDate>,
    /// Bill of lading / airway bill number.
    pub bill_of_lading_number: Option<String>,
    /// Customs declaration (bayan) number.
    pub bayan_number: Option<String>,
    /// URL of the primary shipping document.
    pub document_url: Option<String>,
    /// The importer side of the shipment.
    pub importer_id: Uuid,
    /// The clearance agent side of the shipment.
    pub agent_id: Uuid,
    /// The user who created the shipment (importer or agent).
    pub created_by: Uuid,
    /// Estimated clearance charges in minor currency units (halalas).
    pub clearance_charges_minor: i64,
    /// Current operational status.
    pub status: ShipmentStatus,
    /// Whether the agent has accepted the shipment.
    pub is_accepted: bool,
    /// Whether clearance has been completed.
    pub is_completed: bool,
    /// When the shipment was created.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

impl Shipment {
    /// The party on the other side of the shipment from the given actor.
    ///
    /// An agent's counterparty is the importer and vice versa. Used when a
    /// transition notifies "the other party".
    pub fn counterparty_of(&self, actor_id: Uuid) -> Uuid {
        if actor_id == self.agent_id {
            self.importer_id
        } else {
            self.agent_id
        }
    }
}

/// A truck attached to a land shipment. Created only at shipment-creation
/// time and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ShipmentTruck {
    /// Unique row identifier.
    pub id: Uuid,
    /// Owning shipment.
    pub shipment_id: Uuid,
    /// Plate number.
    pub truck_number: String,
    /// Driver name.
    pub driver_name: Option<String>,
    /// Driver contact number.
    pub driver_phone: Option<String>,
    /// When the truck entry was created.
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shipment(importer: Uuid, agent: Uuid) -> Shipment {
        Shipment {
            id: Uuid::new_v4(),
            reference: "SHP-2026-000001".into(),
            mode: ShipmentMode::Sea,
            origin_port: "Shanghai".into(),
            destination_port: "Jeddah Islamic Port".into(),
            etd: None,
            eta: None,
            bill_of_lading_number: None,
            bayan_number: None,
            document_url: None,
            importer_id: importer,
            agent_id: agent,
            created_by: importer,
            clearance_charges_minor: 0,
            status: ShipmentStatus::Assigned,
            is_accepted: false,
            is_completed: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_counterparty_resolution() {
        let importer = Uuid::new_v4();
        let agent = Uuid::new_v4();
        let s = shipment(importer, agent);
        assert_eq!(s.counterparty_of(agent), importer);
        assert_eq!(s.counterparty_of(importer), agent);
    }
}
