//! Shipment status and transport mode enumerations.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Transport mode of a shipment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "shipment_mode", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ShipmentMode {
    /// Air freight.
    Air,
    /// Sea freight.
    Sea,
    /// Land transport (carries truck entries).
    Land,
}

/// Operational status of a shipment.
///
/// `Assigned`, `Confirmed`, and `Completed` track the accept/complete
/// lifecycle; the remaining values are the descriptive tracking vocabulary
/// an agent sets directly through the update-status action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "shipment_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShipmentStatus {
    /// Created and assigned to an agent, not yet accepted.
    Assigned,
    /// Accepted by the agent.
    Confirmed,
    /// Clearance finished, shipment closed.
    Completed,
    /// Cargo arrived at the port.
    AtPort,
    /// Customs clearance underway.
    ClearingInProgress,
    /// Held by customs.
    OnHoldByCustoms,
    /// Customs requested further documents.
    AdditionalDocumentRequired,
    /// Cargo moving between locations.
    InTransit,
    /// Rejected by the handling party.
    Rejected,
    /// Unclassified status, see the accompanying note.
    Other,
    /// Cleared by customs.
    CompletedByCustoms,
    /// Rejected by customs.
    RejectedByCustoms,
}

impl ShipmentStatus {
    /// Human-readable label used in notification messages.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Assigned => "Assigned",
            Self::Confirmed => "Confirmed",
            Self::Completed => "Completed",
            Self::AtPort => "At port",
            Self::ClearingInProgress => "Clearing in progress",
            Self::OnHoldByCustoms => "On hold by customs",
            Self::AdditionalDocumentRequired => "Additional document required",
            Self::InTransit => "In transit",
            Self::Rejected => "Rejected",
            Self::Other => "Other",
            Self::CompletedByCustoms => "Completed by customs",
            Self::RejectedByCustoms => "Rejected by customs",
        }
    }
}

impl fmt::Display for ShipmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_format_is_screaming_snake() {
        let json = serde_json::to_string(&ShipmentStatus::OnHoldByCustoms).expect("serialize");
        assert_eq!(json, "\"ON_HOLD_BY_CUSTOMS\"");
        let parsed: ShipmentStatus =
            serde_json::from_str("\"CLEARING_IN_PROGRESS\"").expect("deserialize");
        assert_eq!(parsed, ShipmentStatus::ClearingInProgress);
    }
}
