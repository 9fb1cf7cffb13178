//! Shipment lifecycle state machine.
//!
//! Every status mutation goes through one of three actions:
//!
//! * **accept**: the assigned agent takes on the shipment. Allowed
//!   exactly once, and never after completion.
//! * **complete**: the party closing out clearance. Requires a prior
//!   accept; allowed exactly once.
//! * **update status**: the agent sets a descriptive tracking status.
//!   Blocked on completed shipments. The lifecycle statuses themselves
//!   (`Assigned`, `Confirmed`, `Completed`) cannot be set this way.
//!
//! The machine is pure: it inspects the current row and either returns
//! the resulting field values or an error. Callers apply the result
//! inside a transaction that holds a row lock, so two concurrent actions
//! cannot both pass the same precondition.

use clearport_core::error::AppError;
use clearport_core::result::AppResult;
use clearport_entity::shipment::{Shipment, ShipmentStatus};

/// The field values a shipment transition resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShipmentTransition {
    /// New operational status.
    pub status: ShipmentStatus,
    /// New accepted flag.
    pub is_accepted: bool,
    /// New completed flag.
    pub is_completed: bool,
}

/// Decides shipment transitions. Stateless; all inputs come from the
/// locked row.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShipmentMachine;

impl ShipmentMachine {
    /// Resolve an accept action.
    pub fn accept(&self, shipment: &Shipment) -> AppResult<ShipmentTransition> {
        if shipment.is_completed {
            return Err(AppError::conflict(format!(
                "Shipment {} is already completed",
                shipment.reference
            )));
        }
        if shipment.is_accepted {
            return Err(AppError::conflict(format!(
                "Shipment {} is already accepted",
                shipment.reference
            )));
        }
        Ok(ShipmentTransition {
            status: ShipmentStatus::Confirmed,
            is_accepted: true,
            is_completed: false,
        })
    }

    /// Resolve a complete action.
    pub fn complete(&self, shipment: &Shipment) -> AppResult<ShipmentTransition> {
        if shipment.is_completed {
            return Err(AppError::conflict(format!(
                "Shipment {} is already completed",
                shipment.reference
            )));
        }
        if !shipment.is_accepted {
            return Err(AppError::conflict(format!(
                "Shipment {} must be accepted before it can be completed",
                shipment.reference
            )));
        }
        Ok(ShipmentTransition {
            status: ShipmentStatus::Completed,
            is_accepted: true,
            is_completed: true,
        })
    }

    /// Resolve a tracking status update to `target`.
    pub fn update_status(
        &self,
        shipment: &Shipment,
        target: ShipmentStatus,
    ) -> AppResult<ShipmentTransition> {
        if matches!(
            target,
            ShipmentStatus::Assigned | ShipmentStatus::Confirmed | ShipmentStatus::Completed
        ) {
            return Err(AppError::validation(format!(
                "Status '{}' cannot be set directly; use the accept or complete action",
                target.label()
            )));
        }
        if shipment.is_completed {
            return Err(AppError::conflict(format!(
                "Shipment {} is completed and can no longer be updated",
                shipment.reference
            )));
        }
        Ok(ShipmentTransition {
            status: target,
            is_accepted: shipment.is_accepted,
            is_completed: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use clearport_core::error::ErrorKind;
    use clearport_entity::shipment::ShipmentMode;
    use uuid::Uuid;

    fn shipment(status: ShipmentStatus, is_accepted: bool, is_completed: bool) -> Shipment {
        Shipment {
            id: Uuid::new_v4(),
            reference: "SHP-2026-000007".into(),
            mode: ShipmentMode::Sea,
            origin_port: "Shanghai".into(),
            destination_port: "Jeddah Islamic Port".into(),
            etd: None,
            eta: None,
            bill_of_lading_number: None,
            bayan_number: None,
            document_url: None,
            importer_id: Uuid::new_v4(),
            agent_id: Uuid::new_v4(),
            created_by: Uuid::new_v4(),
            clearance_charges_minor: 0,
            status,
            is_accepted,
            is_completed,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_accept_from_assigned() {
        let m = ShipmentMachine;
        let t = m
            .accept(&shipment(ShipmentStatus::Assigned, false, false))
            .expect("accept");
        assert_eq!(t.status, ShipmentStatus::Confirmed);
        assert!(t.is_accepted);
        assert!(!t.is_completed);
    }

    #[test]
    fn test_accept_twice_conflicts() {
        let m = ShipmentMachine;
        let err = m
            .accept(&shipment(ShipmentStatus::Confirmed, true, false))
            .expect_err("second accept");
        assert_eq!(err.kind, ErrorKind::Conflict);
    }

    #[test]
    fn test_complete_requires_prior_accept() {
        let m = ShipmentMachine;
        let err = m
            .complete(&shipment(ShipmentStatus::Assigned, false, false))
            .expect_err("complete before accept");
        assert_eq!(err.kind, ErrorKind::Conflict);
    }

    #[test]
    fn test_complete_from_accepted() {
        let m = ShipmentMachine;
        let t = m
            .complete(&shipment(ShipmentStatus::AtPort, true, false))
            .expect("complete");
        assert_eq!(t.status, ShipmentStatus::Completed);
        assert!(t.is_accepted);
        assert!(t.is_completed);
    }

    #[test]
    fn test_complete_twice_conflicts() {
        let m = ShipmentMachine;
        let err = m
            .complete(&shipment(ShipmentStatus::Completed, true, true))
            .expect_err("second complete");
        assert_eq!(err.kind, ErrorKind::Conflict);
    }

    #[test]
    fn test_update_status_preserves_accept_flag() {
        let m = ShipmentMachine;
        let t = m
            .update_status(
                &shipment(ShipmentStatus::Confirmed, true, false),
                ShipmentStatus::ClearingInProgress,
            )
            .expect("update");
        assert_eq!(t.status, ShipmentStatus::ClearingInProgress);
        assert!(t.is_accepted);
        assert!(!t.is_completed);
    }

    #[test]
    fn test_update_status_rejects_lifecycle_targets() {
        let m = ShipmentMachine;
        let s = shipment(ShipmentStatus::Confirmed, true, false);
        for target in [
            ShipmentStatus::Assigned,
            ShipmentStatus::Confirmed,
            ShipmentStatus::Completed,
        ] {
            let err = m.update_status(&s, target).expect_err("lifecycle target");
            assert_eq!(err.kind, ErrorKind::Validation);
        }
    }

    #[test]
    fn test_update_status_blocked_after_completion() {
        let m = ShipmentMachine;
        let err = m
            .update_status(
                &shipment(ShipmentStatus::Completed, true, true),
                ShipmentStatus::AtPort,
            )
            .expect_err("update after completion");
        assert_eq!(err.kind, ErrorKind::Conflict);
    }
}
