//! Payment lifecycle state machine.
//!
//! A payment starts in `Requested`. The importer may confirm or reject it
//! exactly once. Completion attaches a receipt document; whether it
//! requires a prior confirmation is a deployment choice
//! (`payments.require_confirmed_completion`). Deletion is allowed only
//! while the payment is still in `Requested`.

use clearport_core::error::AppError;
use clearport_core::result::AppResult;
use clearport_entity::payment::PaymentStatus;

/// Decides payment transitions.
#[derive(Debug, Clone, Copy)]
pub struct PaymentMachine {
    /// When true, completion is only allowed from `Confirmed`.
    require_confirmed_completion: bool,
}

impl PaymentMachine {
    /// Creates a payment machine.
    pub fn new(require_confirmed_completion: bool) -> Self {
        Self {
            require_confirmed_completion,
        }
    }

    /// Resolve an importer confirmation.
    pub fn confirm(&self, current: PaymentStatus) -> AppResult<PaymentStatus> {
        match current {
            PaymentStatus::Requested => Ok(PaymentStatus::Confirmed),
            other => Err(AppError::conflict(format!(
                "Cannot confirm a payment in status {other}"
            ))),
        }
    }

    /// Resolve an importer rejection.
    pub fn reject(&self, current: PaymentStatus) -> AppResult<PaymentStatus> {
        match current {
            PaymentStatus::Requested => Ok(PaymentStatus::Rejected),
            other => Err(AppError::conflict(format!(
                "Cannot reject a payment in status {other}"
            ))),
        }
    }

    /// Check that a completion is allowed from the current status.
    pub fn check_complete(&self, current: PaymentStatus) -> AppResult<()> {
        if current == PaymentStatus::Completed {
            return Err(AppError::conflict("Payment is already completed"));
        }
        if self.require_confirmed_completion && current != PaymentStatus::Confirmed {
            return Err(AppError::conflict(format!(
                "Payment must be confirmed before completion, current status is {current}"
            )));
        }
        Ok(())
    }

    /// Check that a deletion is allowed from the current status.
    pub fn check_delete(&self, current: PaymentStatus) -> AppResult<()> {
        match current {
            PaymentStatus::Requested => Ok(()),
            other => Err(AppError::conflict(format!(
                "Cannot delete a payment in status {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clearport_core::error::ErrorKind;

    #[test]
    fn test_confirm_only_from_requested() {
        let m = PaymentMachine::new(false);
        assert_eq!(
            m.confirm(PaymentStatus::Requested).expect("confirm"),
            PaymentStatus::Confirmed
        );
        for status in [
            PaymentStatus::Confirmed,
            PaymentStatus::Rejected,
            PaymentStatus::Completed,
        ] {
            assert_eq!(
                m.confirm(status).expect_err("confirm").kind,
                ErrorKind::Conflict
            );
        }
    }

    #[test]
    fn test_reject_only_from_requested() {
        let m = PaymentMachine::new(false);
        assert_eq!(
            m.reject(PaymentStatus::Requested).expect("reject"),
            PaymentStatus::Rejected
        );
        assert_eq!(
            m.reject(PaymentStatus::Completed).expect_err("reject").kind,
            ErrorKind::Conflict
        );
    }

    #[test]
    fn test_complete_without_confirmation_when_relaxed() {
        let m = PaymentMachine::new(false);
        m.check_complete(PaymentStatus::Requested).expect("relaxed");
        m.check_complete(PaymentStatus::Confirmed).expect("relaxed");
        m.check_complete(PaymentStatus::Rejected).expect("relaxed");
        assert_eq!(
            m.check_complete(PaymentStatus::Completed)
                .expect_err("repeat")
                .kind,
            ErrorKind::Conflict
        );
    }

    #[test]
    fn test_complete_requires_confirmation_when_strict() {
        let m = PaymentMachine::new(true);
        m.check_complete(PaymentStatus::Confirmed).expect("strict");
        for status in [PaymentStatus::Requested, PaymentStatus::Rejected] {
            assert_eq!(
                m.check_complete(status).expect_err("strict").kind,
                ErrorKind::Conflict
            );
        }
    }

    #[test]
    fn test_delete_only_while_requested() {
        let m = PaymentMachine::new(false);
        m.check_delete(PaymentStatus::Requested).expect("delete");
        let err = m.check_delete(PaymentStatus::Confirmed).expect_err("delete");
        assert_eq!(err.kind, ErrorKind::Conflict);
        assert!(err.message.contains("CONFIRMED"));
    }
}
