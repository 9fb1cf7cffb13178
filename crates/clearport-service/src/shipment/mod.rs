//! Shipment lifecycle: creation, accept/complete transitions, tracking
//! status updates, and the append-only audit trail.

pub mod machine;
pub mod service;

pub use machine::{ShipmentMachine, ShipmentTransition};
pub use service::{CreateShipment, ShipmentChange, ShipmentService, TruckInput};
