//! Shipment domain entities.

pub mod model;
pub mod status;
pub mod update;

pub use model::{Shipment, ShipmentTruck};
pub use status::{ShipmentMode, ShipmentStatus};
pub use update::ShipmentUpdate;
