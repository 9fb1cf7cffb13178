//! Domain entities for Clearport: users, shipments, payments,
//! notifications, and importer↔agent relationships.

pub mod notification;
pub mod payment;
pub mod relationship;
pub mod shipment;
pub mod user;
