//! Repository implementations, one per aggregate.
//!
//! Repositories expose pool-based methods for standalone reads and
//! `*_in(&mut PgConnection)` variants so services can compose several
//! writes inside a single transaction.

pub mod notification;
pub mod payment;
pub mod relationship;
pub mod shipment;
pub mod shipment_update;
pub mod user;
