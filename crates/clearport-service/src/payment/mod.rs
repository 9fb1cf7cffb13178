//! Payment requests raised by agents against shipments.

pub mod machine;
pub mod service;

pub use machine::PaymentMachine;
pub use service::{CreatePayment, PaymentService};
