//! HTTP request handlers.

pub mod auth;
pub mod events;
pub mod health;
pub mod notification;
pub mod payment;
pub mod relationship;
pub mod shipment;
