//! Notification feed and delivery orchestration.

pub mod service;

pub use service::{NotificationFeed, NotificationService};
