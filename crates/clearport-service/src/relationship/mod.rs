//! Importer↔agent relationships and invitations.

pub mod service;

pub use service::RelationshipService;
