//! # clearport-service
//!
//! Business logic service layer for Clearport. Each service orchestrates
//! repositories, the event bus, document storage, and authentication to
//! implement application-level use cases.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references.

pub mod context;
pub mod document;
pub mod mailer;
pub mod money;
pub mod notification;
pub mod payment;
pub mod relationship;
pub mod shipment;
pub mod user;

pub use context::RequestContext;
pub use document::DocumentUpload;
pub use mailer::{LogMailer, Mailer};
pub use notification::{NotificationFeed, NotificationService};
pub use payment::{CreatePayment, PaymentMachine, PaymentService};
pub use relationship::RelationshipService;
pub use shipment::{CreateShipment, ShipmentChange, ShipmentMachine, ShipmentService, TruckInput};
pub use user::{AuthenticatedUser, RegisterUser, UserService};
