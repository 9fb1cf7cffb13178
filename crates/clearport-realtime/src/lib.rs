//! In-process event delivery: the per-recipient event bus and the
//! notification stream backing each open push channel.
//!
//! The bus is ephemeral and process-local. Persistence in the notifications
//! table is the durable source of truth; a recipient with no attached
//! listener simply picks the row up on its next poll. In a horizontally
//! scaled deployment this bus does not fan out across instances; that
//! requires a shared broker keyed by recipient id.

pub mod bus;
pub mod stream;

pub use bus::EventBus;
pub use stream::NotificationStream;
