//! Outbound invitation mail.

use async_trait::async_trait;
use tracing::info;

use clearport_core::result::AppResult;

/// Sends invitation emails to not-yet-registered counterparties.
///
/// Delivery is best-effort: callers log failures and never fail the
/// business operation over a mail error.
#[async_trait]
pub trait Mailer: Send + Sync + std::fmt::Debug {
    /// Send an invitation to join the platform.
    async fn send_invitation(&self, to: &str, inviter: &str) -> AppResult<()>;
}

/// Log-only transport for environments without an outbound mail provider.
#[derive(Debug, Default, Clone)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send_invitation(&self, to: &str, inviter: &str) -> AppResult<()> {
        info!(to, inviter, "Invitation email (log transport)");
        Ok(())
    }
}
