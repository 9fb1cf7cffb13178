//! Importer↔agent relationship entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::user::UserRole;

/// Status of an importer↔agent link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "relationship_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelationshipStatus {
    /// Invitation sent; the invited side has not registered yet.
    Invited,
    /// Both sides are bound to registered users.
    Active,
}

/// A link between one importer and one agent.
///
/// One side may be null while the invitation is pending; registration with
/// the invited email binds the open side and flips the status to `Active`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Relationship {
    /// Unique row identifier.
    pub id: Uuid,
    /// The importer side, null while an importer invitation is pending.
    pub importer_id: Option<Uuid>,
    /// The agent side, null while an agent invitation is pending.
    pub agent_id: Option<Uuid>,
    /// Email address the invitation was sent to.
    pub invited_email: String,
    /// Link status.
    pub status: RelationshipStatus,
    /// Role of the user who issued the invitation.
    pub invited_by: UserRole,
    /// When the invitation was created.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}
