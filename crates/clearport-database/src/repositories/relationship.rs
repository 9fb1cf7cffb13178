//! Importer↔agent relationship repository.

use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use clearport_core::error::{AppError, ErrorKind};
use clearport_core::result::AppResult;
use clearport_entity::relationship::{Relationship, RelationshipStatus};
use clearport_entity::user::UserRole;

/// Repository for importer↔agent links.
#[derive(Debug, Clone)]
pub struct RelationshipRepository {
    pool: PgPool,
}

impl RelationshipRepository {
    /// Create a new relationship repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert an invitation row.
    pub async fn create(&self, relationship: &Relationship) -> AppResult<Relationship> {
        sqlx::query_as::<_, Relationship>(
            "INSERT INTO relationships \
             (id, importer_id, agent_id, invited_email, status, invited_by, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING *",
        )
        .bind(relationship.id)
        .bind(relationship.importer_id)
        .bind(relationship.agent_id)
        .bind(&relationship.invited_email)
        .bind(relationship.status)
        .bind(relationship.invited_by)
        .bind(relationship.created_at)
        .bind(relationship.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to create relationship", e)
        })
    }

    /// List relationships a user is part of, newest first.
    pub async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<Relationship>> {
        sqlx::query_as::<_, Relationship>(
            "SELECT * FROM relationships WHERE importer_id = $1 OR agent_id = $1 \
             ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list relationships", e)
        })
    }

    /// Bind every pending invitation for an email to a newly registered
    /// user, inside an open transaction.
    ///
    /// The registrant's role decides which side of the link gets bound.
    /// Returns the number of invitations resolved.
    pub async fn bind_invitations_in(
        &self,
        conn: &mut PgConnection,
        email: &str,
        user_id: Uuid,
        role: UserRole,
    ) -> AppResult<u64> {
        let sql = match role {
            UserRole::Importer => {
                "UPDATE relationships SET importer_id = $1, status = $2, updated_at = NOW() \
                 WHERE invited_email = $3 AND status = $4 AND importer_id IS NULL"
            }
            UserRole::Agent => {
                "UPDATE relationships SET agent_id = $1, status = $2, updated_at = NOW() \
                 WHERE invited_email = $3 AND status = $4 AND agent_id IS NULL"
            }
            UserRole::Admin => return Ok(0),
        };

        let result = sqlx::query(sql)
            .bind(user_id)
            .bind(RelationshipStatus::Active)
            .bind(email)
            .bind(RelationshipStatus::Invited)
            .execute(conn)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to bind invitations", e)
            })?;
        Ok(result.rows_affected())
    }
}
