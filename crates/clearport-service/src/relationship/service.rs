//! Importer↔agent relationship management.
//!
//! A user invites a counterparty by email. If the counterparty is already
//! registered with the complementary role, the link becomes active right
//! away; otherwise a pending invitation is stored and bound automatically
//! when someone registers with that email.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use clearport_core::error::AppError;
use clearport_core::result::AppResult;
use clearport_database::repositories::relationship::RelationshipRepository;
use clearport_database::repositories::user::UserRepository;
use clearport_entity::relationship::{Relationship, RelationshipStatus};
use clearport_entity::user::UserRole;

use crate::context::RequestContext;
use crate::mailer::Mailer;

/// Manages importer↔agent links.
#[derive(Debug, Clone)]
pub struct RelationshipService {
    relationships: Arc<RelationshipRepository>,
    users: Arc<UserRepository>,
    mailer: Arc<dyn Mailer>,
}

impl RelationshipService {
    /// Creates a new relationship service.
    pub fn new(
        relationships: Arc<RelationshipRepository>,
        users: Arc<UserRepository>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self {
            relationships,
            users,
            mailer,
        }
    }

    /// Invites a counterparty by email.
    pub async fn invite(&self, ctx: &RequestContext, email: &str) -> AppResult<Relationship> {
        if ctx.is_admin() {
            return Err(AppError::forbidden(
                "Administrators cannot send invitations",
            ));
        }
        let email = email.trim().to_lowercase();
        if email == ctx.email.to_lowercase() {
            return Err(AppError::validation("Cannot invite yourself"));
        }

        let invitee = self.users.find_by_email(&email).await?;
        let relationship = match invitee {
            Some(user) => {
                if user.role == ctx.role {
                    return Err(AppError::validation(format!(
                        "Cannot link two accounts with the {} role",
                        ctx.role
                    )));
                }
                if user.role == UserRole::Admin {
                    return Err(AppError::validation("Cannot invite an administrator"));
                }
                self.link(ctx, &email, user.id).await?
            }
            None => {
                let rel = self.pending(ctx, &email).await?;
                if let Err(e) = self.mailer.send_invitation(&email, &ctx.email).await {
                    // Mail delivery never fails the invitation itself.
                    warn!(to = %email, error = %e, "Invitation email failed");
                }
                rel
            }
        };

        info!(
            inviter = %ctx.user_id,
            invited_email = %email,
            status = ?relationship.status,
            "Invitation created"
        );
        Ok(relationship)
    }

    /// Lists relationships the current user is part of.
    pub async fn list(&self, ctx: &RequestContext) -> AppResult<Vec<Relationship>> {
        self.relationships.list_for_user(ctx.user_id).await
    }

    async fn link(
        &self,
        ctx: &RequestContext,
        email: &str,
        invitee_id: Uuid,
    ) -> AppResult<Relationship> {
        let (importer_id, agent_id) = match ctx.role {
            UserRole::Importer => (Some(ctx.user_id), Some(invitee_id)),
            UserRole::Agent => (Some(invitee_id), Some(ctx.user_id)),
            UserRole::Admin => unreachable!("rejected above"),
        };
        let now = Utc::now();
        self.relationships
            .create(&Relationship {
                id: Uuid::new_v4(),
                importer_id,
                agent_id,
                invited_email: email.to_string(),
                status: RelationshipStatus::Active,
                invited_by: ctx.role,
                created_at: now,
                updated_at: now,
            })
            .await
    }

    async fn pending(&self, ctx: &RequestContext, email: &str) -> AppResult<Relationship> {
        let (importer_id, agent_id) = match ctx.role {
            UserRole::Importer => (Some(ctx.user_id), None),
            UserRole::Agent => (None, Some(ctx.user_id)),
            UserRole::Admin => unreachable!("rejected above"),
        };
        let now = Utc::now();
        self.relationships
            .create(&Relationship {
                id: Uuid::new_v4(),
                importer_id,
                agent_id,
                invited_email: email.to_string(),
                status: RelationshipStatus::Invited,
                invited_by: ctx.role,
                created_at: now,
                updated_at: now,
            })
            .await
    }
}
