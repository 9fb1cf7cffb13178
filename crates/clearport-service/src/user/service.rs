//! Account registration, login, and profile reads.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use clearport_auth::jwt::codec::JwtCodec;
use clearport_auth::password::PasswordHasher;
use clearport_core::error::{AppError, ErrorKind};
use clearport_core::result::AppResult;
use clearport_database::repositories::relationship::RelationshipRepository;
use clearport_database::repositories::user::UserRepository;
use clearport_entity::user::{User, UserRole};

/// Input for registering an account.
#[derive(Debug, Clone)]
pub struct RegisterUser {
    /// Login email.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Plaintext password, hashed before storage.
    pub password: String,
    /// Account role.
    pub role: UserRole,
    /// Contact phone number.
    pub phone: Option<String>,
    /// Company name.
    pub company: Option<String>,
}

/// A user together with a fresh access token.
#[derive(Debug, Clone, Serialize)]
pub struct AuthenticatedUser {
    /// The account.
    pub user: User,
    /// Signed bearer token.
    pub access_token: String,
    /// Token expiry.
    pub expires_at: DateTime<Utc>,
}

/// Manages accounts and credentials.
#[derive(Debug, Clone)]
pub struct UserService {
    pool: PgPool,
    users: Arc<UserRepository>,
    relationships: Arc<RelationshipRepository>,
    hasher: PasswordHasher,
    jwt: Arc<JwtCodec>,
}

impl UserService {
    /// Creates a new user service.
    pub fn new(
        pool: PgPool,
        users: Arc<UserRepository>,
        relationships: Arc<RelationshipRepository>,
        hasher: PasswordHasher,
        jwt: Arc<JwtCodec>,
    ) -> Self {
        Self {
            pool,
            users,
            relationships,
            hasher,
            jwt,
        }
    }

    /// Registers a new account and binds any pending invitations sent to
    /// its email, in one transaction.
    pub async fn register(&self, input: RegisterUser) -> AppResult<AuthenticatedUser> {
        if input.role == UserRole::Admin {
            return Err(AppError::validation(
                "Admin accounts cannot be self-registered",
            ));
        }
        let email = input.email.trim().to_lowercase();
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AppError::conflict("Email is already registered"));
        }

        let password_hash = self.hasher.hash_password(&input.password)?;
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: email.clone(),
            name: input.name,
            password_hash,
            role: input.role,
            phone: input.phone,
            company: input.company,
            created_at: now,
            updated_at: now,
        };

        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;
        let user = self.users.create_in(&mut tx, &user).await?;
        let bound = self
            .relationships
            .bind_invitations_in(&mut tx, &email, user.id, user.role)
            .await?;
        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit transaction", e)
        })?;

        info!(user_id = %user.id, role = %user.role, bound_invitations = bound, "User registered");

        let (access_token, expires_at) =
            self.jwt
                .generate_access_token(user.id, user.role, &user.email)?;
        Ok(AuthenticatedUser {
            user,
            access_token,
            expires_at,
        })
    }

    /// Verifies credentials and issues an access token.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<AuthenticatedUser> {
        let email = email.trim().to_lowercase();
        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or_else(|| AppError::unauthorized("Invalid email or password"))?;
        if !self.hasher.verify_password(password, &user.password_hash)? {
            return Err(AppError::unauthorized("Invalid email or password"));
        }

        let (access_token, expires_at) =
            self.jwt
                .generate_access_token(user.id, user.role, &user.email)?;

        info!(user_id = %user.id, "User logged in");
        Ok(AuthenticatedUser {
            user,
            access_token,
            expires_at,
        })
    }

    /// Fetches the account behind an authenticated request.
    pub async fn me(&self, user_id: Uuid) -> AppResult<User> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }
}
