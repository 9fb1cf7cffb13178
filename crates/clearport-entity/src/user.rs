//! User entity and role enumeration.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use clearport_core::AppError;

/// Roles available in the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Platform administrator.
    Admin,
    /// Cargo owner requesting clearance.
    Importer,
    /// Customs clearance agent.
    Agent,
}

impl UserRole {
    /// Check if this role is an admin.
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Return the role as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Importer => "importer",
            Self::Agent => "agent",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "importer" => Ok(Self::Importer),
            "agent" => Ok(Self::Agent),
            _ => Err(AppError::validation(format!(
                "Invalid user role: '{s}'. Expected one of: admin, importer, agent"
            ))),
        }
    }
}

/// A registered platform user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Unique user identifier.
    pub id: Uuid,
    /// Login email, unique.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Argon2id password hash. Never serialized in responses.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Role determining which side of a shipment this user acts on.
    pub role: UserRole,
    /// Contact phone number.
    pub phone: Option<String>,
    /// Company name.
    pub company: Option<String>,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// Last profile update.
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse_roundtrip() {
        for role in [UserRole::Admin, UserRole::Importer, UserRole::Agent] {
            let parsed: UserRole = role.as_str().parse().expect("should parse");
            assert_eq!(parsed, role);
        }
    }

    #[test]
    fn test_unknown_role_rejected() {
        assert!("customs-officer".parse::<UserRole>().is_err());
    }
}
