//! JWT creation and validation with configurable signing and TTL.

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use clearport_core::config::auth::AuthConfig;
use clearport_core::error::AppError;
use clearport_entity::user::UserRole;

use super::claims::Claims;

/// Signs and verifies HS256 access tokens.
#[derive(Clone)]
pub struct JwtCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    access_ttl_minutes: i64,
}

impl std::fmt::Debug for JwtCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtCodec")
            .field("access_ttl_minutes", &self.access_ttl_minutes)
            .finish()
    }
}

impl JwtCodec {
    /// Creates a new codec from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 5; // seconds of clock-skew tolerance

        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
            access_ttl_minutes: config.jwt_access_ttl_minutes as i64,
        }
    }

    /// Generates a signed access token for the given user.
    pub fn generate_access_token(
        &self,
        user_id: Uuid,
        role: UserRole,
        email: &str,
    ) -> Result<(String, chrono::DateTime<Utc>), AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::minutes(self.access_ttl_minutes);

        let claims = Claims {
            sub: user_id,
            role,
            email: email.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to sign token: {e}")))?;

        Ok((token, expires_at))
    }

    /// Decodes and validates an access token string.
    pub fn decode_access_token(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| AppError::unauthorized(format!("Invalid access token: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(secret: &str) -> AuthConfig {
        AuthConfig {
            jwt_secret: secret.into(),
            jwt_access_ttl_minutes: 60,
            argon2_memory_kib: 8,
            argon2_iterations: 1,
            argon2_parallelism: 1,
        }
    }

    fn codec() -> JwtCodec {
        JwtCodec::new(&test_config("test-secret-not-for-production"))
    }

    #[test]
    fn test_token_roundtrip() {
        let codec = codec();
        let user_id = Uuid::new_v4();
        let (token, _) = codec
            .generate_access_token(user_id, UserRole::Agent, "agent@example.com")
            .expect("sign");

        let claims = codec.decode_access_token(&token).expect("decode");
        assert_eq!(claims.user_id(), user_id);
        assert_eq!(claims.role, UserRole::Agent);
        assert_eq!(claims.email, "agent@example.com");
    }

    #[test]
    fn test_tampered_token_rejected() {
        let codec = codec();
        let (token, _) = codec
            .generate_access_token(Uuid::new_v4(), UserRole::Importer, "i@example.com")
            .expect("sign");

        let mut tampered = token.clone();
        tampered.push('x');
        assert!(codec.decode_access_token(&tampered).is_err());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let (token, _) = codec()
            .generate_access_token(Uuid::new_v4(), UserRole::Importer, "i@example.com")
            .expect("sign");

        let other = JwtCodec::new(&test_config("a-different-secret"));
        assert!(other.decode_access_token(&token).is_err());
    }
}
