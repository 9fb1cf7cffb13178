//! Argon2id password hashing with cost parameters from [`AuthConfig`].

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{
        PasswordHash, PasswordHasher as ArgonHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};

use clearport_core::config::auth::AuthConfig;
use clearport_core::error::AppError;

/// Hashes and verifies passwords with Argon2id.
///
/// The cost parameters come from `auth.argon2_*` in the configuration,
/// so a deployment can raise them without a rebuild. Stored hashes carry
/// their own parameters in the PHC string, which keeps verification
/// working for hashes produced under earlier settings.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    params: Params,
}

impl PasswordHasher {
    /// Builds a hasher with the configured cost parameters.
    pub fn new(config: &AuthConfig) -> Result<Self, AppError> {
        let params = Params::new(
            config.argon2_memory_kib,
            config.argon2_iterations,
            config.argon2_parallelism,
            None,
        )
        .map_err(|e| AppError::configuration(format!("Invalid Argon2 parameters: {e}")))?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hashes a plaintext password with a fresh random salt.
    pub fn hash_password(&self, password: &str) -> Result<String, AppError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))?;
        Ok(hash.to_string())
    }

    /// Verifies a plaintext password against a stored Argon2id hash.
    ///
    /// Returns `Ok(true)` if the password matches, `Ok(false)` if not.
    pub fn verify_password(&self, password: &str, hash: &str) -> Result<bool, AppError> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| AppError::internal(format!("Invalid password hash format: {e}")))?;

        match self.argon2().verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AppError::internal(format!(
                "Password verification failed: {e}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clearport_core::error::ErrorKind;

    // Minimal costs so the test suite stays fast.
    fn test_config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "test-secret".to_string(),
            jwt_access_ttl_minutes: 60,
            argon2_memory_kib: 8,
            argon2_iterations: 1,
            argon2_parallelism: 1,
        }
    }

    #[test]
    fn test_hash_and_verify() {
        let hasher = PasswordHasher::new(&test_config()).expect("hasher");
        let hash = hasher.hash_password("correct horse").expect("hash");
        assert!(hasher.verify_password("correct horse", &hash).expect("verify"));
        assert!(!hasher.verify_password("wrong horse", &hash).expect("verify"));
    }

    #[test]
    fn test_hash_carries_configured_costs() {
        let hasher = PasswordHasher::new(&test_config()).expect("hasher");
        let hash = hasher.hash_password("hunter2").expect("hash");
        assert!(hash.contains("m=8,t=1,p=1"), "unexpected PHC string: {hash}");
    }

    #[test]
    fn test_rejects_invalid_parameters() {
        let mut config = test_config();
        config.argon2_memory_kib = 0;
        let err = PasswordHasher::new(&config).expect_err("zero memory cost");
        assert_eq!(err.kind, ErrorKind::Configuration);
    }

    #[test]
    fn test_verifies_hash_from_other_costs() {
        let strong = PasswordHasher::new(&AuthConfig {
            argon2_memory_kib: 16,
            argon2_iterations: 2,
            ..test_config()
        })
        .expect("hasher");
        let hash = strong.hash_password("hunter2").expect("hash");

        let weak = PasswordHasher::new(&test_config()).expect("hasher");
        assert!(weak.verify_password("hunter2", &hash).expect("verify"));
    }
}
