//! Argon2id password hashing and verification.

use argon2::{
    Argon2,
    password_hash::{
        PasswordHash, PasswordHasher as ArgonHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};

use animestream_core::error::AppError;

/// Hashes and verifies passwords with Argon2id and a per-password salt.
#[derive(Debug, Clone, Default)]
pub struct PasswordHasher;

impl PasswordHasher {
    /// Creates a new password hasher instance.
    pub fn new() -> Self {
        Self
    }

    /// Hashes a plaintext password into a PHC string.
    pub fn hash_password(&self, password: &str) -> Result<String, AppError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))?;
        Ok(hash.to_string())
    }

    /// Verifies a plaintext password against a stored hash.
    ///
    /// Returns `Ok(false)` on mismatch; errors only on a corrupt hash.
    pub fn verify_password(&self, password: &str, hash: &str) -> Result<bool, AppError> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| AppError::internal(format!("Invalid password hash format: {e}")))?;

        match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
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

    #[test]
    fn test_hash_and_verify() {
        let hasher = PasswordHasher::new();
        let hash = hasher.hash_password("password123").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify_password("password123", &hash).unwrap());
        assert!(!hasher.verify_password("password124", &hash).unwrap());
    }

    #[test]
    fn test_salts_differ() {
        let hasher = PasswordHasher::new();
        let a = hasher.hash_password("same-password").unwrap();
        let b = hasher.hash_password("same-password").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_corrupt_hash_is_internal_error() {
        let err = PasswordHasher::new()
            .verify_password("x", "not-a-phc-string")
            .unwrap_err();
        assert!(err.kind.is_internal());
    }
}
