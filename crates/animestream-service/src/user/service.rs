//! Registration of new users.

use std::sync::Arc;

use tracing::info;

use animestream_auth::password::{CredentialValidator, PasswordHasher};
use animestream_core::error::AppError;
use animestream_core::types::UserId;
use animestream_database::store::UserStore;
use animestream_entity::user::{CreateUser, User};

/// Creates users after validating their credentials.
#[derive(Debug, Clone)]
pub struct UserService {
    users: Arc<dyn UserStore>,
    hasher: PasswordHasher,
    validator: CredentialValidator,
}

impl UserService {
    pub fn new(
        users: Arc<dyn UserStore>,
        hasher: PasswordHasher,
        validator: CredentialValidator,
    ) -> Self {
        Self {
            users,
            hasher,
            validator,
        }
    }

    /// Register a new user.
    ///
    /// Both inputs are trimmed before validation and storage. Fails with
    /// `Validation` listing every bad field, or `Conflict` if the username
    /// is taken.
    pub async fn register(&self, username: &str, password: &str) -> Result<User, AppError> {
        let username = username.trim();
        let password = password.trim();
        self.validator.validate(username, password)?;

        if self.users.find_by_username(username).await?.is_some() {
            return Err(AppError::conflict("Username already exists"));
        }

        let password_hash = self.hasher.hash_password(password)?;
        // The store enforces uniqueness again for concurrent registrations.
        let user = self
            .users
            .create(CreateUser {
                username: username.to_string(),
                password_hash,
            })
            .await?;

        info!(user_id = %user.id, username = %user.username, "User registered");
        Ok(user)
    }

    /// Look a user up by id.
    pub async fn get(&self, id: UserId) -> Result<User, AppError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use animestream_core::config::AuthConfig;
    use animestream_core::error::ErrorKind;
    use animestream_database::memory::MemoryUserStore;

    fn service() -> UserService {
        UserService::new(
            Arc::new(MemoryUserStore::new()),
            PasswordHasher::new(),
            CredentialValidator::new(&AuthConfig::default()),
        )
    }

    #[tokio::test]
    async fn test_register_twice_conflicts() {
        let service = service();
        let user = service.register("abc", "password123").await.unwrap();
        assert_eq!(user.username, "abc");
        assert_ne!(user.password_hash, "password123");

        let err = service.register("abc", "password123").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn test_inputs_are_trimmed() {
        let service = service();
        let user = service.register("  abc  ", " password123 ").await.unwrap();
        assert_eq!(user.username, "abc");
        assert!(
            PasswordHasher::new()
                .verify_password("password123", &user.password_hash)
                .unwrap()
        );

        let err = service.register("abc", "password123").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn test_short_password_rejected() {
        let err = service().register("abc", "1234567").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(err.field_errors.len(), 1);
        assert_eq!(err.field_errors[0].field, "password");
    }

    #[tokio::test]
    async fn test_validation_runs_before_conflict_check() {
        let service = service();
        service.register("abc", "password123").await.unwrap();
        let err = service.register("abc", "short").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }
}
