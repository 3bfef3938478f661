//! Authentication facade used by the HTTP layer.

use std::sync::Arc;

use tracing::{info, warn};

use animestream_core::error::AppError;
use animestream_database::store::UserStore;
use animestream_entity::session::Session;
use animestream_entity::user::User;

use crate::password::PasswordHasher;
use crate::session::SessionManager;

/// Credential checks and session handling.
#[derive(Debug, Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    hasher: PasswordHasher,
    sessions: SessionManager,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, hasher: PasswordHasher, sessions: SessionManager) -> Self {
        Self {
            users,
            hasher,
            sessions,
        }
    }

    /// Look the user up and verify the password.
    ///
    /// An unknown user and a wrong password yield the same error.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<User, AppError> {
        let Some(user) = self.users.find_by_username(username).await? else {
            warn!(username, "Login failed: unknown user");
            return Err(AppError::invalid_credentials());
        };

        if !self.hasher.verify_password(password, &user.password_hash)? {
            warn!(user_id = %user.id, "Login failed: wrong password");
            return Err(AppError::invalid_credentials());
        }

        Ok(user)
    }

    /// Authenticate and open a session. Returns the session and its cookie token.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<(User, Session, String), AppError> {
        let user = self.authenticate(username, password).await?;
        let (session, token) = self.sessions.create(&user).await?;
        info!(user_id = %user.id, "Login successful");
        Ok((user, session, token))
    }

    /// Resolve a cookie token to its session.
    pub async fn validate_session(&self, token: &str) -> Result<Session, AppError> {
        self.sessions.validate(token).await
    }

    /// Whether the token belongs to a live session.
    pub async fn is_authenticated(&self, token: Option<&str>) -> bool {
        match token {
            Some(token) => self.validate_session(token).await.is_ok(),
            None => false,
        }
    }

    /// End the session behind a token, if any.
    pub async fn logout(&self, token: &str) -> Result<(), AppError> {
        self.sessions.logout(token).await
    }

    /// The session manager, for background cleanup.
    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use animestream_core::config::SessionConfig;
    use animestream_core::error::ErrorKind;
    use animestream_database::memory::{MemorySessionStore, MemoryUserStore};
    use animestream_entity::user::CreateUser;

    async fn service_with_user(username: &str, password: &str) -> AuthService {
        let users = Arc::new(MemoryUserStore::new());
        let hasher = PasswordHasher::new();
        users
            .create(CreateUser {
                username: username.to_string(),
                password_hash: hasher.hash_password(password).unwrap(),
            })
            .await
            .unwrap();

        let config = SessionConfig::default();
        let sessions = SessionManager::new(Arc::new(MemorySessionStore::new(&config)), &config);
        AuthService::new(users, hasher, sessions)
    }

    #[tokio::test]
    async fn test_authenticate() {
        let service = service_with_user("abc", "password123").await;

        assert!(service.authenticate("abc", "password123").await.is_ok());

        let wrong = service.authenticate("abc", "password124").await.unwrap_err();
        assert_eq!(wrong.kind, ErrorKind::InvalidCredentials);

        let missing = service.authenticate("nobody", "password123").await.unwrap_err();
        assert_eq!(missing.kind, ErrorKind::InvalidCredentials);
        assert_eq!(wrong.message, missing.message);
    }

    #[tokio::test]
    async fn test_login_then_logout() {
        let service = service_with_user("abc", "password123").await;

        let (user, session, token) = service.login("abc", "password123").await.unwrap();
        assert_eq!(session.user_id, user.id);
        assert!(service.is_authenticated(Some(&token)).await);

        service.logout(&token).await.unwrap();
        assert!(!service.is_authenticated(Some(&token)).await);
        assert!(!service.is_authenticated(None).await);
    }
}
