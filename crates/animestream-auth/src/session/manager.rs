//! Session lifecycle: create, validate, logout.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::{debug, info};

use animestream_core::config::SessionConfig;
use animestream_core::error::AppError;
use animestream_core::types::SessionId;
use animestream_database::store::SessionStore;
use animestream_entity::session::Session;
use animestream_entity::user::User;

use super::token::{generate_session_token, hash_session_token};

/// Creates and checks server-side sessions.
#[derive(Debug, Clone)]
pub struct SessionManager {
    store: Arc<dyn SessionStore>,
    idle_timeout: Duration,
    absolute_timeout: Duration,
}

impl SessionManager {
    pub fn new(store: Arc<dyn SessionStore>, config: &SessionConfig) -> Self {
        Self {
            store,
            idle_timeout: Duration::minutes(config.idle_timeout_minutes as i64),
            absolute_timeout: Duration::hours(config.absolute_timeout_hours as i64),
        }
    }

    /// Open a session for an authenticated user.
    ///
    /// Returns the stored session and the opaque token for the cookie.
    pub async fn create(&self, user: &User) -> Result<(Session, String), AppError> {
        let token = generate_session_token();
        let now = Utc::now();
        let session = Session {
            id: SessionId::new(),
            user_id: user.id,
            username: user.username.clone(),
            token_hash: hash_session_token(&token),
            created_at: now,
            expires_at: now + self.absolute_timeout,
            last_activity: now,
        };

        self.store.insert(&session).await?;
        info!(user_id = %user.id, session_id = %session.id, "Session created");
        Ok((session, token))
    }

    /// Resolve a token to a live session and record the activity.
    ///
    /// Unknown, expired and idle sessions are all `Unauthorized`; the latter
    /// two are deleted on the way out.
    pub async fn validate(&self, token: &str) -> Result<Session, AppError> {
        let token_hash = hash_session_token(token);
        let mut session = self
            .store
            .find_by_token_hash(&token_hash)
            .await?
            .ok_or_else(|| AppError::unauthorized("Not logged in"))?;

        let now = Utc::now();
        if session.is_expired(now) || session.is_idle(now, self.idle_timeout) {
            debug!(session_id = %session.id, "Session timed out");
            self.store.delete_by_token_hash(&token_hash).await?;
            return Err(AppError::unauthorized("Session expired"));
        }

        self.store.touch(session.id, &token_hash, now).await?;
        session.last_activity = now;
        Ok(session)
    }

    /// Delete the session behind a token. Unknown tokens are ignored.
    pub async fn logout(&self, token: &str) -> Result<(), AppError> {
        let removed = self
            .store
            .delete_by_token_hash(&hash_session_token(token))
            .await?;
        if removed {
            info!("Session terminated");
        }
        Ok(())
    }

    /// Remove sessions past their absolute lifetime.
    pub async fn purge_expired(&self) -> Result<u64, AppError> {
        self.store.purge_expired(Utc::now()).await
    }
}
