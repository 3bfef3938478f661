//! Session repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use animestream_core::error::{AppError, ErrorKind};
use animestream_core::result::AppResult;
use animestream_core::types::SessionId;
use animestream_entity::session::Session;

use crate::store::SessionStore;

/// Repository for login sessions.
#[derive(Debug, Clone)]
pub struct SessionRepository {
    pool: PgPool,
}

impl SessionRepository {
    /// Create a new session repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionStore for SessionRepository {
    async fn insert(&self, session: &Session) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO sessions \
             (id, user_id, username, token_hash, created_at, expires_at, last_activity) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(session.id)
        .bind(session.user_id)
        .bind(&session.username)
        .bind(&session.token_hash)
        .bind(session.created_at)
        .bind(session.expires_at)
        .bind(session.last_activity)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create session", e))?;
        Ok(())
    }

    async fn find_by_token_hash(&self, token_hash: &str) -> AppResult<Option<Session>> {
        sqlx::query_as::<_, Session>("SELECT * FROM sessions WHERE token_hash = $1")
            .bind(token_hash)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find session by token", e)
            })
    }

    async fn touch(&self, id: SessionId, _token_hash: &str, at: DateTime<Utc>) -> AppResult<()> {
        sqlx::query("UPDATE sessions SET last_activity = $2 WHERE id = $1")
            .bind(id)
            .bind(at)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to update session activity", e)
            })?;
        Ok(())
    }

    async fn delete_by_token_hash(&self, token_hash: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM sessions WHERE token_hash = $1")
            .bind(token_hash)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete session", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= $1")
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to purge expired sessions", e)
            })?;
        Ok(result.rows_affected())
    }
}
