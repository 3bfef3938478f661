//! Session entity model.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use animestream_core::types::{SessionId, UserId};

/// A server-side login session.
///
/// The client only ever holds the opaque token; the store keys sessions by
/// the SHA-256 hash of that token.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Session {
    /// Unique session identifier.
    pub id: SessionId,
    /// The user this session belongs to.
    pub user_id: UserId,
    /// Username at login time.
    pub username: String,
    /// SHA-256 hash of the opaque session token (hex).
    pub token_hash: String,
    /// When the session was created (login time).
    pub created_at: DateTime<Utc>,
    /// When the session expires (absolute timeout).
    pub expires_at: DateTime<Utc>,
    /// Last activity timestamp.
    pub last_activity: DateTime<Utc>,
}

impl Session {
    /// Whether the absolute lifetime has elapsed.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Whether the session has been unused for longer than `idle_timeout`.
    pub fn is_idle(&self, now: DateTime<Utc>, idle_timeout: Duration) -> bool {
        now - self.last_activity >= idle_timeout
    }
}
