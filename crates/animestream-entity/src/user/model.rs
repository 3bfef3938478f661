//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use animestream_core::types::UserId;

/// A registered user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Unique user identifier.
    pub id: UserId,
    /// Unique login name.
    pub username: String,
    /// Argon2 password hash (PHC string).
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// When the user registered.
    pub created_at: DateTime<Utc>,
}

/// Data required to create a new user.
#[derive(Debug, Clone)]
pub struct CreateUser {
    /// Desired username, already validated.
    pub username: String,
    /// Pre-hashed password.
    pub password_hash: String,
}

impl CreateUser {
    /// Materialize the record with a fresh id and timestamp.
    pub fn into_user(self) -> User {
        User {
            id: UserId::new(),
            username: self.username,
            password_hash: self.password_hash,
            created_at: Utc::now(),
        }
    }
}
