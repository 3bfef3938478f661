//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use animestream_core::types::UserId;
use animestream_entity::anime::{AnimeSummary, EpisodeSummary};
use animestream_entity::user::User;
use animestream_service::StoredUpload;

/// A plain `{message}` body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Public view of an account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: UserId,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            created_at: user.created_at,
        }
    }
}

/// The account half of the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardUser {
    pub id: UserId,
    pub username: String,
}

/// Body of `GET /dashboard`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardResponse {
    pub user: DashboardUser,
    pub anime: Vec<AnimeSummary>,
}

/// Body of `POST /upload`.
#[derive(Debug, Clone, Serialize)]
pub struct UploadResponse {
    pub files: Vec<StoredUpload>,
    /// Present when the upload was attached to an anime.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub episode: Option<EpisodeSummary>,
}

/// Body of `GET /api/health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// `memory`, `connected` or `unavailable`.
    pub database: String,
}
