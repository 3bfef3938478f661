//! Delivery token claims.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use animestream_core::types::{AnimeId, EpisodeId, UserId};

/// Claims carried by a delivery token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryClaims {
    /// Subject: the user the episode was delivered to.
    pub sub: UserId,
    /// Anime the token grants access to.
    pub anime_id: AnimeId,
    /// Episode the token grants access to.
    pub episode_id: EpisodeId,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
    /// Unique token id.
    pub jti: Uuid,
}

impl DeliveryClaims {
    /// Returns the expiration as a `DateTime<Utc>`.
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or_else(Utc::now)
    }

    /// Whether the token was minted for this episode.
    pub fn grants(&self, anime_id: AnimeId, episode_id: EpisodeId) -> bool {
        self.anime_id == anime_id && self.episode_id == episode_id
    }
}
