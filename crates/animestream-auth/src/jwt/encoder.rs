//! Delivery token creation.

use chrono::{DateTime, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use uuid::Uuid;

use animestream_core::config::AuthConfig;
use animestream_core::error::AppError;
use animestream_core::types::{AnimeId, EpisodeId, UserId};

use super::claims::DeliveryClaims;

/// Signs delivery tokens with the configured secret.
#[derive(Clone)]
pub struct DeliveryTokenEncoder {
    encoding_key: EncodingKey,
    ttl_minutes: i64,
}

impl std::fmt::Debug for DeliveryTokenEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeliveryTokenEncoder")
            .field("ttl_minutes", &self.ttl_minutes)
            .finish()
    }
}

impl DeliveryTokenEncoder {
    /// Creates a new encoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.token_secret.as_bytes()),
            ttl_minutes: i64::try_from(config.delivery_token_ttl_minutes).unwrap_or(i64::MAX / 60),
        }
    }

    /// Mint a token for one episode delivered to one user.
    pub fn mint(
        &self,
        user_id: UserId,
        anime_id: AnimeId,
        episode_id: EpisodeId,
    ) -> Result<(String, DateTime<Utc>), AppError> {
        let now = Utc::now();
        let exp = now + chrono::Duration::minutes(self.ttl_minutes);

        let claims = DeliveryClaims {
            sub: user_id,
            anime_id,
            episode_id,
            iat: now.timestamp(),
            exp: exp.timestamp(),
            jti: Uuid::new_v4(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to encode delivery token: {e}")))?;

        Ok((token, exp))
    }
}
