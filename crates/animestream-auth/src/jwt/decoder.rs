//! Delivery token validation.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

use animestream_core::config::AuthConfig;
use animestream_core::error::AppError;
use animestream_core::types::{AnimeId, EpisodeId};

use super::claims::DeliveryClaims;

/// Verifies delivery tokens.
#[derive(Clone)]
pub struct DeliveryTokenDecoder {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for DeliveryTokenDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeliveryTokenDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl DeliveryTokenDecoder {
    /// Creates a new decoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 5;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            decoding_key: DecodingKey::from_secret(config.token_secret.as_bytes()),
            validation,
        }
    }

    /// Check signature and expiry, returning the claims.
    pub fn decode(&self, token: &str) -> Result<DeliveryClaims, AppError> {
        let token_data =
            decode::<DeliveryClaims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                        AppError::unauthorized("Token has expired")
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                        AppError::unauthorized("Invalid token signature")
                    }
                    _ => AppError::unauthorized(format!("Token validation failed: {e}")),
                }
            })?;

        Ok(token_data.claims)
    }

    /// Decode and require that the token was minted for this episode.
    pub fn verify(
        &self,
        token: &str,
        anime_id: AnimeId,
        episode_id: EpisodeId,
    ) -> Result<DeliveryClaims, AppError> {
        let claims = self.decode(token)?;
        if !claims.grants(anime_id, episode_id) {
            return Err(AppError::unauthorized("Token was issued for another episode"));
        }
        Ok(claims)
    }
}
