//! Resolves an episode, checks the caller and opens its video file.

use std::sync::Arc;

use tracing::{debug, warn};

use animestream_auth::jwt::{DeliveryTokenDecoder, DeliveryTokenEncoder};
use animestream_core::error::{AppError, ErrorKind};
use animestream_core::traits::{ByteStream, StorageObjectMeta, StorageProvider};
use animestream_core::types::{AnimeId, EpisodeId, UserId};
use animestream_database::store::CatalogStore;
use animestream_entity::anime::Episode;
use animestream_storage::is_safe_relative_path;

use crate::catalog::service::parse_id;
use crate::context::Caller;

/// An opened episode ready to be streamed.
pub struct EpisodeDelivery {
    pub episode: Episode,
    pub meta: StorageObjectMeta,
    /// Whole-file body.
    pub body: ByteStream,
    pub content_type: String,
    /// Delivery token for the `x-auth-token` header.
    pub token: String,
}

impl std::fmt::Debug for EpisodeDelivery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EpisodeDelivery")
            .field("episode", &self.episode)
            .field("meta", &self.meta)
            .field("content_type", &self.content_type)
            .finish()
    }
}

/// Gated access to episode files.
#[derive(Debug, Clone)]
pub struct DeliveryService {
    catalog: Arc<dyn CatalogStore>,
    storage: Arc<dyn StorageProvider>,
    encoder: DeliveryTokenEncoder,
    decoder: DeliveryTokenDecoder,
}

impl DeliveryService {
    pub fn new(
        catalog: Arc<dyn CatalogStore>,
        storage: Arc<dyn StorageProvider>,
        encoder: DeliveryTokenEncoder,
        decoder: DeliveryTokenDecoder,
    ) -> Self {
        Self {
            catalog,
            storage,
            encoder,
            decoder,
        }
    }

    /// Deliver one episode to an authorized caller.
    ///
    /// The caller is checked before anything is looked up. Unknown or
    /// malformed ids and missing files are `NotFound`.
    pub async fn get_episode(
        &self,
        anime_id: &str,
        episode_id: &str,
        caller: &Caller,
    ) -> Result<EpisodeDelivery, AppError> {
        let user_id = self.authorize(anime_id, episode_id, caller)?;

        let anime_id: AnimeId = parse_id(anime_id, "Anime")?;
        let episode_id: EpisodeId = parse_id(episode_id, "Episode")?;

        let anime = self
            .catalog
            .find_by_id(anime_id)
            .await?
            .ok_or_else(|| AppError::not_found("Anime not found"))?;
        let episode = anime
            .episode(episode_id)
            .cloned()
            .ok_or_else(|| AppError::not_found("Episode not found"))?;

        if !is_safe_relative_path(&episode.video_path) {
            warn!(%anime_id, %episode_id, path = %episode.video_path, "Episode path escapes upload directory");
            return Err(AppError::not_found("Episode not found"));
        }

        let (meta, body) = match self.storage.read(&episode.video_path).await {
            Ok(opened) => opened,
            Err(e) if e.kind == ErrorKind::NotFound => {
                warn!(%anime_id, %episode_id, path = %episode.video_path, "Episode file missing");
                return Err(AppError::not_found("Video file not found"));
            }
            Err(e) => return Err(e),
        };

        let (token, token_expires_at) = self.encoder.mint(user_id, anime_id, episode_id)?;
        let content_type = mime_guess::from_path(&episode.video_path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();

        debug!(
            %user_id,
            %anime_id,
            %episode_id,
            bytes = meta.size_bytes,
            %token_expires_at,
            "Delivering episode"
        );
        Ok(EpisodeDelivery {
            episode,
            meta,
            body,
            content_type,
            token,
        })
    }

    fn authorize(
        &self,
        anime_id: &str,
        episode_id: &str,
        caller: &Caller,
    ) -> Result<UserId, AppError> {
        match caller {
            Caller::Anonymous => Err(AppError::unauthorized("Unauthorized")),
            Caller::Session(ctx) => Ok(ctx.user_id),
            Caller::DeliveryToken(token) => {
                // A token can only grant a well-formed pair.
                let (Ok(anime_id), Ok(episode_id)) =
                    (anime_id.parse::<AnimeId>(), episode_id.parse::<EpisodeId>())
                else {
                    return Err(AppError::unauthorized("Token was issued for another episode"));
                };
                Ok(self.decoder.verify(token, anime_id, episode_id)?.sub)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use animestream_core::config::AuthConfig;
    use chrono::Utc;
    use animestream_core::types::SessionId;
    use animestream_database::memory::MemoryCatalogStore;
    use animestream_entity::anime::{Anime, NewAnime, NewEpisode};
    use animestream_storage::LocalStorageProvider;
    use futures::StreamExt;

    use crate::context::RequestContext;

    struct Fixture {
        _dir: tempfile::TempDir,
        service: DeliveryService,
        anime: Anime,
    }

    async fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("ep1.mp4"), b"episode one bytes").unwrap();

        let catalog = Arc::new(MemoryCatalogStore::new());
        let anime = catalog
            .create(
                NewAnime {
                    title: "Show".to_string(),
                    description: "A show".to_string(),
                    episodes: vec![
                        NewEpisode {
                            title: "Episode 1".to_string(),
                            video_path: "ep1.mp4".to_string(),
                        },
                        NewEpisode {
                            title: "Episode 2".to_string(),
                            video_path: "missing.mp4".to_string(),
                        },
                    ],
                }
                .into_anime(),
            )
            .await
            .unwrap();

        let storage = LocalStorageProvider::new(dir.path()).await.unwrap();
        let config = AuthConfig::default();
        let service = DeliveryService::new(
            catalog,
            Arc::new(storage),
            DeliveryTokenEncoder::new(&config),
            DeliveryTokenDecoder::new(&config),
        );
        Fixture {
            _dir: dir,
            service,
            anime,
        }
    }

    fn session_caller() -> Caller {
        Caller::Session(RequestContext {
            user_id: UserId::new(),
            session_id: SessionId::new(),
            username: "abc".to_string(),
            request_time: Utc::now(),
        })
    }

    #[tokio::test]
    async fn test_anonymous_caller_always_unauthorized() {
        let f = fixture().await;
        let anime_id = f.anime.id.to_string();
        let episode_id = f.anime.episodes[0].id.to_string();

        for (a, e) in [
            (anime_id.as_str(), episode_id.as_str()),
            ("garbage", "garbage"),
            (anime_id.as_str(), "garbage"),
        ] {
            let err = f
                .service
                .get_episode(a, e, &Caller::Anonymous)
                .await
                .unwrap_err();
            assert_eq!(err.kind, ErrorKind::Unauthorized);
        }
    }

    #[tokio::test]
    async fn test_session_caller_gets_file_and_token() {
        let f = fixture().await;
        let episode = &f.anime.episodes[0];
        let mut delivery = f
            .service
            .get_episode(
                &f.anime.id.to_string(),
                &episode.id.to_string(),
                &session_caller(),
            )
            .await
            .unwrap();

        assert_eq!(delivery.content_type, "video/mp4");
        assert_eq!(delivery.meta.size_bytes, 17);
        let mut bytes = Vec::new();
        while let Some(chunk) = delivery.body.next().await {
            bytes.extend_from_slice(&chunk.unwrap());
        }
        assert_eq!(bytes, b"episode one bytes");

        let token_caller = Caller::DeliveryToken(delivery.token.clone());
        assert!(
            f.service
                .get_episode(
                    &f.anime.id.to_string(),
                    &episode.id.to_string(),
                    &token_caller
                )
                .await
                .is_ok()
        );
        let err = f
            .service
            .get_episode(
                &f.anime.id.to_string(),
                &f.anime.episodes[1].id.to_string(),
                &token_caller,
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unauthorized);
    }

    #[tokio::test]
    async fn test_unknown_episode_not_found() {
        let f = fixture().await;
        let caller = session_caller();
        let anime_id = f.anime.id.to_string();

        for (a, e) in [
            (anime_id.clone(), EpisodeId::new().to_string()),
            (AnimeId::new().to_string(), f.anime.episodes[0].id.to_string()),
            (anime_id.clone(), "garbage".to_string()),
            (anime_id.clone(), f.anime.episodes[1].id.to_string()),
        ] {
            let err = f.service.get_episode(&a, &e, &caller).await.unwrap_err();
            assert_eq!(err.kind, ErrorKind::NotFound, "{a}/{e}");
        }
    }

    #[tokio::test]
    async fn test_bad_token_unauthorized() {
        let f = fixture().await;
        let err = f
            .service
            .get_episode(
                &f.anime.id.to_string(),
                &f.anime.episodes[0].id.to_string(),
                &Caller::DeliveryToken("not-a-token".to_string()),
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unauthorized);
    }
}
