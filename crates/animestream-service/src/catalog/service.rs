//! Catalog listing, detail views, seeding and episode attachment.

use std::str::FromStr;
use std::sync::Arc;

use tracing::info;

use animestream_core::error::AppError;
use animestream_core::traits::StorageProvider;
use animestream_core::types::AnimeId;
use animestream_database::store::CatalogStore;
use animestream_entity::anime::{Anime, AnimeDetail, AnimeSummary, Episode, NewAnime, NewEpisode};
use animestream_storage::is_safe_relative_path;

/// Title of the entry inserted by `seed_sample`.
pub const SAMPLE_TITLE: &str = "Sample Anime";

/// Parse a path id; anything malformed is reported as not found.
pub(crate) fn parse_id<T: FromStr>(raw: &str, what: &str) -> Result<T, AppError> {
    raw.parse()
        .map_err(|_| AppError::not_found(format!("{what} not found")))
}

/// Read and write access to the anime catalog.
#[derive(Debug, Clone)]
pub struct CatalogService {
    catalog: Arc<dyn CatalogStore>,
    storage: Arc<dyn StorageProvider>,
}

impl CatalogService {
    pub fn new(catalog: Arc<dyn CatalogStore>, storage: Arc<dyn StorageProvider>) -> Self {
        Self { catalog, storage }
    }

    /// All anime as `{id, title}`. Episode data is never included.
    pub async fn list(&self) -> Result<Vec<AnimeSummary>, AppError> {
        self.catalog.list_summaries().await
    }

    /// Public detail of one anime, without file paths.
    pub async fn detail(&self, anime_id: &str) -> Result<AnimeDetail, AppError> {
        Ok(self.find(anime_id).await?.detail())
    }

    /// Full record, episode paths included.
    pub async fn find(&self, anime_id: &str) -> Result<Anime, AppError> {
        let id: AnimeId = parse_id(anime_id, "Anime")?;
        self.catalog
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Anime not found"))
    }

    /// Insert a new anime with its initial episodes.
    ///
    /// Seeded paths are not checked against the upload directory.
    pub async fn create(&self, new_anime: NewAnime) -> Result<Anime, AppError> {
        let title = new_anime.title.trim();
        if title.is_empty() {
            return Err(AppError::validation("Title is required"));
        }
        if new_anime.description.trim().is_empty() {
            return Err(AppError::validation("Description is required"));
        }
        if let Some(bad) = new_anime
            .episodes
            .iter()
            .find(|e| !is_safe_relative_path(&e.video_path))
        {
            return Err(AppError::validation(format!(
                "Invalid video path: {}",
                bad.video_path
            )));
        }

        let anime = self.catalog.create(new_anime.into_anime()).await?;
        info!(anime_id = %anime.id, title = %anime.title, episodes = anime.episodes.len(), "Anime created");
        Ok(anime)
    }

    /// Insert the sample entry unless one with the same title exists.
    ///
    /// Returns the new record, or `None` when it was already present.
    pub async fn seed_sample(&self) -> Result<Option<Anime>, AppError> {
        let existing = self.catalog.list_summaries().await?;
        if existing.iter().any(|a| a.title == SAMPLE_TITLE) {
            info!("Sample anime already present");
            return Ok(None);
        }

        let anime = self
            .create(NewAnime {
                title: SAMPLE_TITLE.to_string(),
                description: "A sample anime for testing purposes.".to_string(),
                episodes: (1..=2)
                    .map(|n| NewEpisode {
                        title: format!("Episode {n}"),
                        video_path: format!("sample_anime_episode_{n}.mp4"),
                    })
                    .collect(),
            })
            .await?;
        Ok(Some(anime))
    }

    /// Append an episode whose file already sits in the upload directory.
    pub async fn attach_episode(
        &self,
        anime_id: &str,
        title: &str,
        video_path: &str,
    ) -> Result<Episode, AppError> {
        let id: AnimeId = parse_id(anime_id, "Anime")?;
        let title = title.trim();
        if title.is_empty() {
            return Err(AppError::validation("Episode title is required"));
        }
        if !is_safe_relative_path(video_path) || !self.storage.exists(video_path).await? {
            return Err(AppError::validation(format!(
                "Video file not found in upload directory: {video_path}"
            )));
        }

        let episode = NewEpisode {
            title: title.to_string(),
            video_path: video_path.to_string(),
        }
        .into_episode();

        self.catalog
            .append_episode(id, episode.clone())
            .await?
            .ok_or_else(|| AppError::not_found("Anime not found"))?;

        info!(anime_id = %id, episode_id = %episode.id, "Episode attached");
        Ok(episode)
    }
}
