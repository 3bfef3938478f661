//! In-memory catalog store.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use animestream_core::error::AppError;
use animestream_core::result::AppResult;
use animestream_core::types::AnimeId;
use animestream_entity::anime::{Anime, AnimeSummary, Episode};

use crate::store::CatalogStore;

/// Ordered list of anime guarded by a read-write lock.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalogStore {
    anime: Arc<RwLock<Vec<Anime>>>,
}

impl MemoryCatalogStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalogStore {
    async fn list_summaries(&self) -> AppResult<Vec<AnimeSummary>> {
        Ok(self.anime.read().await.iter().map(Anime::summary).collect())
    }

    async fn find_by_id(&self, id: AnimeId) -> AppResult<Option<Anime>> {
        Ok(self.anime.read().await.iter().find(|a| a.id == id).cloned())
    }

    async fn create(&self, anime: Anime) -> AppResult<Anime> {
        let mut guard = self.anime.write().await;
        if guard.iter().any(|a| a.id == anime.id) {
            return Err(AppError::conflict(format!("Anime {} already exists", anime.id)));
        }
        guard.push(anime.clone());
        Ok(anime)
    }

    async fn append_episode(&self, id: AnimeId, episode: Episode) -> AppResult<Option<Anime>> {
        let mut guard = self.anime.write().await;
        Ok(guard.iter_mut().find(|a| a.id == id).map(|anime| {
            anime.episodes.push(episode);
            anime.clone()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use animestream_entity::anime::{NewAnime, NewEpisode};

    fn new_anime(title: &str) -> Anime {
        NewAnime {
            title: title.to_string(),
            description: format!("{title} description"),
            episodes: vec![NewEpisode {
                title: "Episode 1".to_string(),
                video_path: "ep1.mp4".to_string(),
            }],
        }
        .into_anime()
    }

    #[tokio::test]
    async fn test_listing_keeps_insertion_order() {
        let store = MemoryCatalogStore::new();
        store.create(new_anime("First")).await.unwrap();
        store.create(new_anime("Second")).await.unwrap();

        let titles: Vec<_> = store
            .list_summaries()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.title)
            .collect();
        assert_eq!(titles, vec!["First", "Second"]);
    }

    #[tokio::test]
    async fn test_append_episode() {
        let store = MemoryCatalogStore::new();
        let anime = store.create(new_anime("Show")).await.unwrap();

        let episode = NewEpisode {
            title: "Episode 2".to_string(),
            video_path: "ep2.mp4".to_string(),
        }
        .into_episode();
        let updated = store
            .append_episode(anime.id, episode.clone())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.episodes.len(), 2);
        assert_eq!(updated.episodes.last(), Some(&episode));

        assert!(
            store
                .append_episode(AnimeId::new(), episode)
                .await
                .unwrap()
                .is_none()
        );
    }
}
