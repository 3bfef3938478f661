//! Anime and episode entity models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use animestream_core::types::{AnimeId, EpisodeId};

/// A catalog entry with its embedded, ordered episodes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Anime {
    /// Unique anime identifier.
    pub id: AnimeId,
    /// Display title.
    pub title: String,
    /// Free-text description.
    pub description: String,
    /// Episodes in playback order.
    pub episodes: Vec<Episode>,
    /// When the entry was created.
    pub created_at: DateTime<Utc>,
}

impl Anime {
    /// Look up an embedded episode.
    pub fn episode(&self, id: EpisodeId) -> Option<&Episode> {
        self.episodes.iter().find(|e| e.id == id)
    }

    /// Listing projection without episodes.
    pub fn summary(&self) -> AnimeSummary {
        AnimeSummary {
            id: self.id,
            title: self.title.clone(),
        }
    }

    /// Detail projection that omits file paths.
    pub fn detail(&self) -> AnimeDetail {
        AnimeDetail {
            id: self.id,
            title: self.title.clone(),
            description: self.description.clone(),
            episodes: self.episodes.iter().map(Episode::summary).collect(),
        }
    }
}

/// An episode embedded in its parent anime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Episode {
    /// Identifier, unique within the parent.
    pub id: EpisodeId,
    /// Display title.
    pub title: String,
    /// Path relative to the upload directory.
    pub video_path: String,
}

impl Episode {
    pub fn summary(&self) -> EpisodeSummary {
        EpisodeSummary {
            id: self.id,
            title: self.title.clone(),
        }
    }
}

/// Catalog listing entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimeSummary {
    pub id: AnimeId,
    pub title: String,
}

/// Episode entry as exposed to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeSummary {
    pub id: EpisodeId,
    pub title: String,
}

/// Public detail view of an anime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimeDetail {
    pub id: AnimeId,
    pub title: String,
    pub description: String,
    pub episodes: Vec<EpisodeSummary>,
}

/// Data required to create a new episode.
#[derive(Debug, Clone)]
pub struct NewEpisode {
    pub title: String,
    pub video_path: String,
}

impl NewEpisode {
    /// Assign a fresh id.
    pub fn into_episode(self) -> Episode {
        Episode {
            id: EpisodeId::new(),
            title: self.title,
            video_path: self.video_path,
        }
    }
}

/// Data required to create a new anime.
#[derive(Debug, Clone)]
pub struct NewAnime {
    pub title: String,
    pub description: String,
    pub episodes: Vec<NewEpisode>,
}

impl NewAnime {
    /// Materialize the record with fresh ids and a timestamp.
    pub fn into_anime(self) -> Anime {
        Anime {
            id: AnimeId::new(),
            title: self.title,
            description: self.description,
            episodes: self
                .episodes
                .into_iter()
                .map(NewEpisode::into_episode)
                .collect(),
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Anime {
        NewAnime {
            title: "Sample Anime".to_string(),
            description: "A sample".to_string(),
            episodes: vec![
                NewEpisode {
                    title: "Episode 1".to_string(),
                    video_path: "ep1.mp4".to_string(),
                },
                NewEpisode {
                    title: "Episode 2".to_string(),
                    video_path: "ep2.mp4".to_string(),
                },
            ],
        }
        .into_anime()
    }

    #[test]
    fn test_episode_lookup() {
        let anime = sample();
        let second = anime.episodes[1].id;
        assert_eq!(anime.episode(second).map(|e| e.title.as_str()), Some("Episode 2"));
        assert!(anime.episode(EpisodeId::new()).is_none());
    }

    #[test]
    fn test_projections_hide_video_paths() {
        let anime = sample();
        let summary = serde_json::to_string(&anime.summary()).expect("serialize");
        let detail = serde_json::to_string(&anime.detail()).expect("serialize");
        assert!(!summary.contains("mp4"));
        assert!(!detail.contains("video_path"));
        assert!(detail.contains("Episode 1"));
    }
}
