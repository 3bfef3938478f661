//! Anime catalog repository implementation.
//!
//! Episodes are embedded in the parent row as a JSONB array.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};

use animestream_core::error::{AppError, ErrorKind};
use animestream_core::result::AppResult;
use animestream_core::types::AnimeId;
use animestream_entity::anime::{Anime, AnimeSummary, Episode};

use crate::store::CatalogStore;

/// Row shape of the `anime` table.
#[derive(Debug, FromRow)]
struct AnimeRow {
    id: AnimeId,
    title: String,
    description: String,
    episodes: Json<Vec<Episode>>,
    created_at: DateTime<Utc>,
}

impl From<AnimeRow> for Anime {
    fn from(row: AnimeRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            episodes: row.episodes.0,
            created_at: row.created_at,
        }
    }
}

/// Repository for anime records.
#[derive(Debug, Clone)]
pub struct AnimeRepository {
    pool: PgPool,
}

impl AnimeRepository {
    /// Create a new anime repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogStore for AnimeRepository {
    async fn list_summaries(&self) -> AppResult<Vec<AnimeSummary>> {
        let rows: Vec<(AnimeId, String)> =
            sqlx::query_as("SELECT id, title FROM anime ORDER BY created_at, id")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list anime", e))?;

        Ok(rows
            .into_iter()
            .map(|(id, title)| AnimeSummary { id, title })
            .collect())
    }

    async fn find_by_id(&self, id: AnimeId) -> AppResult<Option<Anime>> {
        sqlx::query_as::<_, AnimeRow>("SELECT * FROM anime WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map(|row| row.map(Anime::from))
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find anime", e))
    }

    async fn create(&self, anime: Anime) -> AppResult<Anime> {
        sqlx::query_as::<_, AnimeRow>(
            "INSERT INTO anime (id, title, description, episodes, created_at) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING *",
        )
        .bind(anime.id)
        .bind(&anime.title)
        .bind(&anime.description)
        .bind(Json(&anime.episodes))
        .bind(anime.created_at)
        .fetch_one(&self.pool)
        .await
        .map(Anime::from)
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create anime", e))
    }

    async fn append_episode(&self, id: AnimeId, episode: Episode) -> AppResult<Option<Anime>> {
        sqlx::query_as::<_, AnimeRow>(
            "UPDATE anime SET episodes = episodes || $2::jsonb WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(Json(vec![episode]))
        .fetch_optional(&self.pool)
        .await
        .map(|row| row.map(Anime::from))
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to append episode", e))
    }
}
