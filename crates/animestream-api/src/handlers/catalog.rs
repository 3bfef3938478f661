//! Public catalog handlers.

use axum::Json;
use axum::extract::{Path, State};

use animestream_entity::anime::{AnimeDetail, AnimeSummary};

use crate::error::ApiResult;
use crate::state::AppState;

/// GET /api/animeList
///
/// A bare JSON array of `{id, title}`; episode paths never leave the server.
pub async fn list_anime(State(state): State<AppState>) -> ApiResult<Json<Vec<AnimeSummary>>> {
    let list = state.catalog_service.list().await?;
    Ok(Json(list))
}

/// GET /api/anime/{anime_id}
pub async fn get_anime(
    State(state): State<AppState>,
    Path(anime_id): Path<String>,
) -> ApiResult<Json<AnimeDetail>> {
    let detail = state.catalog_service.detail(&anime_id).await?;
    Ok(Json(detail))
}
