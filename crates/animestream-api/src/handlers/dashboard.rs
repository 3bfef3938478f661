//! Landing page data for a logged-in user.

use axum::Json;
use axum::extract::State;

use crate::dto::response::{DashboardResponse, DashboardUser};
use crate::error::ApiResult;
use crate::extractors::SessionUser;
use crate::state::AppState;

/// GET /dashboard
pub async fn dashboard(
    State(state): State<AppState>,
    session: SessionUser,
) -> ApiResult<Json<DashboardResponse>> {
    let anime = state.catalog_service.list().await?;
    Ok(Json(DashboardResponse {
        user: DashboardUser {
            id: session.user_id,
            username: session.username.clone(),
        },
        anime,
    }))
}
