//! Session-gated video delivery.

use axum::body::Body;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderName, StatusCode, header};
use axum::response::Response;

use animestream_core::error::AppError;
use animestream_service::context::Caller;

use crate::dto::request::VideoQuery;
use crate::error::{ApiError, ApiResult};
use crate::extractors::OptionalSession;
use crate::state::AppState;

/// Response header carrying the delivery token.
pub const AUTH_TOKEN_HEADER: HeaderName = HeaderName::from_static("x-auth-token");

/// GET /video/{anime_id}/{episode_id}
///
/// Streams the whole episode file. A valid session cookie wins over a
/// `?token=` query parameter; with neither the request is rejected before
/// any lookup happens. A query string that does not parse counts as no token.
pub async fn stream_episode(
    State(state): State<AppState>,
    Path((anime_id, episode_id)): Path<(String, String)>,
    query: Result<Query<VideoQuery>, QueryRejection>,
    OptionalSession(session): OptionalSession,
) -> ApiResult<Response> {
    let token = query.ok().and_then(|Query(q)| q.token);
    let caller = match (session, token) {
        (Some(ctx), _) => Caller::Session(ctx),
        (None, Some(token)) if !token.is_empty() => Caller::DeliveryToken(token),
        _ => Caller::Anonymous,
    };

    let delivery = state
        .delivery_service
        .get_episode(&anime_id, &episode_id, &caller)
        .await?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, delivery.content_type.as_str())
        .header(header::CONTENT_LENGTH, delivery.meta.size_bytes)
        .header(AUTH_TOKEN_HEADER, delivery.token.as_str())
        .body(Body::from_stream(delivery.body))
        .map_err(|e| ApiError(AppError::internal(format!("Failed to build response: {e}"))))
}
