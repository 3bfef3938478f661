//! Route definitions for the AnimeStream HTTP API.
//!
//! The account and video routes sit at the root where browsers and players
//! expect them; JSON catalog routes live under `/api`. The router receives
//! `AppState` and passes it to all handlers via Axum's `State` extractor.

use std::time::Duration;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::StatusCode,
    middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::middleware::cors::build_cors_layer;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let max_upload =
        usize::try_from(state.config.storage.max_upload_size_bytes).unwrap_or(usize::MAX);
    let timeout_seconds = state.config.server.request_timeout_seconds;

    let api_routes = Router::new()
        .merge(catalog_routes())
        .merge(account_routes())
        .merge(health_routes());

    let mut router = Router::new()
        .nest("/api", api_routes)
        .merge(session_routes())
        .merge(video_routes());

    if state.config.storage.serve_static {
        router = router.nest_service(
            "/uploads",
            ServeDir::new(&state.config.storage.upload_dir),
        );
    }

    if timeout_seconds > 0 {
        router = router.layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(timeout_seconds),
        ));
    }

    // Uploads are bounded by the body limit, not by wall-clock time.
    router
        .merge(upload_routes(max_upload))
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer(&state.config.server.cors))
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Register, login, logout and the dashboard.
fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        .route("/logout", get(handlers::auth::logout))
        .route("/dashboard", get(handlers::dashboard::dashboard))
}

/// Public catalog.
fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/animeList", get(handlers::catalog::list_anime))
        .route("/anime/{anime_id}", get(handlers::catalog::get_anime))
}

/// The logged-in account.
fn account_routes() -> Router<AppState> {
    Router::new().route("/me", get(handlers::auth::me))
}

/// Episode files behind a session or delivery token.
fn video_routes() -> Router<AppState> {
    Router::new().route(
        "/video/{anime_id}/{episode_id}",
        get(handlers::video::stream_episode),
    )
}

/// Multipart upload, the only route allowed a large body.
fn upload_routes(max_upload: usize) -> Router<AppState> {
    Router::new()
        .route("/upload", post(handlers::upload::upload))
        .layer(DefaultBodyLimit::max(max_upload))
}

/// Liveness.
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
