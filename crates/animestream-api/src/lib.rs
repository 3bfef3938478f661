//! # animestream-api
//!
//! HTTP API layer for AnimeStream built on Axum.
//!
//! Provides the account, catalog, video and upload endpoints, the session
//! cookie extractors, middleware (CORS, request logging) and the `ApiError`
//! wrapper that maps `AppError` onto HTTP responses.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, build_state, run_server};
pub use state::AppState;
