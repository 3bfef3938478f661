//! Custom Axum extractors.

pub mod auth;

pub use auth::{OptionalSession, SessionToken, SessionUser};
