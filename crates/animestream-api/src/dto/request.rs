//! Request DTOs with validation.

use serde::Deserialize;
use validator::Validate;

/// Body of `POST /register`.
///
/// Missing fields deserialize as empty strings so they surface as field
/// validation errors instead of a body rejection.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default, alias = "user")]
    pub username: String,
    #[serde(default, alias = "pass")]
    pub password: String,
}

/// Form body of `POST /login`.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginForm {
    #[serde(default)]
    #[validate(length(min = 1, max = 255))]
    pub username: String,
    #[serde(default)]
    #[validate(length(min = 1, max = 1024))]
    pub password: String,
}

/// Query string of `GET /video/{anime_id}/{episode_id}`.
#[derive(Debug, Default, Deserialize)]
pub struct VideoQuery {
    /// Delivery token from an earlier response, used in place of a session.
    pub token: Option<String>,
}
