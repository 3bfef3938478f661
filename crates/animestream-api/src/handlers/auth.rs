//! Account handlers: registration, login, logout and the current user.

use axum::Json;
use axum::extract::{Form, State};
use axum::http::StatusCode;
use axum::response::Redirect;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use tracing::{info, warn};
use validator::Validate;

use crate::dto::request::{LoginForm, RegisterRequest};
use crate::dto::response::{MessageResponse, UserResponse};
use crate::error::ApiResult;
use crate::extractors::{SessionToken, SessionUser};
use crate::state::AppState;

/// Where a successful login lands.
pub const LOGIN_SUCCESS_REDIRECT: &str = "/dashboard";
/// Where a failed login or a logout lands.
pub const HOME_REDIRECT: &str = "/";

/// POST /register
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<MessageResponse>)> {
    let user = state
        .user_service
        .register(&req.username, &req.password)
        .await?;
    info!(user_id = %user.id, "User registered");
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("User registered successfully.")),
    ))
}

/// POST /login
///
/// Redirects instead of returning JSON errors: bad credentials go back to
/// `/`, a successful login sets the session cookie and goes to `/dashboard`.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> ApiResult<(CookieJar, Redirect)> {
    if form.validate().is_err() {
        warn!("Login rejected: missing username or password");
        return Ok((jar, Redirect::to(HOME_REDIRECT)));
    }

    match state.auth.login(form.username.trim(), &form.password).await {
        Ok((_user, _session, token)) => {
            let cookie = Cookie::build((state.config.session.cookie_name.clone(), token))
                .path("/")
                .http_only(true)
                .same_site(SameSite::Lax)
                .secure(state.config.session.secure_cookie);
            Ok((jar.add(cookie), Redirect::to(LOGIN_SUCCESS_REDIRECT)))
        }
        Err(e) if e.kind.is_internal() => Err(e.into()),
        Err(_) => Ok((jar, Redirect::to(HOME_REDIRECT))),
    }
}

/// GET /logout
pub async fn logout(
    State(state): State<AppState>,
    SessionToken(token): SessionToken,
    jar: CookieJar,
) -> ApiResult<(CookieJar, Redirect)> {
    if let Some(token) = token {
        state.auth.logout(&token).await?;
    }
    let removal = Cookie::build((state.config.session.cookie_name.clone(), "")).path("/");
    Ok((jar.remove(removal), Redirect::to(HOME_REDIRECT)))
}

/// GET /api/me
pub async fn me(
    State(state): State<AppState>,
    session: SessionUser,
) -> ApiResult<Json<UserResponse>> {
    let user = state.user_service.get(session.user_id).await?;
    Ok(Json(user.into()))
}
