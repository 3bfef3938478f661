//! Session cookie extractors.
//!
//! The login session travels in an HTTP-only cookie whose name comes from
//! `session.cookie_name`. [`SessionUser`] rejects requests without a valid
//! session, [`OptionalSession`] lets the handler decide.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::cookie::CookieJar;

use animestream_core::error::AppError;
use animestream_service::context::RequestContext;

use crate::error::ApiError;
use crate::state::AppState;

/// The raw session cookie value, if the request carries one.
#[derive(Debug, Clone)]
pub struct SessionToken(pub Option<String>);

impl SessionToken {
    fn from_parts(parts: &Parts, state: &AppState) -> Self {
        let jar = CookieJar::from_headers(&parts.headers);
        Self(
            jar.get(&state.config.session.cookie_name)
                .map(|c| c.value().to_string())
                .filter(|v| !v.is_empty()),
        )
    }
}

impl FromRequestParts<AppState> for SessionToken {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self::from_parts(parts, state))
    }
}

/// Authenticated user context available in handlers.
#[derive(Debug, Clone)]
pub struct SessionUser(pub RequestContext);

impl std::ops::Deref for SessionUser {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for SessionUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let SessionToken(token) = SessionToken::from_parts(parts, state);
        let token = token.ok_or_else(|| AppError::unauthorized("Not logged in"))?;
        let session = state.auth.validate_session(&token).await?;
        Ok(SessionUser(RequestContext::from_session(&session)))
    }
}

/// A session context when the cookie is present and valid, `None` otherwise.
///
/// Store failures still propagate; only missing or rejected sessions become
/// `None`.
#[derive(Debug, Clone)]
pub struct OptionalSession(pub Option<RequestContext>);

impl FromRequestParts<AppState> for OptionalSession {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let SessionToken(token) = SessionToken::from_parts(parts, state);
        let Some(token) = token else {
            return Ok(Self(None));
        };
        match state.auth.validate_session(&token).await {
            Ok(session) => Ok(Self(Some(RequestContext::from_session(&session)))),
            Err(e) if e.kind.is_internal() => Err(e.into()),
            Err(_) => Ok(Self(None)),
        }
    }
}
