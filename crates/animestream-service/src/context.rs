//! Who is making a request.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use animestream_core::types::{SessionId, UserId};
use animestream_entity::session::Session;

/// Context for a request made under a valid login session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    pub user_id: UserId,
    pub session_id: SessionId,
    pub username: String,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    pub fn from_session(session: &Session) -> Self {
        Self {
            user_id: session.user_id,
            session_id: session.id,
            username: session.username.clone(),
            request_time: Utc::now(),
        }
    }
}

/// The credentials a delivery request arrived with.
#[derive(Debug, Clone)]
pub enum Caller {
    /// No session and no token.
    Anonymous,
    /// A validated login session.
    Session(RequestContext),
    /// An unverified delivery token from the query string.
    DeliveryToken(String),
}
