//! Session management configuration.

use serde::{Deserialize, Serialize};

/// Where login sessions are kept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStoreKind {
    /// Process-local moka cache; sessions are lost on restart.
    #[default]
    Memory,
    /// `sessions` table in PostgreSQL.
    Database,
}

/// Session management configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Session backend.
    #[serde(default)]
    pub store: SessionStoreKind,
    /// Name of the cookie carrying the opaque session token.
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    /// Whether to set the `Secure` attribute on the cookie.
    #[serde(default)]
    pub secure_cookie: bool,
    /// Idle timeout in minutes before a session is dropped.
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_minutes: u64,
    /// Absolute session timeout in hours (regardless of activity).
    #[serde(default = "default_absolute_timeout")]
    pub absolute_timeout_hours: u64,
    /// Upper bound on sessions held by the memory store.
    #[serde(default = "default_max_sessions")]
    pub max_sessions: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            store: SessionStoreKind::default(),
            cookie_name: default_cookie_name(),
            secure_cookie: false,
            idle_timeout_minutes: default_idle_timeout(),
            absolute_timeout_hours: default_absolute_timeout(),
            max_sessions: default_max_sessions(),
        }
    }
}

fn default_cookie_name() -> String {
    "animestream.sid".to_string()
}

fn default_idle_timeout() -> u64 {
    60
}

fn default_absolute_timeout() -> u64 {
    24
}

fn default_max_sessions() -> u64 {
    100_000
}
