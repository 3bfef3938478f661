//! Authentication configuration.

use serde::{Deserialize, Serialize};

/// Credential policy and delivery token configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret key for delivery token signing (HMAC-SHA256).
    #[serde(default = "default_token_secret")]
    pub token_secret: String,
    /// Lifetime of the per-request delivery token in minutes.
    #[serde(default = "default_delivery_ttl")]
    pub delivery_token_ttl_minutes: u64,
    /// Minimum password length.
    #[serde(default = "default_password_min")]
    pub password_min_length: usize,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_secret: default_token_secret(),
            delivery_token_ttl_minutes: default_delivery_ttl(),
            password_min_length: default_password_min(),
        }
    }
}

fn default_token_secret() -> String {
    "CHANGE_ME_IN_PRODUCTION".to_string()
}

fn default_delivery_ttl() -> u64 {
    60
}

fn default_password_min() -> usize {
    8
}
