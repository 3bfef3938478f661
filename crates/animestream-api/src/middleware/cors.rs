//! CORS layer configuration.

use std::time::Duration;

use axum::http::{HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};

use animestream_core::config::CorsConfig;

use crate::handlers::video::AUTH_TOKEN_HEADER;

/// Builds a CORS tower layer from configuration.
///
/// `x-auth-token` is always exposed so browser players can read the delivery
/// token off a video response.
pub fn build_cors_layer(config: &CorsConfig) -> CorsLayer {
    let mut layer = CorsLayer::new();

    if config.allowed_origins.iter().any(|o| o == "*") {
        layer = layer.allow_origin(Any);
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        layer = layer.allow_origin(origins);
    }

    let methods: Vec<Method> = config
        .allowed_methods
        .iter()
        .filter_map(|m| m.parse().ok())
        .collect();

    layer
        .allow_methods(methods)
        .expose_headers([AUTH_TOKEN_HEADER])
        .max_age(Duration::from_secs(config.max_age_seconds))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builds_from_defaults_and_explicit_origins() {
        let _ = build_cors_layer(&CorsConfig::default());

        let config = CorsConfig {
            allowed_origins: vec!["http://localhost:5173".to_string(), "not a url\n".to_string()],
            allowed_methods: vec!["GET".to_string()],
            max_age_seconds: 60,
        };
        let _ = build_cors_layer(&config);
    }
}
