//! Request/response logging middleware.

use std::time::Instant;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use tracing::{info, warn};

/// Logs request method, path, status, and duration.
///
/// Server errors are logged at `warn` so they stand out from normal traffic.
/// Query strings are left out since they may carry delivery tokens.
pub async fn request_logging(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    let response = next.run(request).await;

    let duration_ms = start.elapsed().as_millis();
    let status = response.status().as_u16();

    if response.status().is_server_error() {
        warn!(%method, %path, status, duration_ms, "HTTP request failed");
    } else {
        info!(%method, %path, status, duration_ms, "HTTP request");
    }

    response
}
