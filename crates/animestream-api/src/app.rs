//! Application builder: wires stores, services, router and middleware into
//! a running server.

use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tokio::sync::watch;
use tracing::{info, warn};

use animestream_auth::{
    AuthService, CredentialValidator, DeliveryTokenDecoder, DeliveryTokenEncoder, PasswordHasher,
    SessionCleanup, SessionManager,
};
use animestream_core::config::AppConfig;
use animestream_core::error::AppError;
use animestream_core::traits::StorageProvider;
use animestream_database::Stores;
use animestream_service::{CatalogService, DeliveryService, UploadService, UserService};
use animestream_storage::LocalStorageProvider;

use crate::router::build_router;
use crate::state::AppState;

/// How often expired sessions are swept from the store.
pub const SESSION_CLEANUP_INTERVAL: Duration = Duration::from_secs(300);

/// Construct every service over the given stores.
///
/// Creates the upload directory if it does not exist yet.
pub async fn build_state(config: AppConfig, stores: Stores) -> Result<AppState, AppError> {
    let storage: Arc<dyn StorageProvider> =
        Arc::new(LocalStorageProvider::new(&config.storage.upload_dir).await?);

    let hasher = PasswordHasher::new();
    let sessions = SessionManager::new(stores.sessions.clone(), &config.session);
    let auth = AuthService::new(stores.users.clone(), hasher.clone(), sessions);
    let user_service = UserService::new(
        stores.users.clone(),
        hasher,
        CredentialValidator::new(&config.auth),
    );
    let catalog_service = CatalogService::new(stores.catalog.clone(), storage.clone());
    let delivery_service = DeliveryService::new(
        stores.catalog.clone(),
        storage.clone(),
        DeliveryTokenEncoder::new(&config.auth),
        DeliveryTokenDecoder::new(&config.auth),
    );
    let upload_service = UploadService::new(storage, catalog_service.clone());

    Ok(AppState {
        config: Arc::new(config),
        stores,
        auth: Arc::new(auth),
        user_service: Arc::new(user_service),
        catalog_service: Arc::new(catalog_service),
        delivery_service: Arc::new(delivery_service),
        upload_service: Arc::new(upload_service),
    })
}

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    build_router(state)
}

/// Serve until Ctrl-C or SIGTERM, then drain in-flight requests.
///
/// Requests still running after `server.shutdown_grace_seconds` are dropped.
pub async fn run_server(state: AppState) -> Result<(), AppError> {
    let config = state.config.clone();
    let addr = config.server.bind_address();

    let cleanup =
        SessionCleanup::new(state.auth.sessions().clone(), SESSION_CLEANUP_INTERVAL).spawn();

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;
    info!(%addr, "AnimeStream server listening");

    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

    let server = axum::serve(listener, build_app(state))
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            info!("Shutdown signal received, starting graceful shutdown...");
            let _ = shutdown_tx.send(true);
        })
        .into_future();

    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
    let result = tokio::select! {
        result = server => result
            .map_err(|e| AppError::internal(format!("Server error: {e}"))),
        _ = async {
            let _ = shutdown_rx.changed().await;
            tokio::time::sleep(grace).await;
        } => {
            warn!(grace_seconds = grace.as_secs(), "Grace period elapsed, dropping open connections");
            Ok(())
        }
    };

    cleanup.abort();
    result
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
