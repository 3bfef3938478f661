//! Shared application state injected into all handlers.

use std::sync::Arc;

use animestream_auth::AuthService;
use animestream_core::config::AppConfig;
use animestream_database::Stores;
use animestream_service::{CatalogService, DeliveryService, UploadService, UserService};

/// Application state shared across all request handlers.
///
/// Every field is behind an `Arc` (or is itself a cheap handle), so cloning
/// the state per request costs a few reference count bumps.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Backing stores, kept for health checks and shutdown.
    pub stores: Stores,
    /// Credential checks and login sessions.
    pub auth: Arc<AuthService>,
    /// Registration and account lookup.
    pub user_service: Arc<UserService>,
    /// Catalog listing and episode attachment.
    pub catalog_service: Arc<CatalogService>,
    /// Gated video delivery.
    pub delivery_service: Arc<DeliveryService>,
    /// Multipart upload storage.
    pub upload_service: Arc<UploadService>,
}
