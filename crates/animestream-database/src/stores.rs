//! Backend selection.

use std::sync::Arc;

use tracing::info;

use animestream_core::config::{AppConfig, DatabaseProvider, SessionStoreKind};
use animestream_core::result::AppResult;

use crate::connection::DatabasePool;
use crate::memory::{MemoryCatalogStore, MemorySessionStore, MemoryUserStore};
use crate::repositories::{AnimeRepository, SessionRepository, UserRepository};
use crate::store::{CatalogStore, SessionStore, UserStore};

/// The store handles the rest of the application runs against.
#[derive(Debug, Clone)]
pub struct Stores {
    pub users: Arc<dyn UserStore>,
    pub catalog: Arc<dyn CatalogStore>,
    pub sessions: Arc<dyn SessionStore>,
    /// Present only with the PostgreSQL provider.
    pub pool: Option<DatabasePool>,
}

impl Stores {
    /// Build the stores named by `database.provider` and `session.store`.
    pub async fn from_config(config: &AppConfig) -> AppResult<Self> {
        match config.database.provider {
            DatabaseProvider::Memory => {
                info!("Using in-memory stores");
                Ok(Self::memory(config))
            }
            DatabaseProvider::Postgres => {
                let pool = DatabasePool::connect(&config.database).await?;
                let pg = pool.pool().clone();
                let sessions: Arc<dyn SessionStore> = match config.session.store {
                    SessionStoreKind::Memory => Arc::new(MemorySessionStore::new(&config.session)),
                    SessionStoreKind::Database => Arc::new(SessionRepository::new(pg.clone())),
                };
                info!(session_store = ?config.session.store, "Using PostgreSQL stores");
                Ok(Self {
                    users: Arc::new(UserRepository::new(pg.clone())),
                    catalog: Arc::new(AnimeRepository::new(pg)),
                    sessions,
                    pool: Some(pool),
                })
            }
        }
    }

    /// Process-local stores, used by the `memory` provider and in tests.
    pub fn memory(config: &AppConfig) -> Self {
        Self {
            users: Arc::new(MemoryUserStore::new()),
            catalog: Arc::new(MemoryCatalogStore::new()),
            sessions: Arc::new(MemorySessionStore::new(&config.session)),
            pool: None,
        }
    }

    /// Database reachability: `None` for the memory provider.
    pub async fn health_check(&self) -> Option<bool> {
        match &self.pool {
            Some(pool) => Some(pool.health_check().await.unwrap_or(false)),
            None => None,
        }
    }

    /// Release the connection pool, if any.
    pub async fn close(&self) {
        if let Some(pool) = &self.pool {
            pool.close().await;
        }
    }
}
