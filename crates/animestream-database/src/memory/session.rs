//! In-memory session store backed by a `moka` cache.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use moka::future::Cache;
use moka::ops::compute::{CompResult, Op};
use tracing::debug;

use animestream_core::config::SessionConfig;
use animestream_core::result::AppResult;
use animestream_core::types::SessionId;
use animestream_entity::session::Session;

use crate::store::SessionStore;

/// Sessions keyed by token hash.
///
/// The cache evicts on its own after the absolute or idle timeout; the
/// session manager still checks the timestamps on every lookup.
///
/// Every change to an existing key goes through `and_compute_with`, which
/// serializes per key. A refresh racing a logout can then never put the
/// removed session back.
#[derive(Debug, Clone)]
pub struct MemorySessionStore {
    cache: Cache<String, Session>,
}

impl MemorySessionStore {
    /// Create a store sized and timed from configuration.
    pub fn new(config: &SessionConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.max_sessions)
            .time_to_live(Duration::from_secs(config.absolute_timeout_hours * 3600))
            .time_to_idle(Duration::from_secs(config.idle_timeout_minutes * 60))
            .build();
        Self { cache }
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn insert(&self, session: &Session) -> AppResult<()> {
        self.cache
            .insert(session.token_hash.clone(), session.clone())
            .await;
        Ok(())
    }

    async fn find_by_token_hash(&self, token_hash: &str) -> AppResult<Option<Session>> {
        Ok(self.cache.get(token_hash).await)
    }

    async fn touch(&self, id: SessionId, token_hash: &str, at: DateTime<Utc>) -> AppResult<()> {
        self.cache
            .entry_by_ref(token_hash)
            .and_compute_with(|entry| async move {
                match entry.map(|e| e.into_value()) {
                    Some(mut session) if session.id == id => {
                        session.last_activity = at;
                        Op::Put(session)
                    }
                    _ => Op::Nop,
                }
            })
            .await;
        Ok(())
    }

    async fn delete_by_token_hash(&self, token_hash: &str) -> AppResult<bool> {
        let result = self
            .cache
            .entry_by_ref(token_hash)
            .and_compute_with(|entry| async move {
                if entry.is_some() { Op::Remove } else { Op::Nop }
            })
            .await;
        Ok(matches!(result, CompResult::Removed(_)))
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let expired: Vec<String> = self
            .cache
            .iter()
            .filter(|(_, session)| session.is_expired(now))
            .map(|(key, _)| key.as_ref().clone())
            .collect();

        let mut purged = 0u64;
        for key in &expired {
            let result = self
                .cache
                .entry_by_ref(key.as_str())
                .and_compute_with(|entry| async move {
                    match entry {
                        Some(e) if e.value().is_expired(now) => Op::Remove,
                        _ => Op::Nop,
                    }
                })
                .await;
            if matches!(result, CompResult::Removed(_)) {
                purged += 1;
            }
        }
        self.cache.run_pending_tasks().await;

        debug!(count = purged, "Purged expired sessions");
        Ok(purged)
    }
}
