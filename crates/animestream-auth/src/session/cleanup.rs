//! Periodic removal of expired sessions.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{error, info};

use super::manager::SessionManager;

/// Background sweep over the session store.
#[derive(Debug, Clone)]
pub struct SessionCleanup {
    manager: SessionManager,
    interval: Duration,
}

impl SessionCleanup {
    pub fn new(manager: SessionManager, interval: Duration) -> Self {
        Self { manager, interval }
    }

    /// Run one sweep. Returns the number of sessions removed.
    pub async fn run_cleanup(&self) -> u64 {
        match self.manager.purge_expired().await {
            Ok(0) => 0,
            Ok(count) => {
                info!(count, "Removed expired sessions");
                count
            }
            Err(e) => {
                error!(error = %e, "Session cleanup failed");
                0
            }
        }
    }

    /// Sweep on a fixed interval until the task is aborted.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            // The first tick completes immediately.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                self.run_cleanup().await;
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use animestream_core::config::SessionConfig;
    use animestream_database::memory::MemorySessionStore;
    use animestream_database::store::SessionStore;
    use animestream_entity::user::CreateUser;

    #[tokio::test]
    async fn test_run_cleanup_removes_expired() {
        let config = SessionConfig::default();
        let store = Arc::new(MemorySessionStore::new(&config));
        let manager = SessionManager::new(store.clone(), &config);
        let user = CreateUser {
            username: "abc".to_string(),
            password_hash: "hash".to_string(),
        }
        .into_user();

        let (session, _) = manager.create(&user).await.unwrap();
        let mut expired = session.clone();
        expired.expires_at = chrono::Utc::now() - chrono::Duration::seconds(1);
        store.insert(&expired).await.unwrap();

        let cleanup = SessionCleanup::new(manager, Duration::from_secs(60));
        assert_eq!(cleanup.run_cleanup().await, 1);
        assert_eq!(cleanup.run_cleanup().await, 0);
    }
}
