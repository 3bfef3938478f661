//! Store traits shared by the PostgreSQL and memory backends.
//!
//! Services depend on these traits only, so the backend is chosen once at
//! startup from `database.provider` and `session.store`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use animestream_core::result::AppResult;
use animestream_core::types::{AnimeId, SessionId, UserId};
use animestream_entity::anime::{Anime, AnimeSummary, Episode};
use animestream_entity::session::Session;
use animestream_entity::user::{CreateUser, User};

/// Persistence for registered users.
#[async_trait]
pub trait UserStore: Send + Sync + std::fmt::Debug + 'static {
    /// Exact-match lookup by username.
    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>>;

    /// Lookup by primary key.
    async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>>;

    /// Insert a new user. Fails with `Conflict` if the username is taken.
    async fn create(&self, data: CreateUser) -> AppResult<User>;
}

/// Persistence for the anime catalog.
#[async_trait]
pub trait CatalogStore: Send + Sync + std::fmt::Debug + 'static {
    /// All entries as `{id, title}` in insertion order.
    async fn list_summaries(&self) -> AppResult<Vec<AnimeSummary>>;

    /// Lookup by primary key, episodes included.
    async fn find_by_id(&self, id: AnimeId) -> AppResult<Option<Anime>>;

    /// Insert a fully built anime record.
    async fn create(&self, anime: Anime) -> AppResult<Anime>;

    /// Append an episode at the end of the list.
    ///
    /// Returns `None` when the anime does not exist.
    async fn append_episode(&self, id: AnimeId, episode: Episode) -> AppResult<Option<Anime>>;
}

/// Persistence for server-side login sessions.
#[async_trait]
pub trait SessionStore: Send + Sync + std::fmt::Debug + 'static {
    /// Persist a new session.
    async fn insert(&self, session: &Session) -> AppResult<()>;

    /// Lookup by the SHA-256 hash of the opaque token.
    async fn find_by_token_hash(&self, token_hash: &str) -> AppResult<Option<Session>>;

    /// Record activity on a session.
    async fn touch(&self, id: SessionId, token_hash: &str, at: DateTime<Utc>) -> AppResult<()>;

    /// Delete a session. Returns whether one was removed.
    async fn delete_by_token_hash(&self, token_hash: &str) -> AppResult<bool>;

    /// Remove sessions past their absolute expiry. Returns the number removed.
    async fn purge_expired(&self, now: DateTime<Utc>) -> AppResult<u64>;
}
