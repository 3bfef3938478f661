//! In-memory user store backed by `dashmap`.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use animestream_core::error::AppError;
use animestream_core::result::AppResult;
use animestream_core::types::UserId;
use animestream_entity::user::{CreateUser, User};

use crate::store::UserStore;

/// Users keyed by exact username.
#[derive(Debug, Clone, Default)]
pub struct MemoryUserStore {
    users: Arc<DashMap<String, User>>,
}

impl MemoryUserStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        Ok(self.users.get(username).map(|u| u.value().clone()))
    }

    async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>> {
        Ok(self
            .users
            .iter()
            .find(|entry| entry.value().id == id)
            .map(|entry| entry.value().clone()))
    }

    async fn create(&self, data: CreateUser) -> AppResult<User> {
        match self.users.entry(data.username.clone()) {
            Entry::Occupied(_) => Err(AppError::conflict(format!(
                "Username '{}' already exists",
                data.username
            ))),
            Entry::Vacant(slot) => {
                let user = data.into_user();
                slot.insert(user.clone());
                Ok(user)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use animestream_core::error::ErrorKind;

    fn new_user(name: &str) -> CreateUser {
        CreateUser {
            username: name.to_string(),
            password_hash: "hash".to_string(),
        }
    }

    #[tokio::test]
    async fn test_duplicate_username_conflicts() {
        let store = MemoryUserStore::new();
        let created = store.create(new_user("abc")).await.unwrap();

        let err = store.create(new_user("abc")).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);

        let found = store.find_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(found.username, "abc");
    }

    #[tokio::test]
    async fn test_username_match_is_exact() {
        let store = MemoryUserStore::new();
        store.create(new_user("abc")).await.unwrap();

        assert!(store.find_by_username("ABC").await.unwrap().is_none());
        assert!(store.create(new_user("ABC")).await.is_ok());
    }

    #[tokio::test]
    async fn test_concurrent_registration_admits_one() {
        let store = MemoryUserStore::new();
        let handles: Vec<_> = (0..16)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move { store.create(new_user("racer")).await })
            })
            .collect();

        let mut ok = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                ok += 1;
            }
        }
        assert_eq!(ok, 1);
    }
}
