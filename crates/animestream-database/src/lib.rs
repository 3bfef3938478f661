//! # animestream-database
//!
//! Store traits for users, the anime catalog and login sessions, with two
//! backends each: PostgreSQL repositories and process-local memory stores.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;
pub mod stores;

pub use connection::DatabasePool;
pub use store::{CatalogStore, SessionStore, UserStore};
pub use stores::Stores;
