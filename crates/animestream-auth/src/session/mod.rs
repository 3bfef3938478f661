//! Opaque-token login sessions.

pub mod cleanup;
pub mod manager;
pub mod token;

pub use cleanup::SessionCleanup;
pub use manager::SessionManager;
pub use token::{generate_session_token, hash_session_token};
