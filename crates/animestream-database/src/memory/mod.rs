//! Process-local store implementations.
//!
//! Used by the `memory` provider and by tests. Nothing survives a restart.

pub mod anime;
pub mod session;
pub mod user;

pub use anime::MemoryCatalogStore;
pub use session::MemorySessionStore;
pub use user::MemoryUserStore;
