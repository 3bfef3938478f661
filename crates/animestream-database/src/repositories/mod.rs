//! PostgreSQL repository implementations of the store traits.

pub mod anime;
pub mod session;
pub mod user;

pub use anime::AnimeRepository;
pub use session::SessionRepository;
pub use user::UserRepository;
