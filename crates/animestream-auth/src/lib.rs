//! # animestream-auth
//!
//! Authentication for AnimeStream.
//!
//! ## Modules
//!
//! - `password`: Argon2id hashing and registration input rules
//! - `session`: opaque-token login sessions (create, validate, logout, cleanup)
//! - `jwt`: per-request delivery tokens attached to video responses
//! - `service`: the `AuthService` facade used by handlers

pub mod jwt;
pub mod password;
pub mod service;
pub mod session;

pub use jwt::{DeliveryClaims, DeliveryTokenDecoder, DeliveryTokenEncoder};
pub use password::{CredentialValidator, PasswordHasher};
pub use service::AuthService;
pub use session::{SessionCleanup, SessionManager};
