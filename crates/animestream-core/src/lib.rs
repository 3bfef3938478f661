//! # animestream-core
//!
//! Core crate for AnimeStream. Contains the store traits, configuration
//! schemas, typed identifiers, and the unified error system.
//!
//! This crate has **no** internal dependencies on other AnimeStream crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
