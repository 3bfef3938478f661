//! # animestream-entity
//!
//! Domain entity models for AnimeStream. Every struct in this crate
//! represents a stored record or a domain value object. Entities derive
//! `Debug`, `Clone`, `Serialize`, `Deserialize`; those stored as flat rows
//! additionally derive `sqlx::FromRow`.

pub mod anime;
pub mod session;
pub mod user;
