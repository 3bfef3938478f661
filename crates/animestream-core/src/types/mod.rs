//! Core type definitions used across the AnimeStream workspace.

pub mod id;

pub use id::*;
