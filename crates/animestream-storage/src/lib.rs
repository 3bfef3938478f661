//! # animestream-storage
//!
//! The upload directory: a local filesystem provider confined to one root,
//! plus the naming rules for uploaded files.

pub mod naming;
pub mod providers;

pub use naming::{is_safe_relative_path, upload_extension, upload_stem};
pub use providers::LocalStorageProvider;
