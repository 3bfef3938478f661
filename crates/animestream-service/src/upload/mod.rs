//! Multipart upload storage.

pub mod service;

pub use service::{StoredUpload, UploadService};
