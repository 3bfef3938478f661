//! Core traits defined in `animestream-core` and implemented by other crates.

pub mod storage;

pub use storage::{BorrowedByteStream, ByteStream, StorageObjectMeta, StorageProvider};
