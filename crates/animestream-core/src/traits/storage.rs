//! Storage provider trait for the upload directory backend.

use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;

use crate::result::AppResult;

/// Metadata about a stored object.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct StorageObjectMeta {
    /// Path relative to the storage root.
    pub path: String,
    /// Size in bytes.
    pub size_bytes: u64,
    /// Last modified timestamp.
    pub last_modified: Option<chrono::DateTime<chrono::Utc>>,
}

/// A byte stream that may borrow from its source, such as a multipart field.
pub type BorrowedByteStream<'a> =
    Pin<Box<dyn Stream<Item = Result<Bytes, std::io::Error>> + Send + 'a>>;

/// An owned byte stream, used for file bodies handed to the HTTP layer.
pub type ByteStream = BorrowedByteStream<'static>;

/// Trait for file storage backends.
///
/// Paths are always relative to the provider root. Implementations must
/// refuse any path that would resolve outside that root.
#[async_trait]
pub trait StorageProvider: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g., "local").
    fn provider_type(&self) -> &str;

    /// Check whether the provider is healthy and reachable.
    async fn health_check(&self) -> AppResult<bool>;

    /// Open a file and return its metadata together with its byte stream.
    async fn read(&self, path: &str) -> AppResult<(StorageObjectMeta, ByteStream)>;

    /// Write a byte stream to a new file named `{stem}{ext}`.
    ///
    /// Never overwrites: if the name is taken, `-1`, `-2`, ... is appended
    /// to the stem until a free name is found. A failed write leaves no
    /// partial file behind. Returns the metadata of the stored file.
    async fn write_unique(
        &self,
        stem: &str,
        ext: &str,
        stream: BorrowedByteStream<'_>,
    ) -> AppResult<StorageObjectMeta>;

    /// Delete a file at the given path. Missing files are not an error.
    async fn delete(&self, path: &str) -> AppResult<()>;

    /// Check whether a regular file exists at the given path.
    async fn exists(&self, path: &str) -> AppResult<bool>;

    /// Get metadata about a file.
    async fn metadata(&self, path: &str) -> AppResult<StorageObjectMeta>;
}
