//! Local filesystem storage provider.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use futures::stream::StreamExt;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio_util::io::ReaderStream;
use tracing::{debug, warn};

use animestream_core::error::{AppError, ErrorKind};
use animestream_core::result::AppResult;
use animestream_core::traits::storage::{
    BorrowedByteStream, ByteStream, StorageObjectMeta, StorageProvider,
};

use crate::naming::is_safe_relative_path;

/// Upper bound on `-N` suffixes tried for one upload name.
const MAX_NAME_ATTEMPTS: u32 = 1000;

/// Storage confined to a single root directory.
#[derive(Debug, Clone)]
pub struct LocalStorageProvider {
    root: PathBuf,
}

impl LocalStorageProvider {
    /// Create the provider, creating the root directory if needed.
    pub async fn new(root_path: impl AsRef<Path>) -> AppResult<Self> {
        let root = root_path.as_ref().to_path_buf();
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create upload directory: {}", root.display()),
                e,
            )
        })?;
        Ok(Self { root })
    }

    /// Resolve a relative path inside the root.
    ///
    /// Anything that could escape the root is reported as not found.
    fn resolve(&self, path: &str) -> AppResult<PathBuf> {
        if !is_safe_relative_path(path) {
            return Err(AppError::not_found(format!("File not found: {path}")));
        }
        Ok(self.root.join(path))
    }

    /// Open `{stem}{ext}` or the first free `{stem}-N{ext}` with create-new.
    async fn create_unique(&self, stem: &str, ext: &str) -> AppResult<(String, fs::File)> {
        for attempt in 0..MAX_NAME_ATTEMPTS {
            let name = if attempt == 0 {
                format!("{stem}{ext}")
            } else {
                format!("{stem}-{attempt}{ext}")
            };
            let full_path = self.resolve(&name).map_err(|_| {
                AppError::validation(format!("Invalid upload name: {name}"))
            })?;

            match fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&full_path)
                .await
            {
                Ok(file) => return Ok((name, file)),
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => continue,
                Err(e) => {
                    return Err(AppError::with_source(
                        ErrorKind::Storage,
                        format!("Failed to create file: {name}"),
                        e,
                    ));
                }
            }
        }
        Err(AppError::storage(format!(
            "No free upload name for {stem}{ext}"
        )))
    }

    async fn copy_stream(file: &mut fs::File, mut stream: BorrowedByteStream<'_>) -> AppResult<u64> {
        let mut total_bytes = 0u64;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk
                .map_err(|e| AppError::with_source(ErrorKind::Storage, "Upload stream error", e))?;
            total_bytes += chunk.len() as u64;
            file.write_all(&chunk).await.map_err(|e| {
                AppError::with_source(ErrorKind::Storage, "Failed to write chunk", e)
            })?;
        }
        file.flush()
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Storage, "Failed to flush file", e))?;
        Ok(total_bytes)
    }
}

/// Removes a half-written upload unless the write was committed.
///
/// Covers both a failed stream and a write future that is dropped before it
/// finishes, such as when the client disconnects mid-upload.
struct PartialUpload {
    path: PathBuf,
    committed: bool,
}

impl PartialUpload {
    fn new(path: PathBuf) -> Self {
        Self {
            path,
            committed: false,
        }
    }

    fn commit(mut self) {
        self.committed = true;
    }
}

impl Drop for PartialUpload {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "Removed partial upload"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(path = %self.path.display(), error = %e, "Failed to remove partial upload"),
        }
    }
}

fn not_found_or_storage(path: &str, action: &str, e: std::io::Error) -> AppError {
    if e.kind() == std::io::ErrorKind::NotFound {
        AppError::not_found(format!("File not found: {path}"))
    } else {
        AppError::with_source(ErrorKind::Storage, format!("Failed to {action}: {path}"), e)
    }
}

#[async_trait]
impl StorageProvider for LocalStorageProvider {
    fn provider_type(&self) -> &str {
        "local"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(fs::metadata(&self.root)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false))
    }

    async fn read(&self, path: &str) -> AppResult<(StorageObjectMeta, ByteStream)> {
        let full_path = self.resolve(path)?;
        let file = fs::File::open(&full_path)
            .await
            .map_err(|e| not_found_or_storage(path, "open file", e))?;
        let meta = file
            .metadata()
            .await
            .map_err(|e| not_found_or_storage(path, "stat file", e))?;
        if !meta.is_file() {
            return Err(AppError::not_found(format!("File not found: {path}")));
        }

        let object = StorageObjectMeta {
            path: path.to_string(),
            size_bytes: meta.len(),
            last_modified: meta.modified().ok().map(chrono::DateTime::from),
        };
        let body: ByteStream = Box::pin(ReaderStream::new(file));
        Ok((object, body))
    }

    async fn write_unique(
        &self,
        stem: &str,
        ext: &str,
        stream: BorrowedByteStream<'_>,
    ) -> AppResult<StorageObjectMeta> {
        let (name, mut file) = self.create_unique(stem, ext).await?;
        let partial = PartialUpload::new(self.root.join(&name));

        let size_bytes = Self::copy_stream(&mut file, stream).await?;
        partial.commit();

        debug!(path = %name, bytes = size_bytes, "Stored upload");
        Ok(StorageObjectMeta {
            path: name,
            size_bytes,
            last_modified: Some(chrono::Utc::now()),
        })
    }

    async fn delete(&self, path: &str) -> AppResult<()> {
        let full_path = self.resolve(path)?;
        match fs::remove_file(&full_path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to delete file: {path}"),
                e,
            )),
        }
    }

    async fn exists(&self, path: &str) -> AppResult<bool> {
        let Ok(full_path) = self.resolve(path) else {
            return Ok(false);
        };
        Ok(fs::metadata(&full_path)
            .await
            .map(|m| m.is_file())
            .unwrap_or(false))
    }

    async fn metadata(&self, path: &str) -> AppResult<StorageObjectMeta> {
        let full_path = self.resolve(path)?;
        let meta = fs::metadata(&full_path)
            .await
            .map_err(|e| not_found_or_storage(path, "get metadata", e))?;
        if !meta.is_file() {
            return Err(AppError::not_found(format!("File not found: {path}")));
        }

        Ok(StorageObjectMeta {
            path: path.to_string(),
            size_bytes: meta.len(),
            last_modified: meta.modified().ok().map(chrono::DateTime::from),
        })
    }
}
