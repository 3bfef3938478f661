//! Stores uploaded files under generated names.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::info;

use animestream_core::error::AppError;
use animestream_core::traits::{BorrowedByteStream, StorageProvider};
use animestream_entity::anime::Episode;
use animestream_storage::{upload_extension, upload_stem};

use crate::catalog::CatalogService;

/// A file written to the upload directory.
#[derive(Debug, Clone, Serialize)]
pub struct StoredUpload {
    /// Multipart field the file arrived in.
    pub field: String,
    /// Generated name, relative to the upload directory.
    pub path: String,
    pub size_bytes: u64,
}

/// Writes uploads and optionally links them into the catalog.
#[derive(Debug, Clone)]
pub struct UploadService {
    storage: Arc<dyn StorageProvider>,
    catalog: CatalogService,
}

impl UploadService {
    pub fn new(storage: Arc<dyn StorageProvider>, catalog: CatalogService) -> Self {
        Self { storage, catalog }
    }

    /// Store one file part as `{field}-{unix_millis}{.ext}`.
    ///
    /// Existing files are never overwritten; a numeric suffix is added instead.
    pub async fn store(
        &self,
        field: &str,
        original_filename: Option<&str>,
        stream: BorrowedByteStream<'_>,
    ) -> Result<StoredUpload, AppError> {
        let stem = upload_stem(field, Utc::now());
        let ext = upload_extension(original_filename);
        let meta = self.storage.write_unique(&stem, &ext, stream).await?;

        info!(
            field,
            path = %meta.path,
            bytes = meta.size_bytes,
            "Upload stored"
        );
        Ok(StoredUpload {
            field: field.to_string(),
            path: meta.path,
            size_bytes: meta.size_bytes,
        })
    }

    /// Attach a stored upload to an anime as its newest episode.
    pub async fn attach(
        &self,
        anime_id: &str,
        episode_title: &str,
        upload: &StoredUpload,
    ) -> Result<Episode, AppError> {
        self.catalog
            .attach_episode(anime_id, episode_title, &upload.path)
            .await
    }

    /// Remove a stored upload, used when a later step of the request fails.
    pub async fn discard(&self, upload: &StoredUpload) -> Result<(), AppError> {
        self.storage.delete(&upload.path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use animestream_database::memory::MemoryCatalogStore;
    use animestream_storage::LocalStorageProvider;
    use animestream_core::traits::ByteStream;
    use bytes::Bytes;
    use futures::stream;

    fn body(data: &'static [u8]) -> ByteStream {
        Box::pin(stream::iter(vec![Ok(Bytes::from_static(data))]))
    }

    async fn service(dir: &tempfile::TempDir) -> UploadService {
        let storage: Arc<dyn StorageProvider> =
            Arc::new(LocalStorageProvider::new(dir.path()).await.unwrap());
        let catalog = CatalogService::new(Arc::new(MemoryCatalogStore::new()), storage.clone());
        UploadService::new(storage, catalog)
    }

    fn split_name(path: &str) -> (&str, &str) {
        path.split_once('-').unwrap()
    }

    #[tokio::test]
    async fn test_generated_name() {
        let dir = tempfile::tempdir().unwrap();
        let service = service(&dir).await;

        let before = Utc::now().timestamp_millis();
        let stored = service
            .store("video", Some("My Episode.MP4"), body(b"data"))
            .await
            .unwrap();
        let after = Utc::now().timestamp_millis();

        let (field, rest) = split_name(&stored.path);
        assert_eq!(field, "video");
        let millis: i64 = rest.trim_end_matches(".mp4").parse().unwrap();
        assert!(millis >= before && millis <= after);
        assert!(stored.path.ends_with(".mp4"));
        assert_eq!(stored.size_bytes, 4);
        assert_eq!(
            std::fs::read(dir.path().join(&stored.path)).unwrap(),
            b"data"
        );
    }

    #[tokio::test]
    async fn test_same_millisecond_uploads_do_not_collide() {
        let dir = tempfile::tempdir().unwrap();
        let service = service(&dir).await;

        let mut paths = Vec::new();
        for _ in 0..5 {
            let stored = service
                .store("video", Some("a.mp4"), body(b"x"))
                .await
                .unwrap();
            paths.push(stored.path);
        }
        let mut unique = paths.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), paths.len());
    }

    #[tokio::test]
    async fn test_attach_and_discard() {
        let dir = tempfile::tempdir().unwrap();
        let service = service(&dir).await;
        let anime = service.catalog.seed_sample().await.unwrap().unwrap();

        let stored = service
            .store("video", Some("ep3.mkv"), body(b"ep3"))
            .await
            .unwrap();
        let episode = service
            .attach(&anime.id.to_string(), "Episode 3", &stored)
            .await
            .unwrap();
        assert_eq!(episode.video_path, stored.path);

        service.discard(&stored).await.unwrap();
        assert!(!dir.path().join(&stored.path).exists());
    }
}
