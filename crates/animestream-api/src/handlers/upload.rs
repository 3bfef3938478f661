//! Multipart upload handler.

use std::sync::Arc;

use axum::Json;
use axum::extract::multipart::Multipart;
use axum::extract::State;
use axum::http::StatusCode;
use futures::StreamExt;
use tracing::warn;

use animestream_core::error::{AppError, ErrorKind};
use animestream_service::{StoredUpload, UploadService};

use crate::dto::response::UploadResponse;
use crate::error::{ApiResult, multipart_error};
use crate::extractors::SessionUser;
use crate::state::AppState;

const ANIME_ID_FIELD: &str = "anime_id";
const EPISODE_TITLE_FIELD: &str = "episode_title";

/// POST /upload
///
/// Every part with a filename is streamed to the upload directory. When the
/// text fields `anime_id` and `episode_title` are both present, the first
/// stored file becomes a new episode of that anime.
pub async fn upload(
    State(state): State<AppState>,
    session: SessionUser,
    mut multipart: Multipart,
) -> ApiResult<(StatusCode, Json<UploadResponse>)> {
    let mut files = PendingUploads::new(state.upload_service.clone());
    let mut anime_id: Option<String> = None;
    let mut episode_title: Option<String> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                files.discard().await;
                return Err(multipart_error(e).into());
            }
        };

        let name = field.name().unwrap_or("file").to_string();

        if let Some(file_name) = field.file_name().map(str::to_string) {
            let mut body_error = None;
            let stream = field.map(|chunk| {
                chunk.map_err(|e| {
                    body_error = Some(e.status());
                    std::io::Error::other(e.body_text())
                })
            });

            let stored = state
                .upload_service
                .store(&name, Some(&file_name), Box::pin(stream))
                .await;

            match stored {
                Ok(upload) => files.push(upload),
                Err(e) => {
                    files.discard().await;
                    if body_error == Some(StatusCode::PAYLOAD_TOO_LARGE) {
                        return Err(AppError::payload_too_large(
                            "Upload exceeds the maximum allowed size",
                        )
                        .into());
                    }
                    if body_error.is_some() {
                        return Err(AppError::validation(format!(
                            "Upload of field '{name}' was interrupted"
                        ))
                        .into());
                    }
                    return Err(e.into());
                }
            }
            continue;
        }

        let value = match field.text().await {
            Ok(value) => value,
            Err(e) => {
                files.discard().await;
                return Err(multipart_error(e).into());
            }
        };
        match name.as_str() {
            ANIME_ID_FIELD => anime_id = Some(value),
            EPISODE_TITLE_FIELD => episode_title = Some(value),
            _ => {}
        }
    }

    let Some(first) = files.first().cloned() else {
        return Err(AppError::validation("No file uploaded").into());
    };

    let episode = match (anime_id, episode_title) {
        (Some(anime_id), Some(title)) => {
            match state.upload_service.attach(&anime_id, &title, &first).await {
                Ok(episode) => Some(episode.summary()),
                Err(e) => {
                    files.discard().await;
                    return Err(e.into());
                }
            }
        }
        (None, None) => None,
        _ => {
            files.discard().await;
            return Err(AppError::validation(
                "anime_id and episode_title must be sent together",
            )
            .into());
        }
    };

    let files = files.keep();

    tracing::info!(
        user_id = %session.user_id,
        files = files.len(),
        attached = episode.is_some(),
        "Upload completed"
    );

    Ok((StatusCode::CREATED, Json(UploadResponse { files, episode })))
}

/// Files stored so far by one upload request.
///
/// Unless [`keep`](Self::keep) is called, the files are removed: right away
/// through [`discard`](Self::discard) on a handled failure, or from a spawned
/// task when the request future is dropped mid-upload.
struct PendingUploads {
    service: Arc<UploadService>,
    files: Vec<StoredUpload>,
}

impl PendingUploads {
    fn new(service: Arc<UploadService>) -> Self {
        Self {
            service,
            files: Vec::new(),
        }
    }

    fn push(&mut self, upload: StoredUpload) {
        self.files.push(upload);
    }

    fn first(&self) -> Option<&StoredUpload> {
        self.files.first()
    }

    fn keep(mut self) -> Vec<StoredUpload> {
        std::mem::take(&mut self.files)
    }

    async fn discard(&mut self) {
        let files = std::mem::take(&mut self.files);
        discard_files(&self.service, &files).await;
    }
}

impl Drop for PendingUploads {
    fn drop(&mut self) {
        if self.files.is_empty() {
            return;
        }
        let files = std::mem::take(&mut self.files);
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let service = self.service.clone();
                handle.spawn(async move { discard_files(&service, &files).await });
            }
            Err(_) => warn!(count = files.len(), "Abandoned uploads left on disk"),
        }
    }
}

/// Best-effort removal of stored files.
async fn discard_files(service: &UploadService, files: &[StoredUpload]) {
    for file in files {
        if let Err(e) = service.discard(file).await {
            if e.kind != ErrorKind::NotFound {
                warn!(path = %file.path, error = %e, "Failed to discard upload");
            }
        }
    }
}
