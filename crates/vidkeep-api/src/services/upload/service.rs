//! Upload pipeline orchestration: authorize → validate → stage → publish,
//! with unconditional cleanup of the staged file.

use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::Multipart;
use uuid::Uuid;

use vidkeep_core::models::Video;
use vidkeep_core::{AppError, Config};
use vidkeep_db::VideoStore;
use vidkeep_storage::{video_object_key, Storage};

use crate::error::map_storage_error;

use super::locks::UploadLocks;
use super::payload::{extract_video_payload, validate_content_type, validate_file_size};
use super::staging::StagedVideo;

/// Orchestrates the video upload pipeline.
///
/// Control flow is strictly sequential; any stage's failure aborts the
/// pipeline. The staged file is removed on every exit path, including
/// cancellation (see [`StagedVideo`]).
#[derive(Clone)]
pub struct VideoUploadService {
    store: Arc<dyn VideoStore>,
    storage: Arc<dyn Storage>,
    locks: UploadLocks,
    staging_dir: PathBuf,
    max_upload_size: usize,
    allowed_content_types: Vec<String>,
}

impl VideoUploadService {
    pub fn new(store: Arc<dyn VideoStore>, storage: Arc<dyn Storage>, config: &Config) -> Self {
        Self {
            store,
            storage,
            locks: UploadLocks::new(),
            staging_dir: config.staging_dir.clone(),
            max_upload_size: config.max_upload_size_bytes,
            allowed_content_types: config.video_allowed_content_types.clone(),
        }
    }

    /// Run the full pipeline for one request.
    ///
    /// The caller identity must already be authenticated; this method enforces
    /// ownership, validates and stages the payload, transfers it to object
    /// storage under the deterministic key, and persists the public URL.
    pub async fn upload(
        &self,
        caller: Uuid,
        video_id: Uuid,
        multipart: Multipart,
    ) -> Result<Video, AppError> {
        let video = self.authorize(video_id, caller).await?;

        // Serialize concurrent uploads for the same video id; without this the
        // requests would race on the staged file and the object key.
        let _in_flight = self.locks.acquire(video_id).await;

        let payload = extract_video_payload(multipart).await?;
        validate_file_size(payload.data.len(), self.max_upload_size)?;
        let content_type = validate_content_type(&payload.content_type, &self.allowed_content_types)?;

        let staged = StagedVideo::stage(&self.staging_dir, video_id, &payload.data).await?;

        let result = self.publish(video, &staged, &content_type).await;

        // Runs whether publishing succeeded or failed; Drop covers cancellation.
        staged.cleanup().await;

        result
    }

    /// Look up the record and check the caller owns it. Read-only; a missing
    /// record or ownership mismatch is terminal for this request.
    async fn authorize(&self, video_id: Uuid, caller: Uuid) -> Result<Video, AppError> {
        let video = self
            .store
            .get_video(video_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;

        if video.owner_id != caller {
            return Err(AppError::Forbidden(
                "Not authorized to update this video".to_string(),
            ));
        }

        Ok(video)
    }

    /// Transfer the staged file to object storage, then persist the public URL
    /// on the record.
    ///
    /// A metadata failure after a successful transfer leaves the object stored
    /// with the record unchanged; it is reported as `MetadataUpdateFailed` and
    /// repaired by retrying the whole upload (the deterministic key makes the
    /// retry an overwrite). No compensating delete is attempted.
    async fn publish(
        &self,
        mut video: Video,
        staged: &StagedVideo,
        content_type: &str,
    ) -> Result<Video, AppError> {
        let key = video_object_key(video.id);

        let data = tokio::fs::read(staged.path()).await?;
        let size = data.len();

        let url = self
            .storage
            .put(&key, data, content_type)
            .await
            .map_err(map_storage_error)?;

        video.video_url = Some(url.clone());
        let updated = self.store.update_video(&video).await.map_err(|e| {
            tracing::error!(
                error = %e,
                video_id = %video.id,
                key = %key,
                "Metadata update failed after storage transfer; object remains stored and a retried upload overwrites it"
            );
            AppError::MetadataUpdateFailed(e.to_string())
        })?;

        tracing::info!(
            video_id = %updated.id,
            key = %key,
            size_bytes = size,
            url = %url,
            "Video published"
        );

        Ok(updated)
    }
}
