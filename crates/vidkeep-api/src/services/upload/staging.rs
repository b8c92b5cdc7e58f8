//! Temporary staging of uploaded video files.

use std::path::{Path, PathBuf};
use tokio::fs;
use uuid::Uuid;
use vidkeep_core::constants::VIDEO_EXTENSION;
use vidkeep_core::AppError;

/// A staged upload: the transient on-disk copy of the payload, named
/// deterministically after the video id.
///
/// The file's lifetime is bound to this guard. The pipeline calls
/// [`StagedVideo::cleanup`] on every exit path; `Drop` is the backstop that
/// removes the file when the request future is cancelled or panics before
/// cleanup runs.
#[must_use = "the staged file is only removed via cleanup() or Drop"]
pub struct StagedVideo {
    path: PathBuf,
    cleaned: bool,
}

impl StagedVideo {
    /// Write `data` to `<dir>/<video_id>.mp4`, overwriting any pre-existing
    /// file of that name.
    ///
    /// The write is atomic from the caller's perspective: bytes land in a
    /// `.part` file first and are renamed into place, so the staged path never
    /// holds a partial write.
    pub async fn stage(dir: &Path, video_id: Uuid, data: &[u8]) -> Result<Self, AppError> {
        fs::create_dir_all(dir).await?;

        let path = dir.join(format!("{}.{}", video_id, VIDEO_EXTENSION));
        let part_path = dir.join(format!("{}.{}.part", video_id, VIDEO_EXTENSION));

        if let Err(e) = write_then_rename(&part_path, &path, data).await {
            // A failed write can leave the .part file behind.
            let _ = fs::remove_file(&part_path).await;
            return Err(e.into());
        }

        tracing::debug!(
            video_id = %video_id,
            path = %path.display(),
            size_bytes = data.len(),
            "Upload staged"
        );

        Ok(Self {
            path,
            cleaned: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove the staged file. Tolerates the file already being absent.
    pub async fn cleanup(mut self) {
        self.cleaned = true;
        match fs::remove_file(&self.path).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    path = %self.path.display(),
                    "Failed to remove staged file"
                );
            }
        }
    }
}

async fn write_then_rename(part: &Path, dest: &Path, data: &[u8]) -> std::io::Result<()> {
    fs::write(part, data).await?;
    fs::rename(part, dest).await
}

impl Drop for StagedVideo {
    fn drop(&mut self) {
        if !self.cleaned {
            // Cancelled or panicked before cleanup; the file may already be gone.
            let _ = std::fs::remove_file(&self.path);
        }
    }
}
