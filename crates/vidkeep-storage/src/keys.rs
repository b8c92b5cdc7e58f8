//! Deterministic object key derivation.
//!
//! Key format: `{video_id}.mp4`. The key depends only on the video id, which
//! makes whole-pipeline retries idempotent: a repeated transfer under the same
//! key overwrites rather than duplicates.

use uuid::Uuid;
use vidkeep_core::constants::VIDEO_EXTENSION;

/// Derive the storage key for a video's uploaded file.
pub fn video_object_key(video_id: Uuid) -> String {
    format!("{}.{}", video_id, VIDEO_EXTENSION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_is_deterministic() {
        let id = Uuid::new_v4();
        assert_eq!(video_object_key(id), video_object_key(id));
        assert_eq!(video_object_key(id), format!("{}.mp4", id));
    }
}
