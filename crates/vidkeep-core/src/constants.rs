//! Shared constants

/// Extension appended to the video id to form staged filenames and object keys.
pub const VIDEO_EXTENSION: &str = "mp4";

/// Multipart form field that carries the video file data.
pub const VIDEO_FIELD_NAME: &str = "video";

/// Default upload size ceiling: 1 GiB.
pub const DEFAULT_MAX_UPLOAD_SIZE_BYTES: usize = 1 << 30;

/// Default allowed content type for video uploads.
pub const DEFAULT_VIDEO_CONTENT_TYPE: &str = "video/mp4";
