//! Video upload pipeline
//!
//! The pipeline runs four stages in order: authorize (ownership check),
//! validate (presence, size ceiling, content type), stage (atomic write to a
//! temporary file named after the video id), publish (transfer to object
//! storage, set the public URL on the record, persist). The staged file is
//! removed on every exit path.

mod locks;
mod payload;
mod service;
mod staging;

pub use locks::UploadLocks;
pub use payload::{extract_video_payload, validate_content_type, validate_file_size, VideoPayload};
pub use service::VideoUploadService;
pub use staging::StagedVideo;
