//! HTTP request handlers.

pub mod health;
pub mod video_create;
pub mod video_delete;
pub mod video_get;
pub mod video_upload;
