//! Vidkeep Storage Library
//!
//! This crate provides the object-storage abstraction and implementations for
//! Vidkeep. It includes the Storage trait and implementations for S3 and the
//! local filesystem.
//!
//! # Storage key format
//!
//! Objects are keyed deterministically by video id: `{video_id}.mp4`. The key
//! is computed purely from the id, so a repeated upload for the same video
//! overwrites the previous object instead of creating a duplicate. Keys must
//! not contain `..` or a leading `/`. Key generation is centralized in the
//! `keys` module so all backends stay consistent.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use keys::video_object_key;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{Storage, StorageError, StorageResult};
pub use vidkeep_core::StorageBackend;
