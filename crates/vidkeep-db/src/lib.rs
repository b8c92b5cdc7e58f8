//! Database repositories for the data access layer
//!
//! This crate owns the metadata store: the `VideoStore` trait describes the
//! operations the upload pipeline and handlers need, and `PgVideoRepository`
//! implements them against Postgres. Handlers depend on the trait so tests can
//! substitute an in-memory store.

pub mod videos;

pub use videos::{PgVideoRepository, VideoStore};
