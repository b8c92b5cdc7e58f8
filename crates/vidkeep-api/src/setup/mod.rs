//! Application setup and initialization
//!
//! This module contains all application initialization logic extracted from
//! main.rs for better organization and testability.

pub mod database;
pub mod routes;
pub mod server;
pub mod storage;

use crate::services::upload::VideoUploadService;
use crate::state::AppState;
use anyhow::{Context, Result};
use std::sync::Arc;
use vidkeep_core::Config;
use vidkeep_db::{PgVideoRepository, VideoStore};

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Validate configuration first - fail fast on misconfiguration
    config
        .validate()
        .context("Configuration validation failed")?;

    crate::telemetry::init_telemetry();

    tracing::info!("Configuration loaded and validated successfully");

    // Setup database
    let pool = database::setup_database(&config).await?;

    // Setup storage
    let storage = storage::setup_storage(&config).await?;

    // Wire repositories and the upload pipeline
    let store: Arc<dyn VideoStore> = Arc::new(PgVideoRepository::new(pool));
    let uploads = VideoUploadService::new(store.clone(), storage.clone(), &config);

    let state = Arc::new(AppState {
        is_production: config.is_production(),
        store,
        storage,
        uploads,
        config,
    });

    // Setup routes
    let router = routes::setup_routes(&state.config, state.clone())?;

    Ok((state, router))
}
