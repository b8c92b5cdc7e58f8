//! Storage setup and initialization

use anyhow::Result;
use std::sync::Arc;
use vidkeep_core::Config;
use vidkeep_storage::{create_storage, Storage};

/// Setup the object-storage backend from configuration.
pub async fn setup_storage(config: &Config) -> Result<Arc<dyn Storage>> {
    tracing::info!("Initializing storage backend...");
    let storage = create_storage(config).await?;
    tracing::info!(
        backend = %storage.backend_type(),
        "Storage backend initialized successfully"
    );
    Ok(storage)
}
