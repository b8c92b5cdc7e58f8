//! Application state shared across handlers.

use std::sync::Arc;

use vidkeep_core::Config;
use vidkeep_db::VideoStore;
use vidkeep_storage::Storage;

use crate::services::upload::VideoUploadService;

/// Main application state: configuration plus the collaborators the handlers
/// need (metadata store, object storage, upload pipeline).
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn VideoStore>,
    pub storage: Arc<dyn Storage>,
    pub uploads: VideoUploadService,
    pub is_production: bool,
}

fn _assert_app_state_send_sync() {
    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}
    assert_send::<AppState>();
    assert_sync::<AppState>();
}
