//! Shared test fixtures: an in-memory metadata store, a local object store in
//! a temp directory, and a TestServer wired through the real router.

// Not every test binary uses every fixture.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum_test::TestServer;
use chrono::Utc;
use tempfile::TempDir;
use tokio::sync::Mutex;
use uuid::Uuid;

use vidkeep_api::services::upload::VideoUploadService;
use vidkeep_api::setup::routes::setup_routes;
use vidkeep_api::state::AppState;
use vidkeep_core::models::Video;
use vidkeep_core::{AppError, Config, StorageBackend};
use vidkeep_db::VideoStore;
use vidkeep_storage::{LocalStorage, Storage, StorageError};

pub const TEST_JWT_SECRET: &str = "vidkeep-test-secret-vidkeep-test-secret";

/// In-memory VideoStore used in place of Postgres.
#[derive(Clone, Default)]
pub struct MemoryVideoStore {
    videos: Arc<Mutex<HashMap<Uuid, Video>>>,
    fail_updates: Arc<AtomicBool>,
}

impl MemoryVideoStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent update fail, simulating a metadata-store outage.
    pub fn fail_updates(&self) {
        self.fail_updates.store(true, Ordering::SeqCst);
    }

    /// Insert a video record directly, bypassing the API.
    pub async fn seed_video(&self, owner_id: Uuid) -> Video {
        let now = Utc::now();
        let video = Video {
            id: Uuid::new_v4(),
            owner_id,
            title: "test video".to_string(),
            description: None,
            video_url: None,
            created_at: now,
            updated_at: now,
        };
        self.videos.lock().await.insert(video.id, video.clone());
        video
    }

    pub async fn get(&self, id: Uuid) -> Option<Video> {
        self.videos.lock().await.get(&id).cloned()
    }
}

#[async_trait]
impl VideoStore for MemoryVideoStore {
    async fn get_video(&self, id: Uuid) -> Result<Option<Video>, AppError> {
        Ok(self.videos.lock().await.get(&id).cloned())
    }

    async fn create_video(
        &self,
        owner_id: Uuid,
        title: &str,
        description: Option<&str>,
    ) -> Result<Video, AppError> {
        let now = Utc::now();
        let video = Video {
            id: Uuid::new_v4(),
            owner_id,
            title: title.to_string(),
            description: description.map(String::from),
            video_url: None,
            created_at: now,
            updated_at: now,
        };
        self.videos.lock().await.insert(video.id, video.clone());
        Ok(video)
    }

    async fn update_video(&self, video: &Video) -> Result<Video, AppError> {
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(AppError::Internal("injected update failure".to_string()));
        }
        let mut videos = self.videos.lock().await;
        if !videos.contains_key(&video.id) {
            return Err(AppError::NotFound(format!("Video {} not found", video.id)));
        }
        let mut updated = video.clone();
        updated.updated_at = Utc::now();
        videos.insert(updated.id, updated.clone());
        Ok(updated)
    }

    async fn list_videos_by_owner(
        &self,
        owner_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Video>, AppError> {
        let videos = self.videos.lock().await;
        let mut owned: Vec<Video> = videos
            .values()
            .filter(|v| v.owner_id == owner_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(owned
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn delete_video(&self, id: Uuid) -> Result<(), AppError> {
        self.videos
            .lock()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("Video {} not found", id)))
    }
}

/// Storage stub whose transfers always fail transiently.
pub struct UnavailableStorage;

#[async_trait]
impl Storage for UnavailableStorage {
    async fn put(&self, _key: &str, _data: Vec<u8>, _content_type: &str) -> Result<String, StorageError> {
        Err(StorageError::Unavailable("injected outage".to_string()))
    }

    async fn delete(&self, _key: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable("injected outage".to_string()))
    }

    async fn exists(&self, _key: &str) -> Result<bool, StorageError> {
        Ok(false)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}

pub struct TestAppOptions {
    pub max_upload_size_bytes: usize,
    pub storage: Option<Arc<dyn Storage>>,
}

impl Default for TestAppOptions {
    fn default() -> Self {
        Self {
            max_upload_size_bytes: 8 * 1024 * 1024,
            storage: None,
        }
    }
}

pub struct TestApp {
    pub server: TestServer,
    pub store: MemoryVideoStore,
    pub storage: Arc<dyn Storage>,
    pub storage_dir: TempDir,
    pub staging_dir: TempDir,
}

impl TestApp {
    /// Issue a bearer token for the given user.
    pub fn token_for(&self, user_id: Uuid) -> String {
        vidkeep_api::auth::jwt::create_token(user_id, TEST_JWT_SECRET, 1).expect("create token")
    }

    /// Number of objects in the local object store.
    pub fn stored_object_count(&self) -> usize {
        std::fs::read_dir(self.storage_dir.path())
            .expect("read storage dir")
            .count()
    }

    /// Whether the staged file for a video id exists.
    pub fn staged_file_exists(&self, video_id: Uuid) -> bool {
        self.staging_dir
            .path()
            .join(format!("{}.mp4", video_id))
            .exists()
    }
}

pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(TestAppOptions::default()).await
}

pub async fn setup_test_app_with(options: TestAppOptions) -> TestApp {
    let storage_dir = TempDir::new().expect("storage temp dir");
    let staging_dir = TempDir::new().expect("staging temp dir");

    let config = Config {
        server_port: 0,
        cors_origins: vec!["*".to_string()],
        environment: "test".to_string(),
        database_url: "postgres://unused".to_string(),
        db_max_connections: 1,
        db_timeout_seconds: 1,
        jwt_secret: TEST_JWT_SECRET.to_string(),
        jwt_expiry_hours: 1,
        storage_backend: Some(StorageBackend::Local),
        s3_bucket: None,
        s3_region: None,
        s3_endpoint: None,
        aws_region: None,
        local_storage_path: Some(storage_dir.path().display().to_string()),
        local_storage_base_url: Some("http://localhost:4000/media".to_string()),
        staging_dir: staging_dir.path().to_path_buf(),
        max_upload_size_bytes: options.max_upload_size_bytes,
        video_allowed_content_types: vec!["video/mp4".to_string()],
    };

    let storage: Arc<dyn Storage> = match options.storage {
        Some(storage) => storage,
        None => Arc::new(
            LocalStorage::new(
                storage_dir.path(),
                "http://localhost:4000/media".to_string(),
            )
            .await
            .expect("local storage"),
        ),
    };

    let store = MemoryVideoStore::new();
    let store_dyn: Arc<dyn VideoStore> = Arc::new(store.clone());
    let uploads = VideoUploadService::new(store_dyn.clone(), storage.clone(), &config);

    let state = Arc::new(AppState {
        is_production: false,
        store: store_dyn,
        storage: storage.clone(),
        uploads,
        config: config.clone(),
    });

    let router = setup_routes(&config, state).expect("routes");
    let server = TestServer::new(router).expect("test server");

    TestApp {
        server,
        store,
        storage,
        storage_dir,
        staging_dir,
    }
}
