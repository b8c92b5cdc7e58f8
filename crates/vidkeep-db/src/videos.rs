//! Video metadata repository.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;
use vidkeep_core::models::Video;
use vidkeep_core::AppError;

/// Metadata store operations needed by the API.
///
/// `update_video` persists the mutable fields (title, description, video_url)
/// and returns the stored record with its refreshed `updated_at`.
#[async_trait]
pub trait VideoStore: Send + Sync {
    async fn get_video(&self, id: Uuid) -> Result<Option<Video>, AppError>;

    async fn create_video(
        &self,
        owner_id: Uuid,
        title: &str,
        description: Option<&str>,
    ) -> Result<Video, AppError>;

    async fn update_video(&self, video: &Video) -> Result<Video, AppError>;

    async fn list_videos_by_owner(
        &self,
        owner_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Video>, AppError>;

    async fn delete_video(&self, id: Uuid) -> Result<(), AppError>;
}

/// Postgres-backed video repository.
#[derive(Clone)]
pub struct PgVideoRepository {
    pool: PgPool,
}

impl PgVideoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VideoStore for PgVideoRepository {
    async fn get_video(&self, id: Uuid) -> Result<Option<Video>, AppError> {
        let video: Option<Video> = sqlx::query_as::<Postgres, Video>(
            r#"
            SELECT id, owner_id, title, description, video_url, created_at, updated_at
            FROM videos
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(video)
    }

    async fn create_video(
        &self,
        owner_id: Uuid,
        title: &str,
        description: Option<&str>,
    ) -> Result<Video, AppError> {
        let video: Video = sqlx::query_as::<Postgres, Video>(
            r#"
            INSERT INTO videos (id, owner_id, title, description, video_url, created_at, updated_at)
            VALUES ($1, $2, $3, $4, NULL, now(), now())
            RETURNING id, owner_id, title, description, video_url, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(owner_id)
        .bind(title)
        .bind(description)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(video_id = %video.id, owner_id = %owner_id, "Video record created");

        Ok(video)
    }

    async fn update_video(&self, video: &Video) -> Result<Video, AppError> {
        let updated: Option<Video> = sqlx::query_as::<Postgres, Video>(
            r#"
            UPDATE videos
            SET title = $2, description = $3, video_url = $4, updated_at = now()
            WHERE id = $1
            RETURNING id, owner_id, title, description, video_url, created_at, updated_at
            "#,
        )
        .bind(video.id)
        .bind(&video.title)
        .bind(&video.description)
        .bind(&video.video_url)
        .fetch_optional(&self.pool)
        .await?;

        updated.ok_or_else(|| AppError::NotFound(format!("Video {} not found", video.id)))
    }

    async fn list_videos_by_owner(
        &self,
        owner_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Video>, AppError> {
        let videos: Vec<Video> = sqlx::query_as::<Postgres, Video>(
            r#"
            SELECT id, owner_id, title, description, video_url, created_at, updated_at
            FROM videos
            WHERE owner_id = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(owner_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(videos)
    }

    async fn delete_video(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM videos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Video {} not found", id)));
        }

        tracing::info!(video_id = %id, "Video record deleted");

        Ok(())
    }
}
