use crate::auth::models::AuthUser;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use std::sync::Arc;
use uuid::Uuid;
use vidkeep_core::AppError;
use vidkeep_storage::{video_object_key, StorageError};

/// Delete a video record and its stored file.
///
/// Owner-only. The stored object may never have been uploaded or may already
/// be gone; both are tolerated.
#[utoipa::path(
    delete,
    path = "/api/v0/videos/{id}",
    tag = "videos",
    params(
        ("id" = Uuid, Path, description = "Video ID")
    ),
    responses(
        (status = 204, description = "Video deleted"),
        (status = 401, description = "Unauthenticated", body = ErrorResponse),
        (status = 403, description = "Caller does not own the video", body = ErrorResponse),
        (status = 404, description = "Video not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(
    skip(state),
    fields(user_id = %user.0, video_id = %id, operation = "delete_video")
)]
pub async fn delete_video(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, HttpAppError> {
    let video = state
        .store
        .get_video(id)
        .await
        .map_err(HttpAppError::from)?
        .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;

    if video.owner_id != user.0 {
        return Err(HttpAppError(AppError::Forbidden(
            "Not authorized to delete this video".to_string(),
        )));
    }

    if video.video_url.is_some() {
        match state.storage.delete(&video_object_key(id)).await {
            Ok(()) | Err(StorageError::NotFound(_)) => {}
            Err(e) => return Err(e.into()),
        }
    }

    state.store.delete_video(id).await?;

    Ok(StatusCode::NO_CONTENT)
}
