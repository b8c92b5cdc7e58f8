use crate::auth::models::AuthUser;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    extract::{Multipart, Path, State},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;
use vidkeep_core::models::VideoResponse;

/// Upload a video file for an existing record.
///
/// Runs the upload pipeline: ownership check, payload validation (presence,
/// size ceiling, content type), staging to a temporary file, transfer to
/// object storage under `{id}.mp4`, and persisting the public URL on the
/// record. The temporary file is removed whatever the outcome.
///
/// Retrying after a failure is safe: the storage key is deterministic, so a
/// repeated upload overwrites rather than duplicates.
#[utoipa::path(
    post,
    path = "/api/v0/videos/{id}/upload",
    tag = "videos",
    params(
        ("id" = Uuid, Path, description = "Video ID")
    ),
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Video uploaded successfully", body = VideoResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Unauthenticated", body = ErrorResponse),
        (status = 403, description = "Caller does not own the video", body = ErrorResponse),
        (status = 404, description = "Video not found", body = ErrorResponse),
        (status = 500, description = "Storage or metadata failure", body = ErrorResponse),
        (status = 503, description = "Storage temporarily unavailable", body = ErrorResponse)
    )
)]
#[tracing::instrument(
    skip(state, multipart),
    fields(
        user_id = %user.0,
        video_id = %id,
        operation = "upload_video"
    )
)]
pub async fn upload_video(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let video = state.uploads.upload(user.0, id, multipart).await?;

    Ok(Json(VideoResponse::from(video)))
}
