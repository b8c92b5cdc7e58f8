use crate::auth::models::AuthUser;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;
use validator::Validate;
use vidkeep_core::models::{CreateVideoRequest, VideoResponse};
use vidkeep_core::AppError;

/// Create a draft video record owned by the caller.
///
/// The record starts without a `video_url`; the URL is set by a later upload.
#[utoipa::path(
    post,
    path = "/api/v0/videos",
    tag = "videos",
    request_body = CreateVideoRequest,
    responses(
        (status = 201, description = "Video record created", body = VideoResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Unauthenticated", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(
    skip(state, request),
    fields(user_id = %user.0, operation = "create_video")
)]
pub async fn create_video(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    ValidatedJson(request): ValidatedJson<CreateVideoRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    request.validate().map_err(AppError::from)?;

    let video = state
        .store
        .create_video(user.0, &request.title, request.description.as_deref())
        .await?;

    Ok((StatusCode::CREATED, Json(VideoResponse::from(video))))
}
