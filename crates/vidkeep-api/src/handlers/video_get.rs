use crate::auth::models::AuthUser;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;
use vidkeep_core::models::VideoResponse;
use vidkeep_core::AppError;

#[derive(Deserialize, ToSchema, utoipa::IntoParams)]
pub struct ListQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    50
}

#[utoipa::path(
    get,
    path = "/api/v0/videos/{id}",
    tag = "videos",
    params(
        ("id" = Uuid, Path, description = "Video ID")
    ),
    responses(
        (status = 200, description = "Video found", body = VideoResponse),
        (status = 404, description = "Video not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(video_id = %id, operation = "get_video"))]
pub async fn get_video(
    Path(id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let video = state
        .store
        .get_video(id)
        .await
        .map_err(HttpAppError::from)?
        .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;

    Ok(Json(VideoResponse::from(video)))
}

#[utoipa::path(
    get,
    path = "/api/v0/videos",
    tag = "videos",
    params(
        ListQuery
    ),
    responses(
        (status = 200, description = "The caller's videos", body = Vec<VideoResponse>),
        (status = 401, description = "Unauthenticated", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(
    skip(state, params),
    fields(
        user_id = %user.0,
        limit = params.limit,
        offset = params.offset,
        operation = "list_videos"
    )
)]
pub async fn list_videos(
    user: AuthUser,
    Query(params): Query<ListQuery>,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let limit = params.limit.clamp(1, 100);
    let offset = params.offset.max(0);

    let videos = state
        .store
        .list_videos_by_owner(user.0, limit, offset)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to list videos");
            HttpAppError::from(e)
        })?;

    let responses: Vec<VideoResponse> = videos.into_iter().map(VideoResponse::from).collect();

    Ok(Json(responses))
}
