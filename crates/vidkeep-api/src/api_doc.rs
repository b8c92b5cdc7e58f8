//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use vidkeep_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Vidkeep API",
        version = "0.1.0",
        description = "Video hosting API: draft video records with authenticated file upload to object storage. All endpoints are versioned under /api/v0/."
    ),
    paths(
        handlers::video_create::create_video,
        handlers::video_get::get_video,
        handlers::video_get::list_videos,
        handlers::video_upload::upload_video,
        handlers::video_delete::delete_video,
        handlers::health::health_check,
    ),
    components(schemas(
        models::CreateVideoRequest,
        models::VideoResponse,
        error::ErrorResponse,
        handlers::health::HealthResponse,
    )),
    tags(
        (name = "videos", description = "Video record and upload operations"),
        (name = "health", description = "Service health"),
    )
)]
pub struct ApiDoc;
