//! Multipart payload extraction and validation.

use axum::extract::Multipart;
use bytes::Bytes;
use vidkeep_core::constants::VIDEO_FIELD_NAME;
use vidkeep_core::AppError;

/// The uploaded file as supplied by the caller: raw bytes plus the declared
/// content type. Lives for one request only.
pub struct VideoPayload {
    pub data: Bytes,
    pub content_type: String,
}

/// Extract the video file from the multipart form.
/// Only one field named "video" is accepted; multiple video fields are rejected.
pub async fn extract_video_payload(mut multipart: Multipart) -> Result<VideoPayload, AppError> {
    let mut payload: Option<VideoPayload> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(format!("Failed to read multipart: {}", e)))?
    {
        let field_name = field.name().map(|s| s.to_string()).unwrap_or_default();

        if field_name == VIDEO_FIELD_NAME {
            if payload.is_some() {
                return Err(AppError::InvalidInput(
                    "Multiple video fields are not allowed; send exactly one field named 'video'"
                        .to_string(),
                ));
            }
            let content_type = field
                .content_type()
                .map(|s: &str| s.to_string())
                .unwrap_or_else(|| "application/octet-stream".to_string());

            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::InvalidInput(format!("Failed to read file data: {}", e)))?;

            payload = Some(VideoPayload { data, content_type });
        }
    }

    payload.ok_or_else(|| AppError::InvalidInput("Video file missing".to_string()))
}

/// Validate file size against the configured ceiling. Runs before any byte is
/// staged.
pub fn validate_file_size(file_size: usize, max_size: usize) -> Result<(), AppError> {
    if file_size > max_size {
        return Err(AppError::InvalidInput(format!(
            "File exceeds the size limit ({} MB)",
            max_size / 1024 / 1024
        )));
    }
    Ok(())
}

/// Normalize MIME type by stripping parameters (e.g. "video/mp4; codecs=avc1" -> "video/mp4").
fn normalize_mime_type(content_type: &str) -> &str {
    content_type
        .split(';')
        .next()
        .map(|s| s.trim())
        .unwrap_or(content_type)
}

/// Validate the declared content type against the allowlist and return the
/// normalized type. Compares the normalized MIME type only (no parameter
/// bypass); anything other than an exact match fails.
pub fn validate_content_type(
    content_type: &str,
    allowed_types: &[String],
) -> Result<String, AppError> {
    let normalized = normalize_mime_type(content_type).to_lowercase();
    if !allowed_types.iter().any(|ct| normalized == ct.to_lowercase()) {
        return Err(AppError::InvalidInput(format!(
            "Invalid file type. Allowed types: {}",
            allowed_types.join(", ")
        )));
    }
    Ok(normalized)
}
