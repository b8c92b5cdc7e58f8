//! Upload pipeline integration tests.
//!
//! Run with: `cargo test -p vidkeep-api --test upload_test`

mod helpers;

use std::sync::Arc;

use axum_test::multipart::{MultipartForm, Part};
use helpers::{setup_test_app, setup_test_app_with, TestAppOptions, UnavailableStorage};
use serde_json::Value;
use uuid::Uuid;

fn mp4_form(data: Vec<u8>) -> MultipartForm {
    MultipartForm::new().add_part(
        "video",
        Part::bytes(data).file_name("upload.mp4").mime_type("video/mp4"),
    )
}

#[tokio::test]
async fn upload_publishes_video_and_cleans_up() {
    let app = setup_test_app().await;
    let owner = Uuid::new_v4();
    let video = app.store.seed_video(owner).await;

    let response = app
        .server
        .post(&format!("/api/v0/videos/{}/upload", video.id))
        .add_header("Authorization", format!("Bearer {}", app.token_for(owner)))
        .multipart(mp4_form(vec![0u8; 50 * 1024]))
        .await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    let expected_url = format!("http://localhost:4000/media/{}.mp4", video.id);
    assert_eq!(body["video_url"], expected_url.as_str());

    // Record updated, object stored, staged file gone.
    let stored = app.store.get(video.id).await.expect("record");
    assert_eq!(stored.video_url.as_deref(), Some(expected_url.as_str()));
    assert!(app
        .storage_dir
        .path()
        .join(format!("{}.mp4", video.id))
        .exists());
    assert!(!app.staged_file_exists(video.id));
}

#[tokio::test]
async fn upload_by_non_owner_is_forbidden_and_writes_nothing() {
    let app = setup_test_app().await;
    let owner = Uuid::new_v4();
    let intruder = Uuid::new_v4();
    let video = app.store.seed_video(owner).await;

    let response = app
        .server
        .post(&format!("/api/v0/videos/{}/upload", video.id))
        .add_header(
            "Authorization",
            format!("Bearer {}", app.token_for(intruder)),
        )
        .multipart(mp4_form(vec![0u8; 1024]))
        .await;

    assert_eq!(response.status_code(), 403);
    let body: Value = response.json();
    assert_eq!(body["code"], "FORBIDDEN");

    // No storage write, no metadata write, no temp file.
    assert_eq!(app.store.get(video.id).await.expect("record").video_url, None);
    assert_eq!(app.stored_object_count(), 0);
    assert!(!app.staged_file_exists(video.id));
}

#[tokio::test]
async fn upload_with_wrong_content_type_is_rejected_before_staging() {
    let app = setup_test_app().await;
    let owner = Uuid::new_v4();
    let video = app.store.seed_video(owner).await;

    let form = MultipartForm::new().add_part(
        "video",
        Part::bytes(vec![0u8; 1024])
            .file_name("upload.avi")
            .mime_type("video/avi"),
    );
    let response = app
        .server
        .post(&format!("/api/v0/videos/{}/upload", video.id))
        .add_header("Authorization", format!("Bearer {}", app.token_for(owner)))
        .multipart(form)
        .await;

    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert_eq!(body["code"], "INVALID_INPUT");

    assert_eq!(app.stored_object_count(), 0);
    assert!(!app.staged_file_exists(video.id));
}

#[tokio::test]
async fn upload_one_byte_over_ceiling_stages_nothing() {
    let app = setup_test_app_with(TestAppOptions {
        max_upload_size_bytes: 1024 * 1024,
        ..Default::default()
    })
    .await;
    let owner = Uuid::new_v4();
    let video = app.store.seed_video(owner).await;

    let response = app
        .server
        .post(&format!("/api/v0/videos/{}/upload", video.id))
        .add_header("Authorization", format!("Bearer {}", app.token_for(owner)))
        .multipart(mp4_form(vec![0u8; 1024 * 1024 + 1]))
        .await;

    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert_eq!(body["code"], "INVALID_INPUT");

    assert_eq!(app.stored_object_count(), 0);
    assert!(!app.staged_file_exists(video.id));
}

#[tokio::test]
async fn upload_at_exact_ceiling_succeeds() {
    let app = setup_test_app_with(TestAppOptions {
        max_upload_size_bytes: 1024 * 1024,
        ..Default::default()
    })
    .await;
    let owner = Uuid::new_v4();
    let video = app.store.seed_video(owner).await;

    let response = app
        .server
        .post(&format!("/api/v0/videos/{}/upload", video.id))
        .add_header("Authorization", format!("Bearer {}", app.token_for(owner)))
        .multipart(mp4_form(vec![0u8; 1024 * 1024]))
        .await;

    assert_eq!(response.status_code(), 200);
}

#[tokio::test]
async fn transient_storage_failure_returns_503_and_cleans_up() {
    let app = setup_test_app_with(TestAppOptions {
        storage: Some(Arc::new(UnavailableStorage)),
        ..Default::default()
    })
    .await;
    let owner = Uuid::new_v4();
    let video = app.store.seed_video(owner).await;

    let response = app
        .server
        .post(&format!("/api/v0/videos/{}/upload", video.id))
        .add_header("Authorization", format!("Bearer {}", app.token_for(owner)))
        .multipart(mp4_form(vec![0u8; 1024]))
        .await;

    assert_eq!(response.status_code(), 503);
    let body: Value = response.json();
    assert_eq!(body["code"], "STORAGE_UNAVAILABLE");
    assert_eq!(body["recoverable"], true);

    // Metadata unchanged, staged file removed.
    assert_eq!(app.store.get(video.id).await.expect("record").video_url, None);
    assert!(!app.staged_file_exists(video.id));
}

#[tokio::test]
async fn metadata_failure_after_transfer_is_reported_distinctly() {
    let app = setup_test_app().await;
    let owner = Uuid::new_v4();
    let video = app.store.seed_video(owner).await;
    app.store.fail_updates();

    let response = app
        .server
        .post(&format!("/api/v0/videos/{}/upload", video.id))
        .add_header("Authorization", format!("Bearer {}", app.token_for(owner)))
        .multipart(mp4_form(vec![0u8; 1024]))
        .await;

    assert_eq!(response.status_code(), 500);
    let body: Value = response.json();
    assert_eq!(body["code"], "METADATA_UPDATE_FAILED");
    assert_eq!(body["recoverable"], true);

    // The artifact was stored but the record was not updated; the staged file
    // is still removed.
    assert!(app
        .storage_dir
        .path()
        .join(format!("{}.mp4", video.id))
        .exists());
    assert_eq!(app.store.get(video.id).await.expect("record").video_url, None);
    assert!(!app.staged_file_exists(video.id));
}

#[tokio::test]
async fn repeated_upload_overwrites_the_same_object() {
    let app = setup_test_app().await;
    let owner = Uuid::new_v4();
    let video = app.store.seed_video(owner).await;
    let token = app.token_for(owner);

    for _ in 0..2 {
        let response = app
            .server
            .post(&format!("/api/v0/videos/{}/upload", video.id))
            .add_header("Authorization", format!("Bearer {}", token))
            .multipart(mp4_form(vec![7u8; 2048]))
            .await;
        assert_eq!(response.status_code(), 200);
    }

    // Exactly one object at the deterministic key; URL unchanged.
    assert_eq!(app.stored_object_count(), 1);
    let stored = app.store.get(video.id).await.expect("record");
    assert_eq!(
        stored.video_url,
        Some(format!("http://localhost:4000/media/{}.mp4", video.id))
    );
    assert!(!app.staged_file_exists(video.id));
}

#[tokio::test]
async fn upload_without_video_field_is_rejected() {
    let app = setup_test_app().await;
    let owner = Uuid::new_v4();
    let video = app.store.seed_video(owner).await;

    let form = MultipartForm::new().add_part(
        "file",
        Part::bytes(vec![0u8; 128]).file_name("upload.mp4").mime_type("video/mp4"),
    );
    let response = app
        .server
        .post(&format!("/api/v0/videos/{}/upload", video.id))
        .add_header("Authorization", format!("Bearer {}", app.token_for(owner)))
        .multipart(form)
        .await;

    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert_eq!(body["code"], "INVALID_INPUT");
    assert!(!app.staged_file_exists(video.id));
}

#[tokio::test]
async fn upload_for_missing_record_is_not_found() {
    let app = setup_test_app().await;
    let user = Uuid::new_v4();

    let response = app
        .server
        .post(&format!("/api/v0/videos/{}/upload", Uuid::new_v4()))
        .add_header("Authorization", format!("Bearer {}", app.token_for(user)))
        .multipart(mp4_form(vec![0u8; 128]))
        .await;

    assert_eq!(response.status_code(), 404);
}

#[tokio::test]
async fn upload_requires_authentication() {
    let app = setup_test_app().await;
    let owner = Uuid::new_v4();
    let video = app.store.seed_video(owner).await;

    let response = app
        .server
        .post(&format!("/api/v0/videos/{}/upload", video.id))
        .multipart(mp4_form(vec![0u8; 128]))
        .await;

    assert_eq!(response.status_code(), 401);
    assert_eq!(app.stored_object_count(), 0);
}
