// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Integration tests for donor profiles and avatar storage.
//!
//! These tests require a Postgres database; set DATABASE_URL to run them.
//! Avatar files land in a per-process temp directory, not the repo tree.

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use serial_test::serial;
use tower::ServiceExt;
use uuid::Uuid;

use rokto::config::Config;
use rokto::db::{DonorStore, ProfileStore};
use rokto::routes::create_router;
use rokto::services::Mailer;
use rokto::AppState;

mod common;

fn temp_static_dir() -> PathBuf {
    std::env::temp_dir().join(format!("rokto-test-static-{}", std::process::id()))
}

/// Like the shared helper, but with avatar storage pointed at a temp dir.
fn create_test_app_with_static_dir(
    pool: sqlx::PgPool,
    static_dir: &std::path::Path,
) -> (axum::Router, Arc<AppState>) {
    let mut config = Config::default();
    config.static_dir = static_dir.to_string_lossy().into_owned();

    let mailer = Mailer::new(&config);
    let state = Arc::new(AppState {
        donors: DonorStore::new(pool.clone()),
        profiles: ProfileStore::new(pool),
        mailer,
        config,
    });
    (create_router(state.clone()), state)
}

fn multipart_body(boundary: &str, field_name: &str, bytes: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"{field_name}\"; filename=\"avatar.png\"\r\n")
            .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: image/png\r\n\r\n");
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
    body
}

async fn upload_avatar(
    app: &axum::Router,
    token: &str,
    field_name: &str,
    bytes: &[u8],
) -> (StatusCode, serde_json::Value) {
    let boundary = "rokto-test-boundary";
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/users/upload_profile_img")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={boundary}"),
                )
                .body(Body::from(multipart_body(boundary, field_name, bytes)))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}

#[tokio::test]
#[serial]
async fn test_new_registration_gets_default_profile() {
    require_database!();
    let pool = common::test_pool().await;
    common::truncate_donors(&pool).await;
    let (app, state) = common::create_test_app_with_pool(pool);

    let donor = common::seed_active_donor(&state, common::next_serial()).await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(format!("/api/v1/users/read_profile/{}", donor.id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .unwrap();
    let profile: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(profile["donor_id"], donor.id.to_string());
    assert_eq!(profile["profile_img"], "profile_img.png");
    assert_eq!(profile["employment_status"], "student");
    assert!(profile["facebook"].is_null());

    // A donor that does not exist has no profile either.
    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(format!("/api/v1/users/read_profile/{}", Uuid::new_v4()))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[serial]
async fn test_update_profile_links_partially() {
    require_database!();
    let pool = common::test_pool().await;
    common::truncate_donors(&pool).await;
    let (app, state) = common::create_test_app_with_pool(pool);

    let donor = common::seed_active_donor(&state, common::next_serial()).await;
    let token = common::create_test_jwt(donor.id, &state.config.secret_key);

    let patch = |body: serde_json::Value| {
        let app = app.clone();
        let token = token.clone();
        async move {
            let response = app
                .oneshot(
                    Request::builder()
                        .method("PATCH")
                        .uri("/api/v1/users/update_profile/me")
                        .header(header::AUTHORIZATION, format!("Bearer {token}"))
                        .header(header::CONTENT_TYPE, "application/json")
                        .body(Body::from(body.to_string()))
                        .unwrap(),
                )
                .await
                .unwrap();
            let status = response.status();
            let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
                .await
                .unwrap();
            let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
            (status, json)
        }
    };

    let (status, profile) = patch(serde_json::json!({
        "facebook": "https://fb.example/hasan",
        "website": "https://hasan.example",
        "employment_status": "employed",
    }))
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["facebook"], "https://fb.example/hasan");
    assert_eq!(profile["website"], "https://hasan.example");
    assert_eq!(profile["employment_status"], "employed");
    assert_eq!(profile["profile_img"], "profile_img.png");

    // A later partial update leaves earlier fields alone.
    let (status, profile) = patch(serde_json::json!({
        "instagram": "https://ig.example/hasan",
    }))
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["instagram"], "https://ig.example/hasan");
    assert_eq!(profile["facebook"], "https://fb.example/hasan");
    assert_eq!(profile["employment_status"], "employed");
}

#[tokio::test]
#[serial]
async fn test_upload_and_serve_avatar() {
    require_database!();
    let pool = common::test_pool().await;
    common::truncate_donors(&pool).await;
    let static_dir = temp_static_dir();
    let (app, state) = create_test_app_with_static_dir(pool, &static_dir);

    let donor = common::seed_active_donor(&state, common::next_serial()).await;
    let token = common::create_test_jwt(donor.id, &state.config.secret_key);

    let image = b"png-bytes-for-the-test";
    let (status, body) = upload_avatar(&app, &token, "file", image).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Profile image upload successful.");

    // The profile now points at the per-donor file name.
    let profile = state.profiles.get_by_donor(donor.id).await.unwrap().unwrap();
    assert_eq!(profile.profile_img, format!("{}.png", donor.id));

    // And the bytes come back through the public endpoint.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(format!("/api/v1/users/get_profile_img/{}", donor.id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "image/png"
    );
    let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .unwrap();
    assert_eq!(&bytes[..], image);

    std::fs::remove_dir_all(&static_dir).ok();
}

#[tokio::test]
#[serial]
async fn test_upload_rejects_bad_fields() {
    require_database!();
    let pool = common::test_pool().await;
    common::truncate_donors(&pool).await;
    let static_dir = temp_static_dir();
    let (app, state) = create_test_app_with_static_dir(pool, &static_dir);

    let donor = common::seed_active_donor(&state, common::next_serial()).await;
    let token = common::create_test_jwt(donor.id, &state.config.secret_key);

    // Wrong field name.
    let (status, body) = upload_avatar(&app, &token, "avatar", b"ignored").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"], "The file field is missing.");

    // Empty payload.
    let (status, body) = upload_avatar(&app, &token, "file", b"").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"], "The uploaded image is empty.");

    std::fs::remove_dir_all(&static_dir).ok();
}

#[tokio::test]
#[serial]
async fn test_missing_avatar_file_is_not_found() {
    require_database!();
    let pool = common::test_pool().await;
    common::truncate_donors(&pool).await;
    let static_dir = temp_static_dir();
    let (app, state) = create_test_app_with_static_dir(pool, &static_dir);

    // Fresh profile references the default image, which was never written
    // to this empty static dir.
    let donor = common::seed_active_donor(&state, common::next_serial()).await;

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(format!("/api/v1/users/get_profile_img/{}", donor.id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
