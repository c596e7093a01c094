// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Integration tests for donation availability cycling.
//!
//! These tests require a Postgres database; set DATABASE_URL to run them.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use serial_test::serial;
use tower::ServiceExt;

use rokto::services::AvailabilityService;

mod common;

/// Force a donor unavailable with a donation stamped `days` ago.
async fn backdate_donation(pool: &sqlx::PgPool, donor_id: uuid::Uuid, days: i32) {
    sqlx::query(
        "UPDATE donors SET is_available = FALSE, \
         donated_on = now() - make_interval(days => $1) WHERE id = $2",
    )
    .bind(days)
    .bind(donor_id)
    .execute(pool)
    .await
    .unwrap();
}

#[tokio::test]
#[serial]
async fn test_sweep_releases_donors_past_cooldown() {
    require_database!();
    let pool = common::test_pool().await;
    common::truncate_donors(&pool).await;
    let (_app, state) = common::create_test_app_with_pool(pool.clone());

    let rested = common::seed_active_donor(&state, common::next_serial()).await;
    let recent = common::seed_active_donor(&state, common::next_serial()).await;

    // Default cooldown is 90 days: one donor well past it, one inside it.
    backdate_donation(&pool, rested.id, 91).await;
    backdate_donation(&pool, recent.id, 10).await;

    let service = AvailabilityService::new(state.donors.clone(), &state.config);
    let released = service.sweep().await.unwrap();
    assert_eq!(released, 1);

    assert!(state.donors.get(rested.id).await.unwrap().unwrap().is_available);
    assert!(!state.donors.get(recent.id).await.unwrap().unwrap().is_available);

    // A second pass finds nothing left to release.
    assert_eq!(service.sweep().await.unwrap(), 0);
}

#[tokio::test]
#[serial]
async fn test_sweep_ignores_available_donors() {
    require_database!();
    let pool = common::test_pool().await;
    common::truncate_donors(&pool).await;
    let (_app, state) = common::create_test_app_with_pool(pool.clone());

    // Available, with an ancient donation stamp. Not the sweep's business.
    let donor = common::seed_active_donor(&state, common::next_serial()).await;
    sqlx::query("UPDATE donors SET donated_on = now() - make_interval(days => 400) WHERE id = $1")
        .bind(donor.id)
        .execute(&pool)
        .await
        .unwrap();

    let service = AvailabilityService::new(state.donors.clone(), &state.config);
    assert_eq!(service.sweep().await.unwrap(), 0);
    assert!(state.donors.get(donor.id).await.unwrap().unwrap().is_available);
}

#[tokio::test]
#[serial]
async fn test_toggle_stamps_donation_date_only_when_going_unavailable() {
    require_database!();
    let pool = common::test_pool().await;
    common::truncate_donors(&pool).await;
    let (_app, state) = common::create_test_app_with_pool(pool);

    let donor = common::seed_active_donor(&state, common::next_serial()).await;
    let registered_on = donor.donated_on;

    // Going unavailable records the donation moment.
    let toggled = state.donors.toggle_availability(donor.id).await.unwrap();
    assert!(!toggled.is_available);
    assert!(toggled.donated_on > registered_on);
    let stamped = toggled.donated_on;

    // Coming back does not touch it.
    let toggled = state.donors.toggle_availability(donor.id).await.unwrap();
    assert!(toggled.is_available);
    assert_eq!(toggled.donated_on, stamped);
}

#[tokio::test]
#[serial]
async fn test_change_availability_endpoint() {
    require_database!();
    let pool = common::test_pool().await;
    common::truncate_donors(&pool).await;
    let (app, state) = common::create_test_app_with_pool(pool);

    let donor = common::seed_active_donor(&state, common::next_serial()).await;
    let token = common::create_test_jwt(donor.id, &state.config.secret_key);

    let response = app
        .oneshot(
            Request::builder()
                .method("PATCH")
                .uri("/api/v1/users/change_availability")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["message"], "Availability status has been changed.");

    assert!(!state.donors.get(donor.id).await.unwrap().unwrap().is_available);
}
