// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Donor account and profile routes.

use axum::{
    extract::{Multipart, Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
    routing::{delete, get, patch, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::db::{ListParams, OrderBy};
use crate::error::{AppError, Result};
use crate::middleware::auth::{
    require_active, require_admin_or_superuser, require_superuser, CurrentDonor,
};
use crate::models::donor::{
    CreateDonorBySuperuser, DonorOut, RegisterDonor, UpdateByEmail, UpdateMe,
};
use crate::models::profile::{Profile, ProfileChanges};
use crate::models::stats::DonorCounts;
use crate::routes::MessageResponse;
use crate::services::accounts;
use crate::AppState;

pub fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users/create_user", post(create_user))
        .route("/users/verify-account", post(verify_account))
        .route("/users/read_users", get(read_users))
        .route("/users/counts", get(counts))
        .route("/users/read_user/{email}", get(read_user_by_email))
        .route("/users/read_profile/{donor_id}", get(read_profile))
        .route("/users/get_profile_img/{donor_id}", get(get_profile_img))
}

pub fn protected_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users/me", get(read_me))
        .route("/users/update/me", patch(update_me))
        .route("/users/update_profile/me", patch(update_profile_me))
        .route("/users/upload_profile_img", post(upload_profile_img))
        .route("/users/change_availability", patch(change_availability))
        .route("/users/create_user_by_superuser", post(create_user_by_superuser))
        .route("/users/read_users_all", get(read_users_all))
        .route("/users/update/{email}", patch(update_user_by_email))
        .route("/users/delete_user/{email}", delete(delete_user))
}

fn profile_not_found() -> AppError {
    AppError::NotFound("The profile does not exist.".to_string())
}

// ─── Registration & Verification ─────────────────────────────

/// Open self-registration; the account starts inactive until the emailed
/// verification token is redeemed.
async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterDonor>,
) -> Result<Json<DonorOut>> {
    if !state.config.open_registration {
        return Err(AppError::Forbidden(
            "Open donor registration is forbidden on this server.".to_string(),
        ));
    }

    let donor = accounts::register(&state, payload).await?;
    Ok(Json(donor.into()))
}

/// Superuser-driven creation with explicit account flags.
async fn create_user_by_superuser(
    State(state): State<Arc<AppState>>,
    Extension(CurrentDonor(actor)): Extension<CurrentDonor>,
    Json(payload): Json<CreateDonorBySuperuser>,
) -> Result<Json<DonorOut>> {
    require_superuser(&actor)?;

    let donor = accounts::register_by_superuser(&state, payload).await?;
    Ok(Json(donor.into()))
}

#[derive(Deserialize)]
pub struct VerifyAccountRequest {
    token: String,
}

/// Redeem an emailed verification token and activate the account.
async fn verify_account(
    State(state): State<Arc<AppState>>,
    Json(body): Json<VerifyAccountRequest>,
) -> Result<Json<MessageResponse>> {
    accounts::verify_account(&state, &body.token).await?;

    Ok(Json(MessageResponse {
        message: "Account verification successful.".to_string(),
    }))
}

// ─── Listings & Counts ───────────────────────────────────────

#[derive(Deserialize)]
struct ListQuery {
    #[serde(default)]
    skip: i64,
    #[serde(default = "default_limit")]
    limit: i64,
    /// Like "created_on desc"; whitelisted columns only
    order_by: Option<String>,
}

fn default_limit() -> i64 {
    100
}

impl ListQuery {
    fn into_params(self, include_unavailable: bool) -> Result<ListParams> {
        let order_by = match self.order_by.as_deref() {
            Some(raw) => OrderBy::parse(raw)?,
            None => OrderBy::default(),
        };

        Ok(ListParams {
            skip: self.skip.max(0),
            limit: self.limit.max(0),
            order_by,
            include_unavailable,
        })
    }
}

/// Public listing of currently-available donors.
async fn read_users(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<DonorOut>>> {
    let params = query.into_params(false)?;
    let donors = state.donors.list(&params).await?;

    Ok(Json(donors.into_iter().map(DonorOut::from).collect()))
}

/// Listing without the availability filter, for staff views.
async fn read_users_all(
    State(state): State<Arc<AppState>>,
    Extension(CurrentDonor(actor)): Extension<CurrentDonor>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<DonorOut>>> {
    require_admin_or_superuser(&actor)?;

    let params = query.into_params(true)?;
    let donors = state.donors.list(&params).await?;

    Ok(Json(donors.into_iter().map(DonorOut::from).collect()))
}

/// Registry-wide aggregate counts and blood-group percentages.
async fn counts(State(state): State<Arc<AppState>>) -> Result<Json<DonorCounts>> {
    Ok(Json(state.donors.counts().await?))
}

// ─── Single Donor Reads ──────────────────────────────────────

/// Donor record plus its profile.
#[derive(Serialize)]
pub struct DonorDetail {
    #[serde(flatten)]
    pub donor: DonorOut,
    pub profile: Profile,
}

/// Current donor with profile.
async fn read_me(
    State(state): State<Arc<AppState>>,
    Extension(CurrentDonor(donor)): Extension<CurrentDonor>,
) -> Result<Json<DonorDetail>> {
    require_active(&donor)?;

    let profile = state
        .profiles
        .get_by_donor(donor.id)
        .await?
        .ok_or_else(profile_not_found)?;

    Ok(Json(DonorDetail {
        donor: donor.into(),
        profile,
    }))
}

async fn read_user_by_email(
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
) -> Result<Json<DonorOut>> {
    let donor = state
        .donors
        .get_by_email(&email)
        .await?
        .ok_or_else(|| AppError::NotFound("The donor does not exist.".to_string()))?;

    Ok(Json(donor.into()))
}

async fn read_profile(
    State(state): State<Arc<AppState>>,
    Path(donor_id): Path<Uuid>,
) -> Result<Json<Profile>> {
    let profile = state
        .profiles
        .get_by_donor(donor_id)
        .await?
        .ok_or_else(profile_not_found)?;

    Ok(Json(profile))
}

// ─── Updates ─────────────────────────────────────────────────

/// Self-update, gated on the current password.
async fn update_me(
    State(state): State<Arc<AppState>>,
    Extension(CurrentDonor(donor)): Extension<CurrentDonor>,
    Json(payload): Json<UpdateMe>,
) -> Result<Json<DonorOut>> {
    require_active(&donor)?;

    let updated = accounts::update_self(&state, &donor, payload).await?;
    Ok(Json(updated.into()))
}

/// Privileged update of any donor, keyed by email.
async fn update_user_by_email(
    State(state): State<Arc<AppState>>,
    Extension(CurrentDonor(actor)): Extension<CurrentDonor>,
    Path(email): Path<String>,
    Json(payload): Json<UpdateByEmail>,
) -> Result<Json<DonorOut>> {
    require_superuser(&actor)?;

    let updated = accounts::update_by_email(&state, &email, payload).await?;
    Ok(Json(updated.into()))
}

/// Flip the donor's availability; donating stamps the donation time.
async fn change_availability(
    State(state): State<Arc<AppState>>,
    Extension(CurrentDonor(donor)): Extension<CurrentDonor>,
) -> Result<Json<MessageResponse>> {
    require_active(&donor)?;

    state.donors.toggle_availability(donor.id).await?;

    Ok(Json(MessageResponse {
        message: "Availability status has been changed.".to_string(),
    }))
}

async fn delete_user(
    State(state): State<Arc<AppState>>,
    Extension(CurrentDonor(actor)): Extension<CurrentDonor>,
    Path(email): Path<String>,
) -> Result<Json<MessageResponse>> {
    require_superuser(&actor)?;

    accounts::delete_by_email(&state, &actor, &email).await?;

    Ok(Json(MessageResponse {
        message: "The donor has been removed!".to_string(),
    }))
}

// ─── Profile ─────────────────────────────────────────────────

/// Update the current donor's social links and employment status.
async fn update_profile_me(
    State(state): State<Arc<AppState>>,
    Extension(CurrentDonor(donor)): Extension<CurrentDonor>,
    Json(changes): Json<ProfileChanges>,
) -> Result<Json<Profile>> {
    require_active(&donor)?;

    let profile = state.profiles.update(donor.id, &changes).await?;
    Ok(Json(profile))
}

/// Store the uploaded avatar as `{donor_id}.png` and point the profile at it.
async fn upload_profile_img(
    State(state): State<Arc<AppState>>,
    Extension(CurrentDonor(donor)): Extension<CurrentDonor>,
    mut multipart: Multipart,
) -> Result<Json<MessageResponse>> {
    require_active(&donor)?;

    while let Some(field) = multipart.next_field().await.map_err(|_| {
        AppError::InvalidFormat("The upload is not valid multipart data.".to_string())
    })? {
        if field.name() != Some("file") {
            continue;
        }

        let data = field.bytes().await.map_err(|_| {
            AppError::InvalidFormat("The uploaded file could not be read.".to_string())
        })?;

        if data.is_empty() {
            return Err(AppError::InvalidFormat(
                "The uploaded image is empty.".to_string(),
            ));
        }

        let file_name = format!("{}.png", donor.id);
        let path = std::path::Path::new(&state.config.static_dir).join(&file_name);

        tokio::fs::create_dir_all(&state.config.static_dir)
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to create static dir: {e}")))?;
        tokio::fs::write(&path, &data)
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to store profile image: {e}")))?;

        state.profiles.set_avatar(donor.id, &file_name).await?;

        tracing::info!(donor_id = %donor.id, bytes = data.len(), "Profile image stored");

        return Ok(Json(MessageResponse {
            message: "Profile image upload successful.".to_string(),
        }));
    }

    Err(AppError::InvalidFormat(
        "The file field is missing.".to_string(),
    ))
}

/// Serve the avatar bytes.
///
/// `profile_img` values are written only by `upload_profile_img` (or the
/// default), so the joined path stays inside the static dir.
async fn get_profile_img(
    State(state): State<Arc<AppState>>,
    Path(donor_id): Path<Uuid>,
) -> Result<Response> {
    let profile = state
        .profiles
        .get_by_donor(donor_id)
        .await?
        .ok_or_else(profile_not_found)?;

    let path = std::path::Path::new(&state.config.static_dir).join(&profile.profile_img);
    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|_| AppError::NotFound("The profile image does not exist.".to_string()))?;

    Ok(([(header::CONTENT_TYPE, "image/png")], bytes).into_response())
}
