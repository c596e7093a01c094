// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session and password routes: login, logout, recovery, reset.

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Extension, Form, Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::middleware::auth::{create_access_token, require_active, CurrentDonor, AUTH_COOKIE};
use crate::routes::MessageResponse;
use crate::services::accounts;
use crate::AppState;

pub fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/login/access-token", post(login_access_token))
        .route("/logout", get(logout))
        .route("/password-recovery/{email}", post(password_recovery))
        .route("/reset-password", post(reset_password))
}

pub fn protected_routes() -> Router<Arc<AppState>> {
    Router::new().route("/change_password", post(change_password))
}

// ─── Login / Logout ──────────────────────────────────────────

/// OAuth2-style login form; the username may be a mobile number or email.
#[derive(Deserialize)]
pub struct LoginForm {
    username: String,
    password: String,
}

#[derive(Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

/// Session cookie with the standard attribute set.
fn session_cookie(state: &AppState, token: String, max_age_minutes: i64) -> Cookie<'static> {
    Cookie::build((AUTH_COOKIE, token))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .secure(state.config.cookie_secure())
        .max_age(time::Duration::minutes(max_age_minutes))
        .build()
}

/// Verify credentials and issue an access token, both as JSON and as a
/// session cookie.
async fn login_access_token(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<(CookieJar, Json<TokenResponse>)> {
    let donor = accounts::authenticate(&state.donors, &form.username, &form.password).await?;

    if !donor.is_active {
        return Err(AppError::InactiveAccount);
    }

    let token = create_access_token(
        donor.id,
        &state.config.secret_key,
        state.config.access_token_expire_minutes,
    )?;

    tracing::info!(donor_id = %donor.id, "Donor logged in");

    let jar = jar.add(session_cookie(
        &state,
        token.clone(),
        state.config.access_token_expire_minutes,
    ));

    Ok((
        jar,
        Json(TokenResponse {
            access_token: token,
            token_type: "bearer".to_string(),
        }),
    ))
}

/// Clear the session cookie.
///
/// Bearer copies of the token stay valid until they expire; only the
/// cookie-carried session ends here.
async fn logout(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> (CookieJar, Json<MessageResponse>) {
    let jar = jar.add(session_cookie(&state, String::new(), 0));

    (
        jar,
        Json(MessageResponse {
            message: "Logged out successfully.".to_string(),
        }),
    )
}

// ─── Password Recovery ───────────────────────────────────────

/// Request a password-reset email.
///
/// The reply is the same whether or not the email is registered.
async fn password_recovery(
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
) -> Result<Json<MessageResponse>> {
    accounts::recover_password(&state, &email).await?;

    Ok(Json(MessageResponse {
        message: "Password recovery email sent.".to_string(),
    }))
}

#[derive(Deserialize)]
pub struct ResetPasswordRequest {
    token: String,
    new_password: String,
}

/// Set a new password using an emailed reset token.
async fn reset_password(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>> {
    accounts::reset_password(&state, &body.token, &body.new_password).await?;

    Ok(Json(MessageResponse {
        message: "Password reset successful!".to_string(),
    }))
}

#[derive(Deserialize)]
pub struct ChangePasswordRequest {
    password: String,
}

/// Replace the password of the logged-in donor.
async fn change_password(
    State(state): State<Arc<AppState>>,
    Extension(CurrentDonor(donor)): Extension<CurrentDonor>,
    Json(body): Json<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>> {
    require_active(&donor)?;

    accounts::change_password(&state, &donor, &body.password).await?;

    tracing::info!(donor_id = %donor.id, "Donor changed password");

    Ok(Json(MessageResponse {
        message: "Password updated successfully.".to_string(),
    }))
}
