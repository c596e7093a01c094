// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! JWT authentication middleware and role guards.

use crate::error::AppError;
use crate::models::donor::Donor;
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Cookie carrying the access token for browser clients.
pub const AUTH_COOKIE: &str = "rokto_token";

/// Access token claims.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (donor UUID)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
    /// Issued at (Unix timestamp)
    pub iat: usize,
}

/// Claims for emailed one-time tokens (verification, password reset).
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct EmailTokenClaims {
    /// Subject (donor email)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
    /// Not valid before (Unix timestamp)
    pub nbf: usize,
}

/// Authenticated donor resolved from the token subject.
#[derive(Debug, Clone)]
pub struct CurrentDonor(pub Donor);

/// Middleware that requires a valid token and a still-existing donor.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    // Try cookie first, then header
    let token = if let Some(cookie) = jar.get(AUTH_COOKIE) {
        cookie.value().to_string()
    } else {
        let auth_header = request
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok());

        match auth_header {
            Some(h) if h.starts_with("Bearer ") => h[7..].to_string(),
            _ => return Err(AppError::Unauthenticated),
        }
    };

    let claims = decode_access_token(&token, &state.config.secret_key)?;

    // A malformed subject is a malformed token; a missing donor is not.
    let donor_id: Uuid = claims.sub.parse().map_err(|_| AppError::Unauthenticated)?;

    let donor = state
        .donors
        .get(donor_id)
        .await?
        .ok_or_else(|| AppError::NotFound("The donor does not exist.".to_string()))?;

    request.extensions_mut().insert(CurrentDonor(donor));

    Ok(next.run(request).await)
}

/// Guard: the account finished email verification.
pub fn require_active(donor: &Donor) -> Result<(), AppError> {
    if !donor.is_active {
        return Err(AppError::InactiveAccount);
    }
    Ok(())
}

/// Guard: superuser only.
pub fn require_superuser(donor: &Donor) -> Result<(), AppError> {
    if !donor.is_superuser {
        return Err(AppError::Forbidden(
            "The donor doesn't have enough privileges.".to_string(),
        ));
    }
    Ok(())
}

/// Guard: admin or superuser.
pub fn require_admin_or_superuser(donor: &Donor) -> Result<(), AppError> {
    if !donor.is_admin && !donor.is_superuser {
        return Err(AppError::Forbidden(
            "The donor doesn't have enough privileges.".to_string(),
        ));
    }
    Ok(())
}

/// Create an access token for a donor session.
pub fn create_access_token(
    donor_id: Uuid,
    signing_key: &[u8],
    expire_minutes: i64,
) -> anyhow::Result<String> {
    use std::time::{SystemTime, UNIX_EPOCH};

    let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs() as usize;

    let claims = Claims {
        sub: donor_id.to_string(),
        iat: now,
        exp: now + (expire_minutes as usize) * 60,
    };

    Ok(encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(signing_key),
    )?)
}

/// Decode and verify an access token.
pub fn decode_access_token(token: &str, signing_key: &[u8]) -> Result<Claims, AppError> {
    let key = DecodingKey::from_secret(signing_key);
    let validation = Validation::new(Algorithm::HS256);

    let token_data =
        decode::<Claims>(token, &key, &validation).map_err(|_| AppError::Unauthenticated)?;

    Ok(token_data.claims)
}

/// Create an emailed one-time token bound to a donor email.
pub fn create_email_token(
    email: &str,
    signing_key: &[u8],
    expire_hours: i64,
) -> anyhow::Result<String> {
    use std::time::{SystemTime, UNIX_EPOCH};

    let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs() as usize;

    let claims = EmailTokenClaims {
        sub: email.to_string(),
        nbf: now,
        exp: now + (expire_hours as usize) * 60 * 60,
    };

    Ok(encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(signing_key),
    )?)
}

/// Verify an emailed token and return the email it was bound to.
pub fn verify_email_token(token: &str, signing_key: &[u8]) -> Result<String, AppError> {
    let key = DecodingKey::from_secret(signing_key);
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_nbf = true;

    let token_data = decode::<EmailTokenClaims>(token, &key, &validation)
        .map_err(|_| AppError::Unauthenticated)?;

    Ok(token_data.claims.sub)
}
