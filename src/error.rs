// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    InvalidFormat(String),

    #[error("{0}")]
    UnknownEnumValue(String),

    #[error("{0}")]
    InconsistentState(String),

    #[error("{0}")]
    TooWeak(String),

    #[error("{0}")]
    DuplicateEntry(String),

    #[error("Incorrect mobile number, email or password")]
    InvalidCredentials,

    #[error("Inactive donor account")]
    InactiveAccount,

    #[error("Authentication required")]
    Unauthenticated,

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            AppError::InvalidFormat(msg) => {
                (StatusCode::BAD_REQUEST, "invalid_format", Some(msg.clone()))
            }
            AppError::UnknownEnumValue(msg) => {
                (StatusCode::BAD_REQUEST, "unknown_enum_value", Some(msg.clone()))
            }
            AppError::InconsistentState(msg) => {
                (StatusCode::BAD_REQUEST, "inconsistent_state", Some(msg.clone()))
            }
            AppError::TooWeak(msg) => (StatusCode::BAD_REQUEST, "too_weak", Some(msg.clone())),
            AppError::DuplicateEntry(msg) => {
                (StatusCode::BAD_REQUEST, "duplicate_entry", Some(msg.clone()))
            }
            AppError::InvalidCredentials => {
                (StatusCode::BAD_REQUEST, "invalid_credentials", None)
            }
            AppError::InactiveAccount => (StatusCode::BAD_REQUEST, "inactive_account", None),
            AppError::Unauthenticated => (StatusCode::UNAUTHORIZED, "unauthenticated", None),
            AppError::Unauthorized(msg) => {
                (StatusCode::UNAUTHORIZED, "unauthorized", Some(msg.clone()))
            }
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", Some(msg.clone())),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", Some(msg.clone())),
            AppError::Database(err) => {
                tracing::error!(error = %err, "Database error");
                (StatusCode::INTERNAL_SERVER_ERROR, "database_error", None)
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
        };

        let body = ErrorResponse {
            error: error.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
