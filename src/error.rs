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
///
/// None of these are recovered locally: every error aborts the extraction
/// run and surfaces as a non-2xx status, so the external scheduler's retry
/// policy applies to the whole run.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Strava rejected credentials: {0}")]
    Auth(String),

    #[error("Strava rate limit hit: {0}")]
    RateLimit(String),

    #[error("Strava request failed: {0}")]
    Request(String),

    #[error("Failed to serialize activity batch: {0}")]
    Serialization(String),

    #[error("Sink upload failed: {0}")]
    Sink(String),

    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    #[error("Internal error: {0}")]
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
            AppError::Auth(msg) => (
                StatusCode::BAD_GATEWAY,
                "strava_auth_error",
                Some(msg.clone()),
            ),
            AppError::RateLimit(msg) => {
                tracing::warn!(error = %msg, "Strava rate limit");
                (StatusCode::TOO_MANY_REQUESTS, "strava_rate_limit", None)
            }
            AppError::Request(msg) => (
                StatusCode::BAD_GATEWAY,
                "strava_request_error",
                Some(msg.clone()),
            ),
            AppError::Serialization(msg) => {
                tracing::error!(error = %msg, "Batch serialization error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "serialization_error",
                    None,
                )
            }
            AppError::Sink(msg) => {
                tracing::error!(error = %msg, "Sink upload error");
                (StatusCode::BAD_GATEWAY, "sink_error", None)
            }
            AppError::Config(err) => {
                tracing::error!(error = %err, "Configuration error");
                (StatusCode::INTERNAL_SERVER_ERROR, "config_error", None)
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
