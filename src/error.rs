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
    /// No session token is present.
    #[error("Authentication required")]
    Unauthorized,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// The content API could not be reached.
    #[error("Content API unreachable: {0}")]
    Transport(String),

    /// The content API answered with a non-success status.
    #[error("{context} (HTTP {status})")]
    Upstream { status: u16, context: String },

    /// The content API answered with a body we cannot use.
    #[error("Malformed content API response: {0}")]
    Malformed(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Status code reported by the content API, if this error carries one.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            AppError::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            AppError::Malformed(err.to_string())
        } else {
            AppError::Transport(err.to_string())
        }
    }
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
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized", None),
            AppError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "invalid_credentials", None)
            }
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "bad_request", Some(msg.clone()))
            }
            AppError::Transport(msg) => {
                tracing::warn!(error = %msg, "Content API unreachable");
                (StatusCode::BAD_GATEWAY, "content_api_unreachable", None)
            }
            AppError::Upstream { status, context } => {
                tracing::warn!(status, context = %context, "Content API error");
                (
                    StatusCode::BAD_GATEWAY,
                    "content_api_error",
                    Some(context.clone()),
                )
            }
            AppError::Malformed(msg) => {
                tracing::warn!(error = %msg, "Malformed content API response");
                (StatusCode::BAD_GATEWAY, "content_api_malformed", None)
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
