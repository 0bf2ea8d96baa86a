// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type shared by the enrichment pipeline and the HTTP layer.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Refresh-token exchange failed; the cached token must not be used.
    #[error("Token refresh failed: {0}")]
    TokenRefresh(String),

    #[error("Invalid credentials: {0}")]
    Credentials(String),

    /// Activity lookup returned a non-2xx status.
    #[error("Activity not found (HTTP {status}): {body}")]
    NotFound { status: u16, body: String },

    #[error("Remote API error (HTTP {status}): {body}")]
    Remote { status: u16, body: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Invalid activity timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("Credential store error: {0}")]
    Store(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// True for failures that stem from the OAuth credentials rather than the
    /// request itself.
    pub fn is_auth_error(&self) -> bool {
        match self {
            AppError::TokenRefresh(_) | AppError::Credentials(_) => true,
            AppError::Remote { status, .. } | AppError::NotFound { status, .. } => *status == 401,
            _ => false,
        }
    }

    /// HTTP status reported by the remote side, if any.
    pub fn remote_status(&self) -> Option<u16> {
        match self {
            AppError::NotFound { status, .. } | AppError::Remote { status, .. } => Some(*status),
            _ => None,
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
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "bad_request", Some(msg.clone()))
            }
            // Enrichment errors stay in the worker.
            _ => {
                tracing::error!(error = %self, "Internal server error");
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

/// Result type alias for handlers and services
pub type Result<T> = std::result::Result<T, AppError>;
