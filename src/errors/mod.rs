// Copyright (c) 2025 Echogate Contributors
// Licensed under the MIT License. See LICENSE file for details.

//! Boundary error handling.
//!
//! Every business or validation failure is translated to an [`ApiError`]
//! at the point of detection and rendered as a JSON response. Clients see
//! a stable message and a reference code; the cause detail goes to the
//! log only. In particular:
//!
//! - credential mismatch never reveals which of login/password was wrong;
//! - an unknown token and an expired token produce identical responses;
//! - internal faults surface as a generic 500 with a reference code.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use rand::Rng;
use serde::Serialize;

/// Generate a unique error reference code.
/// Format: ERR-YYYYMMDD-XXXXXX (e.g. ERR-20250806-A3F8K2)
pub fn generate_reference_code() -> String {
    let date = Utc::now().format("%Y%m%d");
    let mut rng = rand::thread_rng();
    let chars: Vec<char> = "ABCDEFGHJKLMNPQRSTUVWXYZ23456789".chars().collect();
    let random: String = (0..6)
        .map(|_| chars[rng.gen_range(0..chars.len())])
        .collect();
    format!("ERR-{}-{}", date, random)
}

/// Client-facing error, serialized into the response body.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "error_type", rename_all = "snake_case")]
pub enum ApiError {
    /// Login/password mismatch (401).
    InvalidCredentials { message: String, reference: String },

    /// Token missing, unknown, or expired (401) — indistinguishable on
    /// the wire by design.
    Unauthorized { message: String, reference: String },

    /// Out-of-range or malformed client input (400).
    Validation {
        message: String,
        reference: String,
        field: Option<String>,
    },

    /// Unexpected fault (500) — never exposes internal detail.
    Internal { message: String, reference: String },
}

impl ApiError {
    /// HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidCredentials { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Validation { .. } => StatusCode::BAD_REQUEST,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Reference code for support correlation.
    pub fn reference(&self) -> &str {
        match self {
            ApiError::InvalidCredentials { reference, .. } => reference,
            ApiError::Unauthorized { reference, .. } => reference,
            ApiError::Validation { reference, .. } => reference,
            ApiError::Internal { reference, .. } => reference,
        }
    }

    /// The client-facing message.
    pub fn message(&self) -> &str {
        match self {
            ApiError::InvalidCredentials { message, .. } => message,
            ApiError::Unauthorized { message, .. } => message,
            ApiError::Validation { message, .. } => message,
            ApiError::Internal { message, .. } => message,
        }
    }
}

// Constructors log at creation, so no failure leaves the boundary silently.
impl ApiError {
    /// Credential mismatch. The message stays symmetric about login and
    /// password.
    pub fn invalid_credentials() -> Self {
        let reference = generate_reference_code();

        tracing::warn!(reference = %reference, "Invalid credentials");

        Self::InvalidCredentials {
            message: "Invalid credentials".to_string(),
            reference,
        }
    }

    /// Session rejection. `internal_reason` distinguishes "unknown" from
    /// "expired" in the log only; the response is identical either way.
    pub fn unauthorized(internal_reason: &str) -> Self {
        let reference = generate_reference_code();

        tracing::warn!(
            reference = %reference,
            internal_reason = %internal_reason,
            "Session rejected"
        );

        Self::Unauthorized {
            message: "Invalid session".to_string(),
            reference,
        }
    }

    /// Client input outside the allowed range or shape. The message names
    /// the violated bound.
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        let reference = generate_reference_code();
        let message = message.into();

        tracing::warn!(
            reference = %reference,
            field = %field,
            message = %message,
            "Validation failed"
        );

        Self::Validation {
            message,
            reference,
            field: Some(field.to_string()),
        }
    }

    /// Unexpected fault. Full detail goes to the log; the client gets a
    /// generic message plus the reference code.
    pub fn internal(internal_error: &str) -> Self {
        let reference = generate_reference_code();

        tracing::error!(
            reference = %reference,
            internal_error = %internal_error,
            "Internal server error"
        );

        Self::Internal {
            message: format!("An internal error occurred. Reference: {}", reference),
            reference,
        }
    }
}

/// Response body wrapper: `{"error": {...}, "status": 401}`.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub error: ApiError,
    pub status: u16,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorBody {
            status: status.as_u16(),
            error: self,
        };

        let json = serde_json::to_string(&body).unwrap_or_else(|_| {
            r#"{"error":{"error_type":"internal","message":"An internal error occurred","reference":"ERR-FALLBACK"},"status":500}"#.to_string()
        });

        (status, [("content-type", "application/json")], json).into_response()
    }
}

/// Result type used throughout the HTTP boundary.
pub type ApiResult<T> = Result<T, ApiError>;
