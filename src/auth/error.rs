// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication and authorization errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use super::Rank;

/// Authentication/authorization error type.
///
/// Every variant is reported as `401 Unauthorized`; `error_code` tells the
/// cases apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// No authorization header present
    MissingAuthHeader,
    /// Header is not `Basic <base64>`
    InvalidAuthHeader,
    /// Payload is not base64 of UTF-8 `username:password`
    MalformedCredentials,
    /// Repository rejected the credentials
    InvalidCredentials,
    /// Caller lacks the rank the operation needs on the node
    InsufficientRank { path: String, required: Rank },
    /// Operation is reserved to the administrator
    AdminRequired(&'static str),
}

#[derive(Serialize)]
struct AuthErrorBody {
    error: String,
    error_code: String,
}

impl AuthError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingAuthHeader => "missing_auth_header",
            AuthError::InvalidAuthHeader => "invalid_auth_header",
            AuthError::MalformedCredentials => "malformed_credentials",
            AuthError::InvalidCredentials => "invalid_credentials",
            AuthError::InsufficientRank { .. } => "insufficient_rank",
            AuthError::AdminRequired(_) => "admin_required",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        StatusCode::UNAUTHORIZED
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::MissingAuthHeader => write!(f, "Unauthorized: authorization header is required"),
            AuthError::InvalidAuthHeader => {
                write!(f, "Unauthorized: invalid authorization header (expected 'Basic <credentials>')")
            }
            AuthError::MalformedCredentials => write!(f, "Unauthorized: malformed credentials"),
            AuthError::InvalidCredentials => write!(f, "Unauthorized: invalid credentials"),
            AuthError::InsufficientRank { path, required } => {
                write!(f, "Unauthorized: {required} access required on {path}")
            }
            AuthError::AdminRequired(what) => write!(f, "Unauthorized: only admin can {what}"),
        }
    }
}

impl std::error::Error for AuthError {}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(AuthErrorBody {
            error: self.to_string(),
            error_code: self.error_code().to_string(),
        });
        (status, body).into_response()
    }
}
