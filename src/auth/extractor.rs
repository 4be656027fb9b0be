// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractor for the calling identity.
//!
//! Use the `Auth` extractor in handlers to require credentials:
//!
//! ```rust,ignore
//! async fn my_handler(Auth(identity): Auth) -> impl IntoResponse {
//!     // identity is Identity
//! }
//! ```

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use super::{basic::parse_basic, AuthError, Identity};
use crate::state::AppState;

/// Extractor for the calling identity.
///
/// Reads the `Authorization: Basic ...` header and rejects the request with
/// `401` if it is missing or cannot be decoded. A missing header never
/// falls back to the administrator.
pub struct Auth(pub Identity);

impl FromRequestParts<AppState> for Auth {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(AuthError::MissingAuthHeader)?
            .to_str()
            .map_err(|_| AuthError::InvalidAuthHeader)?;

        let credentials = parse_basic(auth_header)?;
        let admin = state.evaluator.is_admin(credentials.username());
        tracing::debug!(user = %credentials.username(), admin, "Resolved identity");

        Ok(Auth(Identity::new(credentials, admin)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use axum::http::Request;
    use base64::{engine::general_purpose::STANDARD, Engine};

    fn parts_with_header(value: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/api/nodes");
        if let Some(value) = value {
            builder = builder.header(AUTHORIZATION, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[tokio::test]
    async fn auth_extractor_requires_auth_header() {
        let state = AppState::in_memory(AppConfig::default());
        let mut parts = parts_with_header(None);

        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::MissingAuthHeader)));
    }

    #[tokio::test]
    async fn auth_extractor_resolves_basic_credentials() {
        let state = AppState::in_memory(AppConfig::default());
        let value = format!("Basic {}", STANDARD.encode("alice:pw"));
        let mut parts = parts_with_header(Some(&value));

        let Auth(identity) = Auth::from_request_parts(&mut parts, &state)
            .await
            .expect("credentials resolve");
        assert_eq!(identity.username(), "alice");
        assert!(!identity.is_admin());
    }

    #[tokio::test]
    async fn auth_extractor_flags_administrator() {
        let state = AppState::in_memory(AppConfig::default());
        let value = format!("Basic {}", STANDARD.encode("admin:whatever"));
        let mut parts = parts_with_header(Some(&value));

        let Auth(identity) = Auth::from_request_parts(&mut parts, &state)
            .await
            .expect("credentials resolve");
        assert!(identity.is_admin());
    }

    #[tokio::test]
    async fn auth_extractor_rejects_bearer_tokens() {
        let state = AppState::in_memory(AppConfig::default());
        let mut parts = parts_with_header(Some("Bearer token"));

        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::InvalidAuthHeader)));
    }
}
