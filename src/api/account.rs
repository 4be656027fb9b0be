// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Login check and caller identity endpoints.

use axum::{extract::State, http::StatusCode, Json};

use crate::{
    auth::{Auth, Identity},
    engine::Credentials,
    gateway::{verify_login, GatewayError},
    models::{LoginRequest, LoginResponse, WhoAmIResponse},
    state::AppState,
};

impl From<Identity> for WhoAmIResponse {
    fn from(identity: Identity) -> Self {
        Self {
            username: identity.username().to_string(),
            admin: identity.is_admin(),
        }
    }
}

/// Check a username and password against the repository.
///
/// This is the only endpoint that verifies passwords of non-administrator
/// callers; it does not require an `Authorization` header.
#[utoipa::path(
    post,
    path = "/api/login",
    request_body = LoginRequest,
    tag = "Account",
    responses(
        (status = 200, description = "Credentials accepted", body = LoginResponse),
        (status = 401, description = "Credentials rejected", body = LoginResponse),
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<(StatusCode, Json<LoginResponse>), GatewayError> {
    let credentials = Credentials::new(request.username, request.password);
    if verify_login(&state, &credentials)? {
        tracing::info!(user = %credentials.username(), "Login succeeded");
        Ok((StatusCode::OK, Json(LoginResponse::ok())))
    } else {
        tracing::warn!(user = %credentials.username(), "Login failed");
        Ok((
            StatusCode::UNAUTHORIZED,
            Json(LoginResponse::invalid_credentials()),
        ))
    }
}

/// Identity the request's credentials resolve to.
#[utoipa::path(
    get,
    path = "/api/whoami",
    tag = "Account",
    responses(
        (status = 200, description = "Resolved identity", body = WhoAmIResponse),
        (status = 401, description = "Missing or malformed credentials"),
    )
)]
pub async fn whoami(Auth(identity): Auth) -> Json<WhoAmIResponse> {
    Json(identity.into())
}
