// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::gateway::RequestSession;
use crate::state::AppState;

/// Health check response with individual component status.
#[derive(Debug, Serialize, ToSchema)]
pub struct ReadyResponse {
    /// Overall health status ("ok" or "degraded").
    pub status: String,
    /// Individual health checks and their results.
    pub checks: HealthChecks,
}

/// Individual health check results.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthChecks {
    /// Whether the service process is running.
    pub service: String,
    /// Whether an elevated repository session can be opened.
    pub repository: String,
    /// Whether the sandbox root resolves ("ok", "missing" or "unavailable").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sandbox_root: Option<String>,
    /// Data directory availability (if configured).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<String>,
}

impl HealthChecks {
    fn all_ok(&self) -> bool {
        let ok = |check: &Option<String>| check.as_deref().map(|s| s == "ok").unwrap_or(true);
        // A missing sandbox root is created on first use.
        let root_ok = self
            .sandbox_root
            .as_deref()
            .map(|s| s == "ok" || s == "missing")
            .unwrap_or(true);
        self.repository == "ok" && root_ok && ok(&self.data_dir)
    }
}

/// Simple health check response for liveness checks.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

/// Check if the data directory exists and is accessible.
fn check_data_dir(state: &AppState) -> Option<String> {
    state.config.data_dir.as_ref().map(|dir| {
        if dir.is_dir() {
            "ok".to_string()
        } else {
            "missing".to_string()
        }
    })
}

/// Open an elevated session and look up the sandbox root.
///
/// Nothing is written: a root that does not exist yet is reported as
/// `missing` and created by the first content request.
fn check_repository(state: &AppState) -> (String, Option<String>) {
    let session = match state.repository.login(&state.config.admin_credentials()) {
        Ok(session) => RequestSession::new(session),
        Err(err) => {
            tracing::warn!(error = %err, "Readiness: repository login failed");
            return ("unavailable".to_string(), None);
        }
    };

    let sandbox_root = match session.has_node(state.scoper.root_path()) {
        Ok(true) => "ok".to_string(),
        Ok(false) => "missing".to_string(),
        Err(err) => {
            tracing::warn!(error = %err, "Readiness: sandbox root unavailable");
            "unavailable".to_string()
        }
    };
    ("ok".to_string(), Some(sandbox_root))
}

/// Liveness handler.
///
/// Always returns 200 if the process is running.
/// Does not check dependencies - use readiness for that.
#[utoipa::path(
    get,
    path = "/health/live",
    tag = "Health",
    responses(
        (status = 200, description = "Service is alive", body = HealthResponse)
    )
)]
pub async fn liveness() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// Readiness handler.
///
/// Returns 200 if the repository accepts the elevated login and the sandbox
/// root lookup succeeds (a root not created yet is reported as `missing`),
/// 503 otherwise.
#[utoipa::path(
    get,
    path = "/health/ready",
    tag = "Health",
    responses(
        (status = 200, description = "Service is ready", body = ReadyResponse),
        (status = 503, description = "Service is not ready", body = ReadyResponse)
    )
)]
pub async fn readiness(State(state): State<AppState>) -> (StatusCode, Json<ReadyResponse>) {
    let (repository, sandbox_root) = check_repository(&state);
    let checks = HealthChecks {
        service: "ok".to_string(),
        repository,
        sandbox_root,
        data_dir: check_data_dir(&state),
    };

    let all_ok = checks.all_ok();
    let response = ReadyResponse {
        status: if all_ok { "ok" } else { "degraded" }.to_string(),
        checks,
    };

    let status = if all_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(response))
}
