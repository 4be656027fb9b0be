// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Property endpoints.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use super::nodes::PathQuery;
use crate::{
    auth::Auth,
    engine::path::ROOT_PATH,
    gateway::{GatewayError, OperationGateway},
    models::PropertyMap,
    state::AppState,
};

#[derive(Debug, Deserialize, IntoParams)]
pub struct SetPropertyQuery {
    /// Node to change. Defaults to `/`.
    pub path: Option<String>,
    pub name: String,
    pub value: String,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct PropertyQuery {
    /// Node to change. Defaults to `/`.
    pub path: Option<String>,
    pub name: String,
}

#[utoipa::path(
    get,
    path = "/api/properties",
    params(PathQuery),
    tag = "Properties",
    responses(
        (status = 200, description = "Property values; empty without VIEW", body = Object),
        (status = 401, description = "Missing or invalid credentials"),
        (status = 500, description = "Path not found or repository failure"),
    )
)]
pub async fn get_properties(
    Auth(identity): Auth,
    State(state): State<AppState>,
    Query(query): Query<PathQuery>,
) -> Result<Json<PropertyMap>, GatewayError> {
    let properties = OperationGateway::new(&state, &identity).read_properties(query.path())?;
    Ok(Json(properties))
}

#[utoipa::path(
    post,
    path = "/api/properties",
    params(SetPropertyQuery),
    tag = "Properties",
    responses(
        (status = 204, description = "Property set"),
        (status = 401, description = "Caller lacks ADD (new) or EDIT (existing)"),
        (status = 500, description = "Path not found or repository failure"),
    )
)]
pub async fn set_property(
    Auth(identity): Auth,
    State(state): State<AppState>,
    Query(query): Query<SetPropertyQuery>,
) -> Result<StatusCode, GatewayError> {
    let path = query.path.as_deref().unwrap_or(ROOT_PATH);
    OperationGateway::new(&state, &identity).set_property(path, &query.name, &query.value)?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete,
    path = "/api/properties",
    params(PropertyQuery),
    tag = "Properties",
    responses(
        (status = 204, description = "Property removed or was not set"),
        (status = 401, description = "Caller lacks ALL on the node"),
        (status = 500, description = "Path not found or repository failure"),
    )
)]
pub async fn delete_property(
    Auth(identity): Auth,
    State(state): State<AppState>,
    Query(query): Query<PropertyQuery>,
) -> Result<StatusCode, GatewayError> {
    let path = query.path.as_deref().unwrap_or(ROOT_PATH);
    OperationGateway::new(&state, &identity).delete_property(path, &query.name)?;
    Ok(StatusCode::NO_CONTENT)
}
