// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Node endpoints.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    auth::Auth,
    engine::path::ROOT_PATH,
    gateway::{GatewayError, OperationGateway},
    models::NodeSummary,
    state::AppState,
};

/// Target path, relative to the sandbox root. Defaults to `/`.
#[derive(Debug, Deserialize, IntoParams)]
pub struct PathQuery {
    pub path: Option<String>,
}

impl PathQuery {
    pub fn path(&self) -> &str {
        self.path.as_deref().unwrap_or(ROOT_PATH)
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct AddNodeQuery {
    /// Parent of the new node. Defaults to `/`.
    pub parent_path: Option<String>,
    pub node_name: String,
}

#[utoipa::path(
    get,
    path = "/api/nodes",
    params(PathQuery),
    tag = "Nodes",
    responses(
        (status = 200, description = "Children visible to the caller", body = [NodeSummary]),
        (status = 401, description = "Missing or invalid credentials"),
        (status = 500, description = "Path not found or repository failure"),
    )
)]
pub async fn list_nodes(
    Auth(identity): Auth,
    State(state): State<AppState>,
    Query(query): Query<PathQuery>,
) -> Result<Json<Vec<NodeSummary>>, GatewayError> {
    let children = OperationGateway::new(&state, &identity).list_children(query.path())?;
    Ok(Json(children))
}

#[utoipa::path(
    post,
    path = "/api/nodes",
    params(AddNodeQuery),
    tag = "Nodes",
    responses(
        (status = 201, description = "Node created", body = NodeSummary),
        (status = 401, description = "Caller is not the administrator"),
        (status = 500, description = "Parent not found or name already taken"),
    )
)]
pub async fn add_node(
    Auth(identity): Auth,
    State(state): State<AppState>,
    Query(query): Query<AddNodeQuery>,
) -> Result<(StatusCode, Json<NodeSummary>), GatewayError> {
    let parent = query.parent_path.as_deref().unwrap_or(ROOT_PATH);
    let created = OperationGateway::new(&state, &identity).add_node(parent, &query.node_name)?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    delete,
    path = "/api/nodes",
    params(PathQuery),
    tag = "Nodes",
    responses(
        (status = 204, description = "Node deleted, or sandbox root left in place"),
        (status = 401, description = "Caller lacks ALL on the node"),
        (status = 500, description = "Path not found or repository failure"),
    )
)]
pub async fn delete_node(
    Auth(identity): Auth,
    State(state): State<AppState>,
    Query(query): Query<PathQuery>,
) -> Result<StatusCode, GatewayError> {
    OperationGateway::new(&state, &identity).delete_node(query.path())?;
    Ok(StatusCode::NO_CONTENT)
}
