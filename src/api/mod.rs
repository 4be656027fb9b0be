// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{routing::get, routing::post, Router};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::Rank,
    models::{LoginRequest, LoginResponse, NodeSummary, WhoAmIResponse},
    state::AppState,
};

pub mod account;
pub mod health;
pub mod nodes;
pub mod properties;

pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/login", post(account::login))
        .route("/whoami", get(account::whoami))
        .route(
            "/nodes",
            get(nodes::list_nodes)
                .post(nodes::add_node)
                .delete(nodes::delete_node),
        )
        .route(
            "/properties",
            get(properties::get_properties)
                .post(properties::set_property)
                .delete(properties::delete_property),
        );

    let health_routes = Router::new()
        .route("/live", get(health::liveness))
        .route("/ready", get(health::readiness));

    Router::new()
        .nest("/api", api_routes)
        .nest("/health", health_routes)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(CorsLayer::permissive())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        account::login,
        account::whoami,
        nodes::list_nodes,
        nodes::add_node,
        nodes::delete_node,
        properties::get_properties,
        properties::set_property,
        properties::delete_property,
        health::liveness,
        health::readiness
    ),
    components(
        schemas(
            NodeSummary,
            LoginRequest,
            LoginResponse,
            WhoAmIResponse,
            Rank,
            health::HealthResponse,
            health::ReadyResponse,
            health::HealthChecks
        )
    ),
    tags(
        (name = "Account", description = "Login check and caller identity"),
        (name = "Nodes", description = "Listing, creating and deleting nodes"),
        (name = "Properties", description = "Reading and editing node properties"),
        (name = "Health", description = "Liveness and readiness checks")
    )
)]
struct ApiDoc;
