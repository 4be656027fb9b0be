// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response bodies of the REST API. All types derive `ToSchema`
//! for the OpenAPI document.
//!
//! Query parameters and body fields use camelCase (`parentPath`,
//! `nodeName`, `hasNodes`) to match the HTTP surface.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::engine::{Node, PropertyValue};

/// Value reported for multi-valued properties.
pub const MULTIPLE_VALUES_MARKER: &str = "[Multiple Values]";

/// A child node as listed by `GET /api/nodes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NodeSummary {
    /// Node name, unique among its siblings.
    pub name: String,
    /// Absolute repository path of the node.
    pub path: String,
    /// Whether the node has children of its own.
    pub has_nodes: bool,
}

impl From<&Node> for NodeSummary {
    fn from(node: &Node) -> Self {
        Self {
            name: node.name().to_string(),
            path: node.path().to_string(),
            has_nodes: node.has_nodes(),
        }
    }
}

/// Property name to value, as returned by `GET /api/properties`.
///
/// Multi-valued properties are reported as [`MULTIPLE_VALUES_MARKER`].
pub type PropertyMap = BTreeMap<String, String>;

/// Flatten a node's properties into their client representation.
pub fn property_map(node: &Node) -> PropertyMap {
    node.properties()
        .iter()
        .map(|(name, value)| {
            let rendered = match value {
                PropertyValue::Single(value) => value.clone(),
                PropertyValue::Multiple(_) => MULTIPLE_VALUES_MARKER.to_string(),
            };
            (name.clone(), rendered)
        })
        .collect()
}

// =============================================================================
// Login
// =============================================================================

/// Body of `POST /api/login`.
#[derive(Clone, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Result of a login check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    /// `ok` or `error`.
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl LoginResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            message: None,
        }
    }

    pub fn invalid_credentials() -> Self {
        Self {
            status: "error".to_string(),
            message: Some("Invalid credentials".to_string()),
        }
    }
}

/// Identity the request was resolved to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct WhoAmIResponse {
    pub username: String,
    /// Whether the caller is the administrator.
    pub admin: bool,
}
