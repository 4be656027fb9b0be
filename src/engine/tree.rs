// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory node tree and the changes a session can make to it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::path::{self, ROOT_PATH};
use super::{EngineError, EngineResult};

/// Value of a node property.
///
/// Serialized untagged, so a snapshot stores `"text"` or `["a", "b"]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    /// Single string value
    Single(String),
    /// Multi-valued property
    Multiple(Vec<String>),
}

impl PropertyValue {
    /// The string value, if this is a single-valued property.
    pub fn as_single(&self) -> Option<&str> {
        match self {
            PropertyValue::Single(value) => Some(value),
            PropertyValue::Multiple(_) => None,
        }
    }

    pub fn is_multiple(&self) -> bool {
        matches!(self, PropertyValue::Multiple(_))
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::Single(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::Single(value)
    }
}

/// Stored node: properties plus uniquely named children.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeData {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, PropertyValue>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub children: BTreeMap<String, NodeData>,
}

impl NodeData {
    /// Resolve a path relative to this node (which acts as the tree root).
    pub fn resolve(&self, node_path: &str) -> EngineResult<&NodeData> {
        let mut current = self;
        for segment in path::segments(node_path)? {
            current = current
                .children
                .get(segment)
                .ok_or_else(|| EngineError::PathNotFound(path::canonical(node_path)))?;
        }
        Ok(current)
    }

    /// Mutable variant of [`NodeData::resolve`].
    pub fn resolve_mut(&mut self, node_path: &str) -> EngineResult<&mut NodeData> {
        let mut current = self;
        for segment in path::segments(node_path)? {
            current = current
                .children
                .get_mut(segment)
                .ok_or_else(|| EngineError::PathNotFound(path::canonical(node_path)))?;
        }
        Ok(current)
    }

    /// Build a read-only view of this node located at `node_path`.
    pub fn view(&self, node_path: &str) -> Node {
        let node_path = path::canonical(node_path);
        let name = node_path
            .rsplit(path::SEPARATOR)
            .next()
            .unwrap_or_default()
            .to_string();
        Node {
            name,
            path: node_path,
            has_nodes: !self.children.is_empty(),
            properties: self.properties.clone(),
        }
    }
}

/// Read-only view of a node as returned by a session.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    name: String,
    path: String,
    has_nodes: bool,
    properties: BTreeMap<String, PropertyValue>,
}

impl Node {
    /// Node name (empty for the tree root).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Canonical absolute path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Whether the node has at least one child.
    pub fn has_nodes(&self) -> bool {
        self.has_nodes
    }

    pub fn properties(&self) -> &BTreeMap<String, PropertyValue> {
        &self.properties
    }

    pub fn property(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name)
    }

    pub fn has_property(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }
}

/// A buffered change, replayed onto the shared tree on save.
#[derive(Debug, Clone, PartialEq)]
pub enum Change {
    AddNode { parent: String, name: String },
    RemoveNode { path: String },
    SetProperty { path: String, name: String, value: PropertyValue },
    /// Create a property that must not exist yet
    AddProperty { path: String, name: String, value: PropertyValue },
    RemoveProperty { path: String, name: String },
}

impl Change {
    /// Apply this change to `tree`.
    pub fn apply(&self, tree: &mut NodeData) -> EngineResult<()> {
        match self {
            Change::AddNode { parent, name } => {
                path::validate_name(name)?;
                let parent_node = tree.resolve_mut(parent)?;
                if parent_node.children.contains_key(name) {
                    return Err(EngineError::ItemExists(path::child(
                        &path::canonical(parent),
                        name,
                    )));
                }
                parent_node.children.insert(name.clone(), NodeData::default());
                Ok(())
            }
            Change::RemoveNode { path: node_path } => {
                let mut parts = path::segments(node_path)?;
                let Some(name) = parts.pop() else {
                    return Err(EngineError::InvalidPath(ROOT_PATH.to_string()));
                };
                let parent_node = tree.resolve_mut(&path::join(&parts))?;
                parent_node
                    .children
                    .remove(name)
                    .map(|_| ())
                    .ok_or_else(|| EngineError::PathNotFound(path::canonical(node_path)))
            }
            Change::SetProperty {
                path: node_path,
                name,
                value,
            } => {
                path::validate_name(name)?;
                let node = tree.resolve_mut(node_path)?;
                node.properties.insert(name.clone(), value.clone());
                Ok(())
            }
            Change::AddProperty {
                path: node_path,
                name,
                value,
            } => {
                path::validate_name(name)?;
                let node = tree.resolve_mut(node_path)?;
                if node.properties.contains_key(name) {
                    return Err(EngineError::ItemExists(path::child(
                        &path::canonical(node_path),
                        name,
                    )));
                }
                node.properties.insert(name.clone(), value.clone());
                Ok(())
            }
            Change::RemoveProperty {
                path: node_path,
                name,
            } => {
                let node = tree.resolve_mut(node_path)?;
                node.properties
                    .remove(name)
                    .map(|_| ())
                    .ok_or_else(|| {
                        EngineError::PathNotFound(path::child(&path::canonical(node_path), name))
                    })
            }
        }
    }
}
