// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Operation Gateway
//!
//! Per-request policy for the content endpoints. Every operation follows the
//! same steps:
//!
//! 1. open a session (released when the request ends, on every path)
//! 2. rewrite the requested path into the sandbox
//! 3. resolve the target node
//! 4. check the rank the operation needs
//! 5. perform the operation and commit it
//!
//! ## Required Ranks
//!
//! | Operation | Rule |
//! |-----------|------|
//! | list children | VIEW on parent, VIEW per child (filter) |
//! | read properties | VIEW on node |
//! | add node | administrator only |
//! | set property | ADD if new, EDIT if it exists |
//! | delete node | ALL; the sandbox root is never removed |
//! | delete property | ALL; no-op if absent |
//! | edit sandbox root properties | administrator only |
//!
//! Reads the caller may not see come back empty. Denied writes fail with
//! [`AuthError`].

use std::ops::{Deref, DerefMut};

use axum::response::{IntoResponse, Response};

use crate::auth::{AuthError, Identity, Rank};
use crate::engine::{Credentials, EngineError, Node, PropertyValue, Session};
use crate::error::ApiError;
use crate::models::{property_map, NodeSummary, PropertyMap};
use crate::state::AppState;

/// Failure of a gateway operation.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Missing identity, insufficient rank, or admin-only operation
    #[error(transparent)]
    Unauthorized(#[from] AuthError),
    /// Path does not resolve in the repository
    #[error("Path not found: {0}")]
    NotFound(String),
    /// Any other repository failure
    #[error(transparent)]
    Engine(EngineError),
}

pub type GatewayResult<T> = Result<T, GatewayError>;

impl From<EngineError> for GatewayError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::PathNotFound(path) => GatewayError::NotFound(path),
            other => GatewayError::Engine(other),
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        match self {
            GatewayError::Unauthorized(err) => err.into_response(),
            other => {
                tracing::warn!(error = %other, "Content operation failed");
                ApiError::internal(other.to_string()).into_response()
            }
        }
    }
}

/// Session bound to a single request.
///
/// Logs the session out when dropped, so early returns and errors release
/// it too.
pub struct RequestSession {
    inner: Box<dyn Session>,
}

impl RequestSession {
    pub fn new(inner: Box<dyn Session>) -> Self {
        Self { inner }
    }
}

impl Deref for RequestSession {
    type Target = dyn Session;

    fn deref(&self) -> &Self::Target {
        self.inner.as_ref()
    }
}

impl DerefMut for RequestSession {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.inner.as_mut()
    }
}

impl Drop for RequestSession {
    fn drop(&mut self) {
        self.inner.logout();
    }
}

/// Authorizes and performs content operations for one caller.
pub struct OperationGateway<'a> {
    state: &'a AppState,
    identity: &'a Identity,
}

impl<'a> OperationGateway<'a> {
    pub fn new(state: &'a AppState, identity: &'a Identity) -> Self {
        Self { state, identity }
    }

    /// Open the session this caller works through.
    ///
    /// The administrator logs in with their own credentials. Everyone else
    /// shares the elevated administrator session and is gated by rank
    /// checks instead.
    pub fn open_session(&self) -> GatewayResult<RequestSession> {
        let session = if self.identity.is_admin() {
            self.state
                .repository
                .login(self.identity.credentials())
                .map_err(|err| match err {
                    EngineError::LoginFailed(_) => {
                        GatewayError::Unauthorized(AuthError::InvalidCredentials)
                    }
                    other => other.into(),
                })?
        } else {
            self.state
                .repository
                .login(&self.state.config.admin_credentials())?
        };
        Ok(RequestSession::new(session))
    }

    /// Children of `requested` the caller may view.
    pub fn list_children(&self, requested: &str) -> GatewayResult<Vec<NodeSummary>> {
        let mut session = self.open_session()?;
        let scoped = self.state.scoper.scope(&mut *session, requested)?;

        let parent = session.node(&scoped)?;
        if !self.can(&parent, Rank::View) {
            return Ok(Vec::new());
        }

        let children = session
            .children(&scoped)?
            .iter()
            .filter(|child| self.can(child, Rank::View))
            .map(NodeSummary::from)
            .collect();
        Ok(children)
    }

    /// Properties of the node at `requested`, if the caller may view it.
    pub fn read_properties(&self, requested: &str) -> GatewayResult<PropertyMap> {
        let mut session = self.open_session()?;
        let scoped = self.state.scoper.scope(&mut *session, requested)?;

        let node = session.node(&scoped)?;
        if !self.can(&node, Rank::View) {
            return Ok(PropertyMap::new());
        }
        Ok(property_map(&node))
    }

    pub fn add_node(&self, parent: &str, name: &str) -> GatewayResult<NodeSummary> {
        if !self.identity.is_admin() {
            return Err(self.deny(AuthError::AdminRequired("add nodes")));
        }

        let mut session = self.open_session()?;
        let scoped = self.state.scoper.scope(&mut *session, parent)?;
        let created = session.add_node(&scoped, name)?;
        session.save()?;
        tracing::info!(user = %self.identity.username(), path = %created, "Added node");

        Ok(NodeSummary::from(&session.node(&created)?))
    }

    /// Remove the node at `requested`. Removing the sandbox root is accepted
    /// and ignored.
    pub fn delete_node(&self, requested: &str) -> GatewayResult<()> {
        let mut session = self.open_session()?;
        let scoped = self.state.scoper.scope(&mut *session, requested)?;
        if self.state.scoper.is_root(&scoped) {
            tracing::info!(user = %self.identity.username(), "Ignored delete of sandbox root");
            return Ok(());
        }

        let node = session.node(&scoped)?;
        self.require(&node, Rank::All)?;
        session.remove_node(&scoped)?;
        session.save()?;
        tracing::info!(user = %self.identity.username(), path = %node.path(), "Deleted node");
        Ok(())
    }

    /// Create or overwrite a property.
    pub fn set_property(&self, requested: &str, name: &str, value: &str) -> GatewayResult<()> {
        let mut session = self.open_session()?;
        let scoped = self.state.scoper.scope(&mut *session, requested)?;
        self.require_admin_on_root(&scoped)?;

        let node = session.node(&scoped)?;
        let value = PropertyValue::from(value);
        if node.has_property(name) {
            self.require(&node, Rank::Edit)?;
            session.set_property(&scoped, name, value)?;
        } else {
            // Recorded as a create, so a concurrent create fails the save
            // instead of being overwritten under ADD.
            self.require(&node, Rank::Add)?;
            session.add_property(&scoped, name, value)?;
        }
        session.save()?;
        tracing::info!(
            user = %self.identity.username(),
            path = %node.path(),
            property = %name,
            "Set property"
        );
        Ok(())
    }

    /// Remove a property. Nothing happens if it is not set.
    pub fn delete_property(&self, requested: &str, name: &str) -> GatewayResult<()> {
        let mut session = self.open_session()?;
        let scoped = self.state.scoper.scope(&mut *session, requested)?;
        self.require_admin_on_root(&scoped)?;

        let node = session.node(&scoped)?;
        self.require(&node, Rank::All)?;
        if !node.has_property(name) {
            return Ok(());
        }

        session.remove_property(&scoped, name)?;
        session.save()?;
        tracing::info!(
            user = %self.identity.username(),
            path = %node.path(),
            property = %name,
            "Deleted property"
        );
        Ok(())
    }

    fn can(&self, node: &Node, required: Rank) -> bool {
        self.state
            .evaluator
            .has_access(node, self.identity.username(), required)
    }

    fn require(&self, node: &Node, required: Rank) -> GatewayResult<()> {
        if self.can(node, required) {
            return Ok(());
        }
        Err(self.deny(AuthError::InsufficientRank {
            path: node.path().to_string(),
            required,
        }))
    }

    fn require_admin_on_root(&self, scoped: &str) -> GatewayResult<()> {
        if self.state.scoper.is_root(scoped) && !self.identity.is_admin() {
            return Err(self.deny(AuthError::AdminRequired("edit the sandbox root")));
        }
        Ok(())
    }

    fn deny(&self, err: AuthError) -> GatewayError {
        tracing::warn!(user = %self.identity.username(), error = %err, "Access denied");
        GatewayError::Unauthorized(err)
    }
}

/// Check credentials by attempting a repository login.
///
/// The session opened for the check is released immediately.
pub fn verify_login(state: &AppState, credentials: &Credentials) -> GatewayResult<bool> {
    match state.repository.login(credentials) {
        Ok(session) => {
            drop(RequestSession::new(session));
            Ok(true)
        }
        Err(EngineError::LoginFailed(_)) => Ok(false),
        Err(err) => Err(err.into()),
    }
}
