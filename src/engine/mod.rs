// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Content Engine
//!
//! The hierarchical content store the API is built on. Handlers never touch
//! the tree directly: they log in to a [`Repository`] and work through the
//! returned [`Session`], which buffers changes until [`Session::save`].
//!
//! ## Tree Layout
//!
//! ```text
//! /                 # tree root (not reachable through the API)
//!   oh/             # sandbox root, created on first use
//!     reports/      # client-created nodes
//!       access = "alice:EDIT;bob:VIEW"
//!       title  = "Q3"
//! ```
//!
//! The bundled [`MemoryRepository`] keeps the tree in memory and can mirror
//! it to a JSON snapshot on disk.

pub mod account;
pub mod error;
pub mod memory;
pub mod path;
pub mod snapshot;
pub mod tree;

pub use account::{AdminAccount, Credentials};
pub use error::{EngineError, EngineResult};
pub use memory::MemoryRepository;
pub use snapshot::SnapshotFile;
pub use tree::{Node, NodeData, PropertyValue};

/// Entry point into a content repository.
pub trait Repository: Send + Sync {
    /// Open a session for the given credentials.
    ///
    /// # Errors
    /// Returns `EngineError::LoginFailed` if the credentials are rejected.
    fn login(&self, credentials: &Credentials) -> EngineResult<Box<dyn Session>>;

    /// Number of sessions that have been opened and not yet logged out.
    fn active_sessions(&self) -> usize;
}

/// A single-request handle to the repository.
///
/// Reads observe the session's own unsaved changes. Nothing becomes visible
/// to other sessions until `save` succeeds.
pub trait Session: Send {
    /// User the session was opened for.
    fn user_id(&self) -> &str;

    /// Whether the session is still usable.
    fn is_live(&self) -> bool;

    fn node(&self, path: &str) -> EngineResult<Node>;

    fn has_node(&self, path: &str) -> EngineResult<bool>;

    /// Direct children of the node at `path`.
    fn children(&self, path: &str) -> EngineResult<Vec<Node>>;

    /// Add a child node and return its path.
    fn add_node(&mut self, parent: &str, name: &str) -> EngineResult<String>;

    fn remove_node(&mut self, path: &str) -> EngineResult<()>;

    /// Create or overwrite a property.
    fn set_property(&mut self, path: &str, name: &str, value: PropertyValue) -> EngineResult<()>;

    /// Create a property that does not exist yet.
    ///
    /// # Errors
    /// Returns `EngineError::ItemExists` if the property is already set, and
    /// `EngineError::Conflict` from `save` if another session set it first.
    fn add_property(&mut self, path: &str, name: &str, value: PropertyValue) -> EngineResult<()>;

    fn remove_property(&mut self, path: &str, name: &str) -> EngineResult<()>;

    fn has_pending_changes(&self) -> bool;

    /// Commit pending changes to the shared tree.
    fn save(&mut self) -> EngineResult<()>;

    /// Discard pending changes.
    fn refresh(&mut self) -> EngineResult<()>;

    /// Release the session. Calling it again has no effect.
    fn logout(&mut self);
}
