// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Content engine errors.

use std::io;

/// Error type for content engine operations.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Path does not resolve to a node
    #[error("Path not found: {0}")]
    PathNotFound(String),
    /// A node with that name already exists under the parent
    #[error("Item exists: {0}")]
    ItemExists(String),
    /// Node or property name is empty or contains a separator
    #[error("Invalid name: {0:?}")]
    InvalidName(String),
    /// Path is relative or contains `.`/`..` segments
    #[error("Invalid path: {0:?}")]
    InvalidPath(String),
    /// Credentials were rejected by the repository
    #[error("Login failed for user {0}")]
    LoginFailed(String),
    /// Session was used after logout
    #[error("Session is closed")]
    SessionClosed,
    /// Pending changes no longer apply to the shared tree
    #[error("Save conflict: {0}")]
    Conflict(String),
    /// Snapshot I/O error
    #[error("Storage error: {0}")]
    Storage(#[from] io::Error),
    /// Snapshot (de)serialization error
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] serde_json::Error),
}

/// Result type for content engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_the_offending_item() {
        assert_eq!(
            EngineError::PathNotFound("/oh/x".into()).to_string(),
            "Path not found: /oh/x"
        );
        assert_eq!(
            EngineError::InvalidName("a/b".into()).to_string(),
            "Invalid name: \"a/b\""
        );
        assert_eq!(EngineError::SessionClosed.to_string(), "Session is closed");
    }

    #[test]
    fn io_errors_convert_to_storage() {
        let err: EngineError = io::Error::new(io::ErrorKind::PermissionDenied, "nope").into();
        assert!(matches!(err, EngineError::Storage(_)));
    }
}
