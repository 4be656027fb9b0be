// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Path utilities for the content tree.
//!
//! Paths are absolute and `/`-separated. Repeated and trailing separators
//! are insignificant, so `/oh//x/` and `/oh/x` name the same node.

use super::{EngineError, EngineResult};

/// Separator between path segments.
pub const SEPARATOR: char = '/';

/// Path of the tree root.
pub const ROOT_PATH: &str = "/";

/// Split an absolute path into its segments.
///
/// # Errors
/// Returns `EngineError::InvalidPath` for relative paths and for paths
/// containing `.` or `..` segments.
pub fn segments(path: &str) -> EngineResult<Vec<&str>> {
    if !path.starts_with(SEPARATOR) {
        return Err(EngineError::InvalidPath(path.to_string()));
    }

    let mut out = Vec::new();
    for segment in path.split(SEPARATOR).filter(|s| !s.is_empty()) {
        if segment == "." || segment == ".." {
            return Err(EngineError::InvalidPath(path.to_string()));
        }
        out.push(segment);
    }
    Ok(out)
}

/// Canonical form of a path: single separators, no trailing separator.
///
/// Invalid paths are returned unchanged; resolving them fails later.
pub fn canonical(path: &str) -> String {
    match segments(path) {
        Ok(parts) => join(&parts),
        Err(_) => path.to_string(),
    }
}

/// Build an absolute path from segments.
pub fn join(parts: &[&str]) -> String {
    if parts.is_empty() {
        return ROOT_PATH.to_string();
    }
    let mut out = String::new();
    for part in parts {
        out.push(SEPARATOR);
        out.push_str(part);
    }
    out
}

/// Path of a named child below `parent`.
pub fn child(parent: &str, name: &str) -> String {
    if parent == ROOT_PATH {
        format!("{SEPARATOR}{name}")
    } else {
        format!("{parent}{SEPARATOR}{name}")
    }
}

/// Validate a node name.
///
/// # Errors
/// Returns `EngineError::InvalidName` for empty names, names containing a
/// separator, and the reserved names `.` and `..`.
pub fn validate_name(name: &str) -> EngineResult<()> {
    if name.is_empty() || name.contains(SEPARATOR) || name == "." || name == ".." {
        return Err(EngineError::InvalidName(name.to_string()));
    }
    Ok(())
}
