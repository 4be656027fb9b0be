// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Rebasing of client paths into the sandbox subtree.
//!
//! Clients see the sandbox root as their `/`. Every requested path is
//! rewritten to live under it before it reaches the repository:
//!
//! | Requested | Scoped |
//! |-----------|--------|
//! | `/` | `/oh` |
//! | `/reports` | `/oh/reports` |
//! | `reports` | `/oh/reports` |
//! | `/oh/reports` | `/oh/reports` |
//! | `/ohx` | `/oh/ohx` |

use crate::engine::{path, EngineError, EngineResult, Session};

/// Maps client paths into the sandbox and keeps the sandbox root in place.
#[derive(Debug, Clone)]
pub struct PathScoper {
    root_name: String,
    root_path: String,
}

impl PathScoper {
    /// Scoper for a sandbox named `root_name` directly under the tree root.
    pub fn new(root_name: impl Into<String>) -> Self {
        let root_name = root_name.into();
        let root_path = path::child(path::ROOT_PATH, &root_name);
        Self {
            root_name,
            root_path,
        }
    }

    /// Absolute path of the sandbox root.
    pub fn root_path(&self) -> &str {
        &self.root_path
    }

    /// Rewrite a client path into the sandbox. Never fails.
    pub fn adjust(&self, requested: &str) -> String {
        if requested == path::ROOT_PATH {
            return self.root_path.clone();
        }
        if self.is_inside(requested) {
            return requested.to_string();
        }
        let relative = requested.strip_prefix(path::SEPARATOR).unwrap_or(requested);
        format!("{}{}{}", self.root_path, path::SEPARATOR, relative)
    }

    /// Whether `candidate` names the sandbox root, ignoring redundant separators.
    pub fn is_root(&self, candidate: &str) -> bool {
        path::canonical(candidate) == self.root_path
    }

    /// Create the sandbox root if it does not exist yet.
    ///
    /// Losing a creation race to another session is not an error: the
    /// pending create is discarded and the other session's root is used.
    pub fn ensure_root(&self, session: &mut dyn Session) -> EngineResult<()> {
        if session.has_node(&self.root_path)? {
            return Ok(());
        }

        session.add_node(path::ROOT_PATH, &self.root_name)?;
        match session.save() {
            Ok(()) => {
                tracing::info!(path = %self.root_path, "Created sandbox root");
                Ok(())
            }
            Err(EngineError::ItemExists(_) | EngineError::Conflict(_)) => {
                tracing::debug!(path = %self.root_path, "Sandbox root created concurrently");
                session.refresh()
            }
            Err(e) => {
                session.refresh()?;
                Err(e)
            }
        }
    }

    /// Ensure the sandbox root exists, then rewrite `requested` into it.
    pub fn scope(&self, session: &mut dyn Session, requested: &str) -> EngineResult<String> {
        self.ensure_root(session)?;
        Ok(self.adjust(requested))
    }

    fn is_inside(&self, candidate: &str) -> bool {
        match candidate.strip_prefix(self.root_path.as_str()) {
            Some(rest) => rest.is_empty() || rest.starts_with(path::SEPARATOR),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{AdminAccount, Credentials, MemoryRepository, Repository};

    fn scoper() -> PathScoper {
        PathScoper::new("oh")
    }

    fn repository() -> MemoryRepository {
        MemoryRepository::new(AdminAccount::new("admin", "admin"))
    }

    fn login(repo: &MemoryRepository) -> Box<dyn Session> {
        repo.login(&Credentials::new("admin", "admin")).unwrap()
    }

    #[test]
    fn tree_root_maps_to_sandbox_root() {
        assert_eq!(scoper().adjust("/"), "/oh");
    }

    #[test]
    fn outside_paths_are_rebased() {
        let s = scoper();
        assert_eq!(s.adjust("/reports"), "/oh/reports");
        assert_eq!(s.adjust("reports/q3"), "/oh/reports/q3");
        assert_eq!(s.adjust(""), "/oh/");
    }

    #[test]
    fn inside_paths_are_unchanged() {
        let s = scoper();
        assert_eq!(s.adjust("/oh"), "/oh");
        assert_eq!(s.adjust("/oh/reports"), "/oh/reports");
        assert_eq!(s.adjust("/oh/"), "/oh/");
    }

    #[test]
    fn sibling_with_shared_prefix_is_rebased() {
        assert_eq!(scoper().adjust("/ohx"), "/oh/ohx");
        assert_eq!(scoper().adjust("/oh-other/a"), "/oh/oh-other/a");
    }

    #[test]
    fn adjust_is_idempotent() {
        let s = scoper();
        for requested in ["/", "", "a", "/a", "/a/b", "a/b/", "/ohx", "/oh", "/oh/a", "//a"] {
            let once = s.adjust(requested);
            assert_eq!(s.adjust(&once), once, "not idempotent for {requested:?}");
        }
    }

    #[test]
    fn scoped_paths_stay_inside_sandbox() {
        let s = scoper();
        for requested in ["/", "x", "/x/y", "/ohx", "/oh/x", "//x"] {
            let scoped = path::canonical(&s.adjust(requested));
            assert!(
                scoped == "/oh" || scoped.starts_with("/oh/"),
                "{requested:?} escaped to {scoped:?}"
            );
        }
    }

    #[test]
    fn root_detection_ignores_redundant_separators() {
        let s = scoper();
        assert!(s.is_root("/oh"));
        assert!(s.is_root("/oh/"));
        assert!(s.is_root("//oh//"));
        assert!(!s.is_root("/oh/x"));
    }

    #[test]
    fn ensure_root_creates_once() {
        let repo = repository();
        let mut session = login(&repo);

        scoper().ensure_root(session.as_mut()).unwrap();
        assert!(session.has_node("/oh").unwrap());
        assert!(!session.has_pending_changes());

        scoper().ensure_root(session.as_mut()).unwrap();
        assert_eq!(session.children("/").unwrap().len(), 1);
    }

    #[test]
    fn ensure_root_tolerates_concurrent_creation() {
        let repo = repository();
        let mut racer = login(&repo);
        let mut session = login(&repo);

        // The session's workspace is taken before the racer commits the root.
        session.add_node("/", "scratch").unwrap();
        racer.add_node("/", "oh").unwrap();
        racer.set_property("/oh", "marker", "racer".into()).unwrap();
        racer.save().unwrap();

        scoper().ensure_root(session.as_mut()).unwrap();
        assert!(!session.has_pending_changes());
        let root = session.node("/oh").unwrap();
        assert!(root.has_property("marker"));
    }

    #[test]
    fn scope_creates_root_and_rewrites() {
        let repo = repository();
        let mut session = login(&repo);

        let scoped = scoper().scope(session.as_mut(), "/").unwrap();
        assert_eq!(scoped, "/oh");
        assert!(session.node(&scoped).unwrap().properties().is_empty());
    }
}
