// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory content repository.
//!
//! Sessions read the shared tree until their first change. At that point the
//! session copies the tree into a private workspace and records every change
//! in a log. `save` replays the log onto a copy of the shared tree under the
//! write lock and swaps it in only if every change still applies, so a save
//! is all-or-nothing and concurrent saves never interleave.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use uuid::Uuid;

use super::path;
use super::snapshot::SnapshotFile;
use super::tree::{Change, Node, NodeData, PropertyValue};
use super::{AdminAccount, Credentials, EngineError, EngineResult, Repository, Session};

struct Shared {
    tree: RwLock<NodeData>,
    snapshot: Option<SnapshotFile>,
    admin: AdminAccount,
    live_sessions: AtomicUsize,
}

/// Repository holding the whole tree in memory.
#[derive(Clone)]
pub struct MemoryRepository {
    shared: Arc<Shared>,
}

impl MemoryRepository {
    /// Create an empty, memory-only repository.
    pub fn new(admin: AdminAccount) -> Self {
        Self::from_parts(admin, NodeData::default(), None)
    }

    /// Open a repository mirrored to a snapshot in `data_dir`.
    ///
    /// An existing snapshot is loaded; otherwise the tree starts empty.
    pub fn open(admin: AdminAccount, data_dir: impl AsRef<Path>) -> EngineResult<Self> {
        let snapshot = SnapshotFile::in_dir(data_dir);
        let tree = snapshot.load()?;
        tracing::info!(path = %snapshot.path().display(), "Loaded repository snapshot");
        Ok(Self::from_parts(admin, tree, Some(snapshot)))
    }

    fn from_parts(admin: AdminAccount, tree: NodeData, snapshot: Option<SnapshotFile>) -> Self {
        Self {
            shared: Arc::new(Shared {
                tree: RwLock::new(tree),
                snapshot,
                admin,
                live_sessions: AtomicUsize::new(0),
            }),
        }
    }
}

impl Repository for MemoryRepository {
    fn login(&self, credentials: &Credentials) -> EngineResult<Box<dyn Session>> {
        if !self.shared.admin.verify(credentials) {
            tracing::debug!(user = %credentials.username(), "Login rejected");
            return Err(EngineError::LoginFailed(credentials.username().to_string()));
        }

        self.shared.live_sessions.fetch_add(1, Ordering::SeqCst);
        let session = MemorySession {
            id: Uuid::new_v4(),
            user_id: credentials.username().to_string(),
            shared: Arc::clone(&self.shared),
            workspace: None,
            pending: Vec::new(),
            live: true,
        };
        tracing::debug!(session = %session.id, user = %session.user_id, "Session opened");
        Ok(Box::new(session))
    }

    fn active_sessions(&self) -> usize {
        self.shared.live_sessions.load(Ordering::SeqCst)
    }
}

/// Session over a [`MemoryRepository`].
pub struct MemorySession {
    id: Uuid,
    user_id: String,
    shared: Arc<Shared>,
    workspace: Option<NodeData>,
    pending: Vec<Change>,
    live: bool,
}

impl MemorySession {
    fn ensure_live(&self) -> EngineResult<()> {
        if self.live {
            Ok(())
        } else {
            Err(EngineError::SessionClosed)
        }
    }

    fn read<T>(&self, f: impl FnOnce(&NodeData) -> EngineResult<T>) -> EngineResult<T> {
        self.ensure_live()?;
        match &self.workspace {
            Some(workspace) => f(workspace),
            None => f(&self.shared.tree.read()),
        }
    }

    fn record(&mut self, change: Change) -> EngineResult<()> {
        self.ensure_live()?;
        let workspace = self
            .workspace
            .get_or_insert_with(|| self.shared.tree.read().clone());
        change.apply(workspace)?;
        self.pending.push(change);
        Ok(())
    }

    fn discard(&mut self) {
        self.pending.clear();
        self.workspace = None;
    }
}

impl Session for MemorySession {
    fn user_id(&self) -> &str {
        &self.user_id
    }

    fn is_live(&self) -> bool {
        self.live
    }

    fn node(&self, node_path: &str) -> EngineResult<Node> {
        self.read(|tree| Ok(tree.resolve(node_path)?.view(node_path)))
    }

    fn has_node(&self, node_path: &str) -> EngineResult<bool> {
        self.read(|tree| match tree.resolve(node_path) {
            Ok(_) => Ok(true),
            Err(EngineError::PathNotFound(_)) => Ok(false),
            Err(e) => Err(e),
        })
    }

    fn children(&self, node_path: &str) -> EngineResult<Vec<Node>> {
        self.read(|tree| {
            let parent_path = path::canonical(node_path);
            let parent = tree.resolve(node_path)?;
            Ok(parent
                .children
                .iter()
                .map(|(name, child)| child.view(&path::child(&parent_path, name)))
                .collect())
        })
    }

    fn add_node(&mut self, parent: &str, name: &str) -> EngineResult<String> {
        self.record(Change::AddNode {
            parent: parent.to_string(),
            name: name.to_string(),
        })?;
        Ok(path::child(&path::canonical(parent), name))
    }

    fn remove_node(&mut self, node_path: &str) -> EngineResult<()> {
        self.record(Change::RemoveNode {
            path: node_path.to_string(),
        })
    }

    fn set_property(&mut self, node_path: &str, name: &str, value: PropertyValue) -> EngineResult<()> {
        self.record(Change::SetProperty {
            path: node_path.to_string(),
            name: name.to_string(),
            value,
        })
    }

    fn add_property(&mut self, node_path: &str, name: &str, value: PropertyValue) -> EngineResult<()> {
        self.record(Change::AddProperty {
            path: node_path.to_string(),
            name: name.to_string(),
            value,
        })
    }

    fn remove_property(&mut self, node_path: &str, name: &str) -> EngineResult<()> {
        self.record(Change::RemoveProperty {
            path: node_path.to_string(),
            name: name.to_string(),
        })
    }

    fn has_pending_changes(&self) -> bool {
        !self.pending.is_empty()
    }

    fn save(&mut self) -> EngineResult<()> {
        self.ensure_live()?;
        if self.pending.is_empty() {
            return Ok(());
        }

        let mut shared_tree = self.shared.tree.write();
        let mut candidate = shared_tree.clone();
        for change in &self.pending {
            change.apply(&mut candidate).map_err(|e| match (change, e) {
                (_, EngineError::PathNotFound(p)) => {
                    EngineError::Conflict(format!("{p} was removed by another session"))
                }
                (Change::AddProperty { .. }, EngineError::ItemExists(p)) => {
                    EngineError::Conflict(format!("{p} was set by another session"))
                }
                (_, other) => other,
            })?;
        }

        if let Some(snapshot) = &self.shared.snapshot {
            snapshot.write(&candidate)?;
        }
        *shared_tree = candidate;
        drop(shared_tree);

        tracing::debug!(session = %self.id, changes = self.pending.len(), "Session saved");
        self.discard();
        Ok(())
    }

    fn refresh(&mut self) -> EngineResult<()> {
        self.ensure_live()?;
        self.discard();
        Ok(())
    }

    fn logout(&mut self) {
        if !self.live {
            return;
        }
        self.live = false;
        if !self.pending.is_empty() {
            tracing::debug!(
                session = %self.id,
                discarded = self.pending.len(),
                "Session closed with unsaved changes"
            );
        }
        self.discard();
        self.shared.live_sessions.fetch_sub(1, Ordering::SeqCst);
        tracing::debug!(session = %self.id, "Session closed");
    }
}

impl Drop for MemorySession {
    fn drop(&mut self) {
        self.logout();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn admin() -> AdminAccount {
        AdminAccount::new("admin", "admin")
    }

    fn login(repo: &MemoryRepository) -> Box<dyn Session> {
        repo.login(&Credentials::new("admin", "admin")).unwrap()
    }

    #[test]
    fn login_rejects_unknown_credentials() {
        let repo = MemoryRepository::new(admin());
        let result = repo.login(&Credentials::new("alice", "pw"));
        assert!(matches!(result, Err(EngineError::LoginFailed(u)) if u == "alice"));
        assert_eq!(repo.active_sessions(), 0);
    }

    #[test]
    fn sessions_are_counted_until_logout() {
        let repo = MemoryRepository::new(admin());
        let mut first = login(&repo);
        let second = login(&repo);
        assert_eq!(repo.active_sessions(), 2);

        first.logout();
        first.logout();
        assert_eq!(repo.active_sessions(), 1);

        drop(second);
        assert_eq!(repo.active_sessions(), 0);
    }

    #[test]
    fn closed_session_rejects_calls() {
        let repo = MemoryRepository::new(admin());
        let mut session = login(&repo);
        session.logout();
        assert!(!session.is_live());
        assert!(matches!(session.node("/"), Err(EngineError::SessionClosed)));
        assert!(matches!(session.save(), Err(EngineError::SessionClosed)));
    }

    #[test]
    fn changes_are_private_until_saved() {
        let repo = MemoryRepository::new(admin());
        let mut writer = login(&repo);
        let reader = login(&repo);

        let created = writer.add_node("/", "oh").unwrap();
        assert_eq!(created, "/oh");
        assert!(writer.has_node("/oh").unwrap());
        assert!(!reader.has_node("/oh").unwrap());

        writer.save().unwrap();
        assert!(!writer.has_pending_changes());
        assert!(reader.has_node("/oh").unwrap());
    }

    #[test]
    fn logout_discards_unsaved_changes() {
        let repo = MemoryRepository::new(admin());
        let mut session = login(&repo);
        session.add_node("/", "oh").unwrap();
        session.logout();

        let session = login(&repo);
        assert!(!session.has_node("/oh").unwrap());
    }

    #[test]
    fn refresh_discards_unsaved_changes() {
        let repo = MemoryRepository::new(admin());
        let mut session = login(&repo);
        session.add_node("/", "oh").unwrap();
        session.refresh().unwrap();
        assert!(!session.has_node("/oh").unwrap());
        assert!(!session.has_pending_changes());
    }

    #[test]
    fn concurrent_create_of_same_node_fails_second_save() {
        let repo = MemoryRepository::new(admin());
        let mut first = login(&repo);
        let mut second = login(&repo);

        first.add_node("/", "oh").unwrap();
        second.add_node("/", "oh").unwrap();
        first.save().unwrap();

        assert!(matches!(second.save(), Err(EngineError::ItemExists(_))));
        second.refresh().unwrap();
        assert!(second.has_node("/oh").unwrap());
    }

    #[test]
    fn save_conflicts_when_target_was_removed() {
        let repo = MemoryRepository::new(admin());
        let mut setup = login(&repo);
        setup.add_node("/", "oh").unwrap();
        setup.save().unwrap();

        let mut remover = login(&repo);
        let mut editor = login(&repo);
        editor.set_property("/oh", "title", "x".into()).unwrap();
        remover.remove_node("/oh").unwrap();
        remover.save().unwrap();

        assert!(matches!(editor.save(), Err(EngineError::Conflict(_))));
    }

    #[test]
    fn save_conflicts_when_new_property_was_set_meanwhile() {
        let repo = MemoryRepository::new(admin());
        let mut setup = login(&repo);
        setup.add_node("/", "oh").unwrap();
        setup.save().unwrap();

        let mut creator = login(&repo);
        let mut other = login(&repo);
        assert!(!creator.node("/oh").unwrap().has_property("title"));

        other.set_property("/oh", "title", "theirs".into()).unwrap();
        other.save().unwrap();
        creator.add_property("/oh", "title", "mine".into()).unwrap();

        assert!(matches!(creator.save(), Err(EngineError::Conflict(_))));
        creator.refresh().unwrap();
        assert_eq!(
            creator.node("/oh").unwrap().property("title"),
            Some(&PropertyValue::from("theirs"))
        );
    }

    #[test]
    fn save_conflicts_when_property_was_removed_meanwhile() {
        let repo = MemoryRepository::new(admin());
        let mut setup = login(&repo);
        setup.add_node("/", "oh").unwrap();
        setup.set_property("/oh", "title", "x".into()).unwrap();
        setup.save().unwrap();

        let mut first = login(&repo);
        let mut second = login(&repo);
        first.remove_property("/oh", "title").unwrap();
        second.remove_property("/oh", "title").unwrap();
        first.save().unwrap();

        assert!(matches!(second.save(), Err(EngineError::Conflict(_))));
    }

    #[test]
    fn children_and_properties_are_visible() {
        let repo = MemoryRepository::new(admin());
        let mut session = login(&repo);
        session.add_node("/", "oh").unwrap();
        session.add_node("/oh", "a").unwrap();
        session.add_node("/oh/a", "deep").unwrap();
        session.add_node("/oh", "b").unwrap();
        session.set_property("/oh/a", "title", "A".into()).unwrap();
        session.save().unwrap();

        let children = session.children("/oh/").unwrap();
        let names: Vec<_> = children.iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(children[0].path(), "/oh/a");
        assert!(children[0].has_nodes());
        assert!(!children[1].has_nodes());

        let node = session.node("/oh/a").unwrap();
        assert_eq!(node.property("title"), Some(&PropertyValue::from("A")));
    }

    #[test]
    fn removing_missing_property_is_not_found() {
        let repo = MemoryRepository::new(admin());
        let mut session = login(&repo);
        session.add_node("/", "oh").unwrap();
        let result = session.remove_property("/oh", "missing");
        assert!(matches!(result, Err(EngineError::PathNotFound(p)) if p == "/oh/missing"));
    }

    #[test]
    fn snapshot_survives_reopen() {
        let dir = TempDir::new().unwrap();
        {
            let repo = MemoryRepository::open(admin(), dir.path()).unwrap();
            let mut session = login(&repo);
            session.add_node("/", "oh").unwrap();
            session.set_property("/oh", "access", "alice:VIEW".into()).unwrap();
            session.save().unwrap();
        }

        let repo = MemoryRepository::open(admin(), dir.path()).unwrap();
        let session = login(&repo);
        let node = session.node("/oh").unwrap();
        assert_eq!(
            node.property("access"),
            Some(&PropertyValue::from("alice:VIEW"))
        );
    }
}
