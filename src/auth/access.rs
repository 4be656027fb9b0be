// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Per-node access lists and the rank check built on them.
//!
//! ## Access List Format
//!
//! A node's grants live in its `access` property:
//!
//! ```text
//! alice:EDIT;bob:view
//! ```
//!
//! Entries are `username:rank` separated by `;`. Rank names are
//! case-insensitive. An entry that does not split into exactly two fields,
//! or whose rank is unknown, is skipped; the remaining entries still apply.
//! Fields are taken as written: `alice :EDIT` names the user `alice `.
//!
//! Grants are not inherited: every node is checked against its own list.

use crate::engine::Node;
use crate::engine::path;

use super::Rank;

/// Name of the node property holding the access list.
pub const ACCESS_PROPERTY: &str = "access";

/// One grant of a rank to a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessEntry {
    pub username: String,
    pub rank: Rank,
}

/// Parsed access list of a node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessList {
    entries: Vec<AccessEntry>,
}

impl AccessList {
    /// Parse an access list, skipping malformed entries.
    pub fn parse(value: &str) -> Self {
        let entries = value
            .split(';')
            .filter_map(|entry| {
                let fields: Vec<&str> = entry.split(':').collect();
                match fields.as_slice() {
                    [username, rank] if !username.is_empty() => {
                        rank.parse::<Rank>().ok().map(|rank| AccessEntry {
                            username: (*username).to_string(),
                            rank,
                        })
                    }
                    _ => None,
                }
            })
            .collect();
        Self { entries }
    }

    /// Access list read from a node's `access` property.
    ///
    /// Missing and multi-valued properties yield an empty list.
    pub fn of(node: &Node) -> Self {
        node.property(ACCESS_PROPERTY)
            .and_then(|value| value.as_single())
            .map(Self::parse)
            .unwrap_or_default()
    }

    pub fn entries(&self) -> &[AccessEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check if any entry grants `username` at least `required`.
    pub fn grants(&self, username: &str, required: Rank) -> bool {
        self.entries
            .iter()
            .any(|entry| entry.username == username && entry.rank.at_least(required))
    }
}

impl std::fmt::Display for AccessList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(";")?;
            }
            write!(f, "{}:{}", entry.username, entry.rank)?;
        }
        Ok(())
    }
}

/// Decides whether a user holds a rank on a node.
#[derive(Debug, Clone)]
pub struct AccessEvaluator {
    admin_username: String,
    sandbox_root: String,
}

impl AccessEvaluator {
    pub fn new(admin_username: impl Into<String>, sandbox_root: impl Into<String>) -> Self {
        Self {
            admin_username: admin_username.into(),
            sandbox_root: path::canonical(&sandbox_root.into()),
        }
    }

    pub fn is_admin(&self, username: &str) -> bool {
        username == self.admin_username
    }

    /// Check whether `username` holds at least `required` on `node`.
    ///
    /// The administrator passes every check. Everyone may view the sandbox
    /// root. Otherwise the node's own access list decides.
    pub fn has_access(&self, node: &Node, username: &str, required: Rank) -> bool {
        if self.is_admin(username) {
            return true;
        }

        if required == Rank::View && node.path() == self.sandbox_root {
            return true;
        }

        let granted = AccessList::of(node).grants(username, required);
        tracing::debug!(
            path = %node.path(),
            user = %username,
            %required,
            granted,
            "Access check"
        );
        granted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{AdminAccount, Credentials, MemoryRepository, Repository, Session};

    const RANKS: [Rank; 4] = [Rank::View, Rank::Add, Rank::Edit, Rank::All];

    fn evaluator() -> AccessEvaluator {
        AccessEvaluator::new("admin", "/oh")
    }

    /// Build `/oh/x` (and `/oh/y` without an access list) and return the
    /// session holding them.
    fn session_with_access(access: Option<&str>) -> Box<dyn Session> {
        let repo = MemoryRepository::new(AdminAccount::new("admin", "admin"));
        let mut session = repo.login(&Credentials::new("admin", "admin")).unwrap();
        session.add_node("/", "oh").unwrap();
        session.add_node("/oh", "x").unwrap();
        session.add_node("/oh", "y").unwrap();
        if let Some(access) = access {
            session
                .set_property("/oh/x", ACCESS_PROPERTY, access.into())
                .unwrap();
        }
        session
    }

    #[test]
    fn parse_keeps_well_formed_entries() {
        let list = AccessList::parse("alice:EDIT;bob:view");
        assert_eq!(
            list.entries(),
            &[
                AccessEntry {
                    username: "alice".into(),
                    rank: Rank::Edit
                },
                AccessEntry {
                    username: "bob".into(),
                    rank: Rank::View
                },
            ]
        );
        assert_eq!(list.to_string(), "alice:EDIT;bob:VIEW");
    }

    #[test]
    fn parse_skips_malformed_entries() {
        let list = AccessList::parse("bob;carol:superuser;dave:ADD:extra;;:VIEW;erin:ALL");
        assert_eq!(list.to_string(), "erin:ALL");
    }

    #[test]
    fn whitespace_is_not_trimmed() {
        let list = AccessList::parse("alice :EDIT; bob:VIEW;carol: ALL;dave:view");
        assert!(!list.grants("alice", Rank::View));
        assert!(!list.grants("bob", Rank::View));
        assert!(list.grants(" bob", Rank::View));
        assert!(!list.grants("carol", Rank::View));
        assert_eq!(list.to_string(), " bob:VIEW;dave:VIEW");
    }

    #[test]
    fn empty_value_grants_nothing() {
        let list = AccessList::parse("");
        assert!(list.is_empty());
        assert!(!list.grants("alice", Rank::View));
    }

    #[test]
    fn scenario_alice_edit_bob_view() {
        let session = session_with_access(Some("alice:EDIT;bob:view"));
        let node = session.node("/oh/x").unwrap();
        let eval = evaluator();

        assert!(eval.has_access(&node, "alice", Rank::Edit));
        assert!(!eval.has_access(&node, "alice", Rank::All));
        assert!(eval.has_access(&node, "bob", Rank::View));
        assert!(!eval.has_access(&node, "bob", Rank::Add));
        assert!(!eval.has_access(&node, "carol", Rank::View));
    }

    #[test]
    fn malformed_entries_do_not_block_valid_ones() {
        let session = session_with_access(Some("bob;bob:superuser;alice:ADD"));
        let node = session.node("/oh/x").unwrap();
        let eval = evaluator();

        assert!(!eval.has_access(&node, "bob", Rank::View));
        assert!(eval.has_access(&node, "alice", Rank::Add));
        assert!(eval.has_access(&node, "alice", Rank::View));
    }

    #[test]
    fn node_without_access_list_denies_non_admins() {
        let session = session_with_access(None);
        let node = session.node("/oh/y").unwrap();
        let eval = evaluator();

        for rank in RANKS {
            assert!(!eval.has_access(&node, "alice", rank));
        }
    }

    #[test]
    fn admin_has_every_rank_everywhere() {
        let session = session_with_access(Some("alice:VIEW"));
        let eval = evaluator();

        for node_path in ["/oh", "/oh/x", "/oh/y"] {
            let node = session.node(node_path).unwrap();
            for rank in RANKS {
                assert!(eval.has_access(&node, "admin", rank));
            }
        }
    }

    #[test]
    fn sandbox_root_is_publicly_viewable_only() {
        let session = session_with_access(None);
        let root = session.node("/oh").unwrap();
        let eval = evaluator();

        assert!(eval.has_access(&root, "anyone", Rank::View));
        assert!(!eval.has_access(&root, "anyone", Rank::Add));
        assert!(!eval.has_access(&root, "anyone", Rank::All));
    }

    #[test]
    fn grants_are_not_inherited() {
        let mut session = session_with_access(None);
        session
            .set_property("/oh", ACCESS_PROPERTY, "alice:ALL".into())
            .unwrap();
        let child = session.node("/oh/y").unwrap();

        assert!(!evaluator().has_access(&child, "alice", Rank::View));
    }

    #[test]
    fn multi_valued_access_property_grants_nothing() {
        let mut session = session_with_access(None);
        session
            .set_property(
                "/oh/y",
                ACCESS_PROPERTY,
                crate::engine::PropertyValue::Multiple(vec!["alice:ALL".into()]),
            )
            .unwrap();
        let node = session.node("/oh/y").unwrap();

        assert!(!evaluator().has_access(&node, "alice", Rank::View));
    }
}
