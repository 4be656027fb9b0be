// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::AccessEvaluator;
use crate::config::AppConfig;
use crate::engine::{EngineResult, MemoryRepository, Repository};
use crate::scope::PathScoper;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<dyn Repository>,
    pub config: Arc<AppConfig>,
    pub scoper: PathScoper,
    pub evaluator: AccessEvaluator,
}

impl AppState {
    pub fn new(config: AppConfig, repository: Arc<dyn Repository>) -> Self {
        let scoper = PathScoper::new(&config.sandbox_name);
        let evaluator = AccessEvaluator::new(&config.admin_username, scoper.root_path());
        Self {
            repository,
            config: Arc::new(config),
            scoper,
            evaluator,
        }
    }

    /// State backed by a memory-only repository.
    pub fn in_memory(config: AppConfig) -> Self {
        let repository = MemoryRepository::new(config.admin_account());
        Self::new(config, Arc::new(repository))
    }

    /// State backed by the repository `config` describes.
    ///
    /// With a data directory configured, the tree is loaded from and saved
    /// to its snapshot.
    pub fn from_config(config: AppConfig) -> EngineResult<Self> {
        match &config.data_dir {
            Some(dir) => {
                let repository = MemoryRepository::open(config.admin_account(), dir)?;
                Ok(Self::new(config, Arc::new(repository)))
            }
            None => Ok(Self::in_memory(config)),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::in_memory(AppConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_state_scopes_to_default_sandbox() {
        let state = AppState::default();
        assert_eq!(state.scoper.root_path(), "/oh");
        assert!(state.evaluator.is_admin("admin"));
        assert_eq!(state.repository.active_sessions(), 0);
    }

    #[test]
    fn from_config_uses_snapshot_directory() {
        let dir = TempDir::new().unwrap();
        let config = AppConfig {
            data_dir: Some(dir.path().to_path_buf()),
            sandbox_name: "tenant".into(),
            ..AppConfig::default()
        };

        let state = AppState::from_config(config).unwrap();
        assert_eq!(state.scoper.root_path(), "/tenant");
    }
}
