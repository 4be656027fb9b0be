// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Optional on-disk snapshot of the content tree.
//!
//! The whole tree is written as one JSON document after every successful
//! save. Writes go to a temporary file first and are renamed into place, so
//! a crash mid-write leaves the previous snapshot intact.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use super::tree::NodeData;
use super::EngineResult;

/// File name of the snapshot inside the data directory.
pub const SNAPSHOT_FILE: &str = "repository.json";

/// Location of the tree snapshot.
#[derive(Debug, Clone)]
pub struct SnapshotFile {
    path: PathBuf,
}

impl SnapshotFile {
    /// Snapshot stored in `data_dir`.
    pub fn in_dir(data_dir: impl AsRef<Path>) -> Self {
        Self {
            path: data_dir.as_ref().join(SNAPSHOT_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the tree, or an empty tree if no snapshot has been written yet.
    pub fn load(&self) -> EngineResult<NodeData> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(NodeData::default());
            }
            Err(e) => return Err(e.into()),
        };
        let tree = serde_json::from_reader(BufReader::new(file))?;
        Ok(tree)
    }

    /// Write the tree (atomic write via rename).
    pub fn write(&self, tree: &NodeData) -> EngineResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let temp_path = self.path.with_extension("tmp");
        {
            let file = File::create(&temp_path)?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, tree)?;
            writer.flush()?;
        }

        fs::rename(&temp_path, &self.path)?;
        Ok(())
    }
}
