// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Content Tree Server - sandboxed REST API over a hierarchical content store
//!
//! Clients list, read and edit nodes and properties beneath a fixed sandbox
//! node. Each node carries its own access list, checked before every
//! operation.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Basic auth identity and per-node access ranks
//! - `engine` - Content repository (tree, sessions, snapshots)
//! - `gateway` - Per-operation authorization policy
//! - `scope` - Path rebasing into the sandbox

pub mod api;
pub mod auth;
pub mod config;
pub mod engine;
pub mod error;
pub mod gateway;
pub mod logging;
pub mod models;
pub mod scope;
pub mod state;
