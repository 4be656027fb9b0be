// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Identity resolution and per-node authorization for the content API.
//!
//! ## Auth Flow
//!
//! 1. Client sends `Authorization: Basic base64(username:password)`
//! 2. The `Auth` extractor decodes it into an [`Identity`]
//! 3. Handlers open a session:
//!    - the administrator logs in with their own credentials
//!    - everyone else gets the elevated administrator session
//! 4. Before touching a node, the gateway asks the [`AccessEvaluator`]
//!    whether the identity holds the [`Rank`] the operation needs, based on
//!    the node's `access` property
//!
//! ## Security
//!
//! - All `/api` endpoints except `/api/login` require credentials
//! - A missing or malformed header is rejected, never treated as admin
//! - Grants are per node and never inherited from ancestors

pub mod access;
pub mod basic;
pub mod error;
pub mod extractor;
pub mod identity;
pub mod rank;

pub use access::{AccessEntry, AccessEvaluator, AccessList, ACCESS_PROPERTY};
pub use basic::parse_basic;
pub use error::AuthError;
pub use extractor::Auth;
pub use identity::Identity;
pub use rank::Rank;
