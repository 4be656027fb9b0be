// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! The identity a request acts as.

use crate::engine::Credentials;

/// Caller identity resolved from the request's credentials.
///
/// Resolution does not verify the password. Only administrator callers have
/// it checked, when their own session is opened.
#[derive(Debug, Clone)]
pub struct Identity {
    credentials: Credentials,
    admin: bool,
}

impl Identity {
    pub fn new(credentials: Credentials, admin: bool) -> Self {
        Self { credentials, admin }
    }

    pub fn username(&self) -> &str {
        self.credentials.username()
    }

    /// Credentials as presented by the caller.
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Whether the caller claims the administrator identity.
    pub fn is_admin(&self) -> bool {
        self.admin
    }
}
