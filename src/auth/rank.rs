// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Access ranks granted by node access lists.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Access rank on a node.
///
/// ## Rank Order
///
/// `View < Add < Edit < All`. Holding a rank implies every lower rank.
///
/// - `View` - list the node and read its properties
/// - `Add` - create properties that do not exist yet
/// - `Edit` - overwrite existing properties
/// - `All` - delete the node or its properties
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Rank {
    View,
    Add,
    Edit,
    All,
}

/// Rank name that is not one of VIEW, ADD, EDIT, ALL.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown rank: {0}")]
pub struct UnknownRank(pub String);

impl Rank {
    /// Check if this rank is at least `required`.
    pub fn at_least(self, required: Rank) -> bool {
        self >= required
    }
}

impl FromStr for Rank {
    type Err = UnknownRank;

    /// Parse a rank name (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "VIEW" => Ok(Rank::View),
            "ADD" => Ok(Rank::Add),
            "EDIT" => Ok(Rank::Edit),
            "ALL" => Ok(Rank::All),
            _ => Err(UnknownRank(s.to_string())),
        }
    }
}

impl std::fmt::Display for Rank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rank::View => write!(f, "VIEW"),
            Rank::Add => write!(f, "ADD"),
            Rank::Edit => write!(f, "EDIT"),
            Rank::All => write!(f, "ALL"),
        }
    }
}
