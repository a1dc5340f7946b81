// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Capabilities granted to authenticated principals.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A granted capability.
///
/// Every registered player currently receives exactly `User`; there is no
/// elevated tier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Capability {
    /// Ordinary authenticated player
    User,
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Capability::User => write!(f, "user"),
        }
    }
}
