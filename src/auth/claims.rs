// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token claims and the request-scoped authenticated principal.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::roles::Capability;
use crate::models::Player;

/// Claims carried in every issued token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject: the player's username
    pub sub: String,
    /// Issued at (Unix seconds)
    pub iat: i64,
    /// Expiration (Unix seconds)
    pub exp: i64,
}

/// Who is making the current request.
///
/// Built by the auth filter for a single request and stored in that request's
/// extensions. Never cached or shared between requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedPrincipal {
    /// Resolved player ID
    pub player_id: Uuid,
    /// Resolved player username (matches the token subject)
    pub username: String,
    /// Capabilities granted to this principal
    pub capabilities: BTreeSet<Capability>,
}

impl AuthenticatedPrincipal {
    /// Bind a principal to a resolved player. Every player holds `User`.
    pub fn for_player(player: &Player) -> Self {
        Self {
            player_id: player.id,
            username: player.username.clone(),
            capabilities: BTreeSet::from([Capability::User]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_player() -> Player {
        Player {
            id: Uuid::new_v4(),
            username: "alice".to_string(),
            email: "a@x.com".to_string(),
            first_name: None,
            middle_name: None,
            last_name: None,
            password_hash: "$2b$04$hash".to_string(),
        }
    }

    #[test]
    fn for_player_copies_identity() {
        let player = sample_player();
        let principal = AuthenticatedPrincipal::for_player(&player);
        assert_eq!(principal.player_id, player.id);
        assert_eq!(principal.username, "alice");
    }

    #[test]
    fn players_are_granted_user_capability() {
        let principal = AuthenticatedPrincipal::for_player(&sample_player());
        assert_eq!(principal.capabilities, BTreeSet::from([Capability::User]));
    }

    #[test]
    fn serializes_capabilities_lowercase() {
        let principal = AuthenticatedPrincipal::for_player(&sample_player());
        let json = serde_json::to_value(&principal).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["capabilities"], serde_json::json!(["user"]));
    }
}
