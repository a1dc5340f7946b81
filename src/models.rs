// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response structures used by the REST API, plus the stored
//! player record. All wire types derive `ToSchema` for the OpenAPI document.
//!
//! ## Model Categories
//!
//! - **Players**: stored identity and its caller-facing projection
//! - **Auth**: registration and login payloads
//! - **Games**: puzzle questions and game-history entries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

// =============================================================================
// Player Models
// =============================================================================

/// A registered player as stored.
///
/// Contains the password hash; never serialize this to a client. Use
/// [`PlayerResponse`] instead.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Player {
    pub id: Uuid,
    /// Unique login name
    pub username: String,
    /// Unique email address
    pub email: String,
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
    pub last_name: Option<String>,
    /// bcrypt hash of the password
    pub password_hash: String,
}

/// Player as returned by the API (no password hash).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct PlayerResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

impl From<Player> for PlayerResponse {
    fn from(player: Player) -> Self {
        Self {
            id: player.id,
            username: player.username,
            email: player.email,
            first_name: player.first_name,
            middle_name: player.middle_name,
            last_name: player.last_name,
        }
    }
}

/// Query selecting a player by ID.
#[derive(Debug, Deserialize, IntoParams)]
pub struct PlayerIdQuery {
    pub id: Uuid,
}

// =============================================================================
// Auth Models
// =============================================================================

/// Request to register a new player.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    /// Plaintext password; hashed before storage
    pub password: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub middle_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

/// Request to log in.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Successful login.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct LoginResponse {
    /// Signed bearer token
    pub token: String,
    /// Always `Bearer`
    pub token_type: String,
    /// Token lifetime in seconds
    pub expires_in: i64,
    /// ID of the authenticated player
    pub player_id: Uuid,
}

// =============================================================================
// Game Models
// =============================================================================

/// A puzzle fetched from the upstream puzzle API.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct GameQuestion {
    /// URL of the puzzle image
    pub question: String,
    /// Numeric answer
    pub solution: i64,
}

/// Outcome of one played game.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct GameHistoryEntry {
    pub id: Uuid,
    /// Whether the player won
    pub game_status: bool,
    pub player_id: Uuid,
    pub played_at: DateTime<Utc>,
}

/// Request to record a played game.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateGameHistoryRequest {
    pub game_status: bool,
    pub player_id: Uuid,
}

/// Query selecting a player's game history.
#[derive(Debug, Deserialize, IntoParams)]
pub struct GameHistoryQuery {
    pub player_id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn player_response_omits_password_hash() {
        let player = Player {
            id: Uuid::new_v4(),
            username: "alice".into(),
            email: "a@x.com".into(),
            first_name: Some("Alice".into()),
            middle_name: None,
            last_name: None,
            password_hash: "$2b$12$secret".into(),
        };
        let json = serde_json::to_string(&PlayerResponse::from(player)).unwrap();
        assert!(!json.contains("password"));
        assert!(!json.contains("$2b$"));
        assert!(!json.contains("middle_name"));
        assert!(json.contains("\"first_name\":\"Alice\""));
    }

    #[test]
    fn register_request_name_fields_are_optional() {
        let request: RegisterRequest =
            serde_json::from_str(r#"{"username":"alice","email":"a@x.com","password":"pw1"}"#)
                .unwrap();
        assert_eq!(request.username, "alice");
        assert!(request.first_name.is_none());
    }
}
