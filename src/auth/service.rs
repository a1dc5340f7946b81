// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Registration and login flows.
//!
//! Both operations are blocking (bcrypt is deliberately slow); HTTP handlers
//! run them on the blocking pool.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use super::codec::{TokenCodec, TokenError, TOKEN_TTL_SECS};
use super::password::{CredentialVerifier, PasswordError};
use crate::models::{LoginResponse, Player, RegisterRequest};
use crate::storage::{IdentityStore, StorageError};

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Username or email already registered
    #[error("Username or email already exists")]
    Conflict,

    /// Unknown username or wrong password; deliberately not distinguished
    #[error("Invalid username or password")]
    Unauthorized,

    #[error("storage failure: {0}")]
    Storage(StorageError),

    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error(transparent)]
    Token(#[from] TokenError),
}

impl From<StorageError> for ServiceError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::AlreadyExists(_) => ServiceError::Conflict,
            other => ServiceError::Storage(other),
        }
    }
}

/// A freshly issued token and the player it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub player_id: Uuid,
}

impl From<IssuedToken> for LoginResponse {
    fn from(issued: IssuedToken) -> Self {
        Self {
            token: issued.token,
            token_type: "Bearer".to_string(),
            expires_in: TOKEN_TTL_SECS,
            player_id: issued.player_id,
        }
    }
}

/// Checked against the dummy hash when the username is unknown.
const DUMMY_PASSWORD: &str = "banana-game-dummy-password";

/// Orchestrates credential checks, hashing, persistence and token issuance.
pub struct AuthenticationService {
    store: Arc<dyn IdentityStore>,
    verifier: CredentialVerifier,
    codec: TokenCodec,
    /// Hash at the verifier's cost; an unknown username still pays one bcrypt
    /// verify so login latency does not reveal which usernames exist.
    dummy_hash: String,
}

impl AuthenticationService {
    pub fn new(
        store: Arc<dyn IdentityStore>,
        verifier: CredentialVerifier,
        codec: TokenCodec,
    ) -> Result<Self, PasswordError> {
        let dummy_hash = verifier.hash(DUMMY_PASSWORD)?;
        Ok(Self {
            store,
            verifier,
            codec,
            dummy_hash,
        })
    }

    /// Register a new player.
    ///
    /// Usernames and emails are compared exactly as stored. The returned
    /// [`Player`] still carries the hash; project it before sending it out.
    pub fn register(&self, request: RegisterRequest) -> Result<Player, ServiceError> {
        if self.store.find_by_username(&request.username)?.is_some()
            || self.store.find_by_email(&request.email)?.is_some()
        {
            info!(username = %request.username, "registration rejected: identity in use");
            return Err(ServiceError::Conflict);
        }

        let password_hash = self.verifier.hash(&request.password)?;
        let player = Player {
            id: Uuid::new_v4(),
            username: request.username,
            email: request.email,
            first_name: request.first_name,
            middle_name: request.middle_name,
            last_name: request.last_name,
            password_hash,
        };

        // The store re-checks uniqueness atomically; a racing registration
        // surfaces here as Conflict.
        let player = self.store.save(player)?;
        info!(player_id = %player.id, username = %player.username, "player registered");
        Ok(player)
    }

    /// Verify credentials and issue a token valid from `now`.
    pub fn login(
        &self,
        username: &str,
        password: &str,
        now: DateTime<Utc>,
    ) -> Result<IssuedToken, ServiceError> {
        let Some(player) = self.store.find_by_username(username)? else {
            let _ = self.verifier.verify(password, &self.dummy_hash);
            warn!(username = %username, "login failed");
            return Err(ServiceError::Unauthorized);
        };

        if !self.verifier.verify(password, &player.password_hash)? {
            warn!(username = %username, "login failed");
            return Err(ServiceError::Unauthorized);
        }

        let token = self.codec.issue(&player.username, now)?;
        info!(player_id = %player.id, "token issued");
        Ok(IssuedToken {
            token,
            player_id: player.id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::keys::SigningKey;
    use crate::storage::MemoryStore;
    use std::time::Instant;

    fn service() -> (AuthenticationService, TokenCodec, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let codec = TokenCodec::new(&SigningKey::generate().unwrap());
        let service = AuthenticationService::new(
            store.clone(),
            CredentialVerifier::with_cost(4),
            codec.clone(),
        )
        .unwrap();
        (service, codec, store)
    }

    fn register_request(username: &str, email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            first_name: None,
            middle_name: None,
            last_name: None,
        }
    }

    #[test]
    fn register_hashes_and_persists() {
        let (service, _, store) = service();
        let player = service
            .register(register_request("alice", "a@x.com", "pw1"))
            .unwrap();

        assert_ne!(player.password_hash, "pw1");
        assert!(player.password_hash.starts_with("$2b$"));
        assert_eq!(store.find_by_username("alice").unwrap(), Some(player));
    }

    #[test]
    fn register_rejects_username_collision() {
        let (service, _, store) = service();
        service
            .register(register_request("alice", "a@x.com", "pw1"))
            .unwrap();

        let err = service
            .register(register_request("alice", "a2@x.com", "pw2"))
            .unwrap_err();
        assert!(matches!(err, ServiceError::Conflict));
        assert_eq!(store.find_by_email("a2@x.com").unwrap(), None);
    }

    #[test]
    fn register_rejects_email_collision() {
        let (service, _, _) = service();
        service
            .register(register_request("alice", "a@x.com", "pw1"))
            .unwrap();

        let err = service
            .register(register_request("bob", "a@x.com", "pw2"))
            .unwrap_err();
        assert!(matches!(err, ServiceError::Conflict));
    }

    #[test]
    fn register_matching_is_case_sensitive() {
        let (service, _, _) = service();
        service
            .register(register_request("alice", "a@x.com", "pw1"))
            .unwrap();
        assert!(service
            .register(register_request("Alice", "A@x.com", "pw1"))
            .is_ok());
    }

    #[test]
    fn login_issues_token_for_subject() {
        let (service, codec, _) = service();
        let player = service
            .register(register_request("alice", "a@x.com", "pw1"))
            .unwrap();

        let issued = service.login("alice", "pw1", Utc::now()).unwrap();
        assert_eq!(issued.player_id, player.id);
        assert_eq!(codec.extract_subject(&issued.token).unwrap(), "alice");
    }

    #[test]
    fn login_failures_are_uniform() {
        let (service, _, _) = service();
        service
            .register(register_request("alice", "a@x.com", "pw1"))
            .unwrap();

        let wrong_password = service.login("alice", "wrongpw", Utc::now()).unwrap_err();
        let unknown_user = service.login("mallory", "pw1", Utc::now()).unwrap_err();

        assert!(matches!(wrong_password, ServiceError::Unauthorized));
        assert!(matches!(unknown_user, ServiceError::Unauthorized));
        assert_eq!(wrong_password.to_string(), unknown_user.to_string());
    }

    #[test]
    fn unknown_username_costs_a_password_check() {
        // Cost 8 makes one verify take milliseconds, well above lookup noise.
        let store = Arc::new(MemoryStore::new());
        let codec = TokenCodec::new(&SigningKey::generate().unwrap());
        let service =
            AuthenticationService::new(store, CredentialVerifier::with_cost(8), codec).unwrap();
        service
            .register(register_request("alice", "a@x.com", "pw1"))
            .unwrap();

        let time = |username: &str| {
            let start = Instant::now();
            for _ in 0..3 {
                assert!(matches!(
                    service.login(username, "wrong", Utc::now()),
                    Err(ServiceError::Unauthorized)
                ));
            }
            start.elapsed()
        };
        let known = time("alice");
        let unknown = time("mallory");

        assert!(
            known < unknown * 4,
            "known user: {known:?}; unknown user: {unknown:?}"
        );
    }

    #[test]
    fn login_does_not_match_by_email() {
        let (service, _, _) = service();
        service
            .register(register_request("alice", "a@x.com", "pw1"))
            .unwrap();
        assert!(matches!(
            service.login("a@x.com", "pw1", Utc::now()),
            Err(ServiceError::Unauthorized)
        ));
    }

    #[test]
    fn login_response_advertises_bearer_and_ttl() {
        let response = LoginResponse::from(IssuedToken {
            token: "t".into(),
            player_id: Uuid::nil(),
        });
        assert_eq!(response.token_type, "Bearer");
        assert_eq!(response.expires_in, 1800);
    }
}
