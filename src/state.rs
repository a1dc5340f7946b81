// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

#[cfg(test)]
use url::Url;

use crate::auth::password::PasswordError;
use crate::auth::{
    AuthenticationService, Clock, CredentialVerifier, SigningKey, SystemClock, TokenCodec,
};
#[cfg(test)]
use crate::config::DEFAULT_PUZZLE_API_URL;
use crate::providers::PuzzleClient;
#[cfg(test)]
use crate::storage::MemoryStore;
use crate::storage::{GameHistoryStore, IdentityStore};

/// Shared, read-only handles for every request.
///
/// Nothing request-specific lives here; the authenticated principal travels
/// in each request's extensions.
#[derive(Clone)]
pub struct AppState {
    pub identities: Arc<dyn IdentityStore>,
    pub history: Arc<dyn GameHistoryStore>,
    pub codec: TokenCodec,
    pub auth: Arc<AuthenticationService>,
    pub clock: Arc<dyn Clock>,
    pub puzzles: PuzzleClient,
}

impl AppState {
    pub fn new(
        identities: Arc<dyn IdentityStore>,
        history: Arc<dyn GameHistoryStore>,
        key: &SigningKey,
        verifier: CredentialVerifier,
        puzzles: PuzzleClient,
    ) -> Result<Self, PasswordError> {
        let codec = TokenCodec::new(key);
        let auth = Arc::new(AuthenticationService::new(
            identities.clone(),
            verifier,
            codec.clone(),
        )?);
        Ok(Self {
            identities,
            history,
            codec,
            auth,
            clock: Arc::new(SystemClock),
            puzzles,
        })
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// In-memory state with an ephemeral key and a cheap bcrypt cost.
    #[cfg(test)]
    pub(crate) fn for_tests() -> Self {
        let store = Arc::new(MemoryStore::new());
        let key = SigningKey::generate().expect("key generation");
        let url = Url::parse(DEFAULT_PUZZLE_API_URL).expect("default puzzle url");
        let puzzles = PuzzleClient::new(url).expect("http client");
        Self::new(
            store.clone(),
            store,
            &key,
            CredentialVerifier::with_cost(4),
            puzzles,
        )
        .expect("test state")
    }
}
