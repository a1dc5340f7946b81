// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Password hashing via bcrypt.
//!
//! Hashes are salted, so the same password never hashes twice to the same
//! string. `bcrypt::verify` re-derives the hash with the embedded salt and
//! cost and compares in constant time.

/// Production bcrypt cost factor.
pub const BCRYPT_COST: u32 = 12;

#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("bcrypt hash: {0}")]
    Hash(String),

    #[error("bcrypt verify: {0}")]
    Verify(String),
}

/// Checks plaintext passwords against stored bcrypt hashes.
#[derive(Debug, Clone, Copy)]
pub struct CredentialVerifier {
    cost: u32,
}

impl Default for CredentialVerifier {
    fn default() -> Self {
        Self { cost: BCRYPT_COST }
    }
}

impl CredentialVerifier {
    /// Use a non-default cost. Hashes produced at any cost still verify.
    pub fn with_cost(cost: u32) -> Self {
        Self { cost }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hash a password with a fresh random salt.
    pub fn hash(&self, plaintext: &str) -> Result<String, PasswordError> {
        bcrypt::hash(plaintext, self.cost).map_err(|e| PasswordError::Hash(e.to_string()))
    }

    /// Verify a password against a stored hash.
    ///
    /// A stored value that is not a bcrypt hash is an error, not a mismatch.
    pub fn verify(&self, plaintext: &str, stored_hash: &str) -> Result<bool, PasswordError> {
        bcrypt::verify(plaintext, stored_hash).map_err(|e| PasswordError::Verify(e.to_string()))
    }
}
