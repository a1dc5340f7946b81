// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Process-wide HMAC signing key.
//!
//! ## Key Sources
//!
//! - **Configured**: `JWT_SECRET` holds a base64-encoded secret. Tokens survive
//!   restarts as long as the secret does.
//! - **Ephemeral**: no secret configured, 64 random bytes are drawn at startup.
//!   Every token issued by a previous process becomes unverifiable after a
//!   restart.
//!
//! The key is loaded once and only read afterwards.

use base64ct::{Base64, Encoding};
use ring::rand::{SecureRandom, SystemRandom};

use crate::config::JWT_SECRET_ENV;

/// Minimum decoded secret length (256 bits, the HS256 block-size floor).
pub const MIN_SECRET_LEN: usize = 32;

/// Length of a generated ephemeral secret.
const GENERATED_SECRET_LEN: usize = 64;

/// Where the signing key came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySource {
    /// Loaded from configuration
    Configured,
    /// Generated at process start, never persisted
    Ephemeral,
}

#[derive(Debug, thiserror::Error)]
pub enum KeyError {
    #[error("JWT_SECRET is not valid base64: {0}")]
    Encoding(String),

    #[error("signing secret must be at least 32 bytes, got {0}")]
    TooShort(usize),

    #[error("failed to generate a random signing secret")]
    Generation,
}

/// Symmetric secret used to sign and verify tokens.
#[derive(Clone)]
pub struct SigningKey {
    secret: Vec<u8>,
    source: KeySource,
}

impl SigningKey {
    /// Wrap raw secret bytes.
    pub fn from_secret(secret: impl Into<Vec<u8>>) -> Result<Self, KeyError> {
        let secret = secret.into();
        if secret.len() < MIN_SECRET_LEN {
            return Err(KeyError::TooShort(secret.len()));
        }
        Ok(Self {
            secret,
            source: KeySource::Configured,
        })
    }

    /// Decode a standard-alphabet base64 secret.
    pub fn from_base64(encoded: &str) -> Result<Self, KeyError> {
        let secret =
            Base64::decode_vec(encoded.trim()).map_err(|e| KeyError::Encoding(e.to_string()))?;
        Self::from_secret(secret)
    }

    /// Draw a fresh random secret from the system CSPRNG.
    pub fn generate() -> Result<Self, KeyError> {
        let mut secret = vec![0u8; GENERATED_SECRET_LEN];
        SystemRandom::new()
            .fill(&mut secret)
            .map_err(|_| KeyError::Generation)?;
        Ok(Self {
            secret,
            source: KeySource::Ephemeral,
        })
    }

    /// Load from `JWT_SECRET`, falling back to an ephemeral key when unset.
    ///
    /// A set-but-invalid secret is an error rather than a silent fallback.
    pub fn from_env() -> Result<Self, KeyError> {
        match std::env::var(JWT_SECRET_ENV) {
            Ok(encoded) if !encoded.trim().is_empty() => Self::from_base64(&encoded),
            _ => Self::generate(),
        }
    }

    pub fn source(&self) -> KeySource {
        self.source
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.secret
    }
}

impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningKey")
            .field("secret", &"<redacted>")
            .field("source", &self.source)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_short_secrets() {
        let err = SigningKey::from_secret(vec![7u8; 16]).unwrap_err();
        assert!(matches!(err, KeyError::TooShort(16)));
    }

    #[test]
    fn decodes_base64_secret() {
        let encoded = Base64::encode_string(&[42u8; 48]);
        let key = SigningKey::from_base64(&encoded).unwrap();
        assert_eq!(key.as_bytes(), &[42u8; 48]);
        assert_eq!(key.source(), KeySource::Configured);
    }

    #[test]
    fn rejects_invalid_base64() {
        let err = SigningKey::from_base64("not base64 at all!!").unwrap_err();
        assert!(matches!(err, KeyError::Encoding(_)));
    }

    #[test]
    fn generated_keys_are_ephemeral_and_distinct() {
        let a = SigningKey::generate().unwrap();
        let b = SigningKey::generate().unwrap();
        assert_eq!(a.source(), KeySource::Ephemeral);
        assert_eq!(a.as_bytes().len(), GENERATED_SECRET_LEN);
        assert_ne!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn debug_output_redacts_secret() {
        let key = SigningKey::from_secret(vec![1u8; 32]).unwrap();
        let printed = format!("{key:?}");
        assert!(printed.contains("<redacted>"));
        assert!(!printed.contains("[1, 1"));
    }
}
