// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Compact signed tokens (HS256 JWT).
//!
//! A token is `base64url(header).base64url(payload).base64url(signature)`.
//! The payload is readable by anyone; the HMAC only guarantees integrity.
//!
//! The codec never reads the clock. Callers pass `now` so expiry is
//! deterministic under test.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use super::claims::TokenClaims;
use super::keys::SigningKey;

/// Fixed token lifetime: 30 minutes.
pub const TOKEN_TTL_SECS: i64 = 30 * 60;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    /// Wrong segment count, bad base64, or undecodable header/claims
    #[error("token is malformed")]
    Malformed,

    /// Signature does not match the header and payload
    #[error("token signature is invalid")]
    InvalidSignature,

    #[error("token signing failed: {0}")]
    Signing(String),
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                TokenError::InvalidSignature
            }
            _ => TokenError::Malformed,
        }
    }
}

/// Issues and verifies tokens with a single process-wide key.
///
/// Cheap to clone and safe to share across request tasks.
#[derive(Clone)]
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenCodec {
    pub fn new(key: &SigningKey) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is judged by `is_expired` against the injected clock.
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding: EncodingKey::from_secret(key.as_bytes()),
            decoding: DecodingKey::from_secret(key.as_bytes()),
            validation,
        }
    }

    /// Sign a token for `subject`, valid for [`TOKEN_TTL_SECS`] from `now`.
    pub fn issue(&self, subject: &str, now: DateTime<Utc>) -> Result<String, TokenError> {
        let claims = TokenClaims {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(TOKEN_TTL_SECS)).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Check the signature and decode the claims. Expiry is not checked here.
    pub fn verify(&self, token: &str) -> Result<TokenClaims, TokenError> {
        let data = decode::<TokenClaims>(token, &self.decoding, &self.validation)?;
        Ok(data.claims)
    }

    /// Subject of a correctly signed token.
    pub fn extract_subject(&self, token: &str) -> Result<String, TokenError> {
        self.verify(token).map(|claims| claims.sub)
    }

    /// True iff `now` has reached the token's expiry.
    pub fn is_expired(claims: &TokenClaims, now: DateTime<Utc>) -> bool {
        now.timestamp() >= claims.exp
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
    use chrono::TimeZone;

    fn codec() -> TokenCodec {
        TokenCodec::new(&SigningKey::from_secret(vec![9u8; 32]).unwrap())
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn token_has_three_base64url_segments() {
        let token = codec().issue("alice", t0()).unwrap();
        let segments: Vec<&str> = token.split('.').collect();
        assert_eq!(segments.len(), 3);
        for segment in segments {
            assert!(URL_SAFE_NO_PAD.decode(segment).is_ok());
        }
    }

    #[test]
    fn issue_sets_subject_and_window() {
        let codec = codec();
        let token = codec.issue("alice", t0()).unwrap();
        let claims = codec.verify(&token).unwrap();
        assert_eq!(claims.sub, "alice");
        assert_eq!(claims.iat, t0().timestamp());
        assert_eq!(claims.exp, t0().timestamp() + TOKEN_TTL_SECS);
    }

    #[test]
    fn extract_subject_round_trips_unusual_subjects() {
        let codec = codec();
        for subject in ["alice", "", "名前", "a.b.c", "with \"quotes\" and \\slashes"] {
            let token = codec.issue(subject, t0()).unwrap();
            assert_eq!(codec.extract_subject(&token).unwrap(), subject);
        }
    }

    #[test]
    fn expiry_boundary_is_inclusive() {
        let codec = codec();
        let claims = codec.verify(&codec.issue("alice", t0()).unwrap()).unwrap();

        let almost = t0() + Duration::minutes(29) + Duration::seconds(59);
        let exactly = t0() + Duration::minutes(30);
        let past = t0() + Duration::minutes(30) + Duration::seconds(1);

        assert!(!TokenCodec::is_expired(&claims, almost));
        assert!(TokenCodec::is_expired(&claims, exactly));
        assert!(TokenCodec::is_expired(&claims, past));
    }

    #[test]
    fn verify_does_not_reject_expired_tokens() {
        // Issued long ago; signature is still valid.
        let codec = codec();
        let token = codec.issue("alice", t0() - Duration::days(365)).unwrap();
        assert!(codec.verify(&token).is_ok());
    }

    #[test]
    fn flipping_any_payload_bit_breaks_the_signature() {
        let codec = codec();
        for (i, subject) in ["alice", "bob", "carol-the-long-username"].iter().enumerate() {
            let token = codec
                .issue(subject, t0() + Duration::seconds(i as i64 * 17))
                .unwrap();
            let parts: Vec<&str> = token.split('.').collect();
            let payload = URL_SAFE_NO_PAD.decode(parts[1]).unwrap();

            for bit in 0..payload.len() * 8 {
                let mut tampered = payload.clone();
                tampered[bit / 8] ^= 1 << (bit % 8);
                let forged = format!(
                    "{}.{}.{}",
                    parts[0],
                    URL_SAFE_NO_PAD.encode(&tampered),
                    parts[2]
                );
                assert_eq!(
                    codec.verify(&forged),
                    Err(TokenError::InvalidSignature),
                    "bit {bit} of {subject}"
                );
            }
        }
    }

    #[test]
    fn foreign_key_is_rejected() {
        let token = codec().issue("alice", t0()).unwrap();
        let other = TokenCodec::new(&SigningKey::from_secret(vec![8u8; 32]).unwrap());
        assert_eq!(other.verify(&token), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn structural_garbage_is_malformed() {
        let codec = codec();
        assert_eq!(codec.verify("not-a-token"), Err(TokenError::Malformed));
        assert_eq!(codec.verify("a.b"), Err(TokenError::Malformed));
        assert_eq!(codec.verify("%%%.%%%.%%%"), Err(TokenError::Malformed));
        assert_eq!(codec.extract_subject(""), Err(TokenError::Malformed));
    }

    #[test]
    fn other_algorithms_are_refused() {
        let key = SigningKey::from_secret(vec![9u8; 32]).unwrap();
        let claims = TokenClaims {
            sub: "alice".into(),
            iat: t0().timestamp(),
            exp: t0().timestamp() + 60,
        };
        let hs384 = encode(
            &Header::new(Algorithm::HS384),
            &claims,
            &EncodingKey::from_secret(key.as_bytes()),
        )
        .unwrap();
        assert_eq!(
            TokenCodec::new(&key).verify(&hs384),
            Err(TokenError::InvalidSignature)
        );
    }

    #[test]
    fn tokens_are_standard_jwts() {
        // A stock consumer with default validation accepts a fresh token.
        let key = SigningKey::from_secret(vec![9u8; 32]).unwrap();
        let token = TokenCodec::new(&key).issue("alice", Utc::now()).unwrap();
        let data = decode::<TokenClaims>(
            &token,
            &DecodingKey::from_secret(key.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )
        .unwrap();
        assert_eq!(data.claims.sub, "alice");
        assert_eq!(data.header.alg, Algorithm::HS256);
    }
}
