// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Stateless bearer-token authentication for the game API.
//!
//! ## Auth Flow
//!
//! 1. Client registers (`POST /api/player/register`) and logs in
//!    (`POST /api/player/login`), receiving an HS256 token valid 30 minutes
//! 2. Client sends `Authorization: Bearer <token>` on every other request
//! 3. The filter in [`middleware`]:
//!    - Verifies the HMAC signature with the process-wide [`SigningKey`]
//!    - Resolves the `sub` claim to a stored player
//!    - Checks expiry against the injected [`Clock`]
//!    - Attaches an [`AuthenticatedPrincipal`] to the request
//!
//! ## Security
//!
//! - No server-side sessions, refresh tokens or revocation list
//! - Passwords are bcrypt hashed at cost 12
//! - Login failures never reveal whether the username exists

pub mod claims;
pub mod clock;
pub mod codec;
pub mod error;
pub mod extractor;
pub mod keys;
pub mod middleware;
pub mod password;
pub mod roles;
pub mod service;

pub use claims::{AuthenticatedPrincipal, TokenClaims};
#[cfg(test)]
pub use clock::ManualClock;
pub use clock::{Clock, SystemClock};
pub use codec::{TokenCodec, TokenError, TOKEN_TTL_SECS};
pub use error::AuthError;
pub use extractor::Auth;
pub use keys::{KeySource, SigningKey};
pub use password::CredentialVerifier;
pub use roles::Capability;
pub use service::{AuthenticationService, ServiceError};
