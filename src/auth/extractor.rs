// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractor for the authenticated principal.
//!
//! The auth filter has already validated the token by the time a handler
//! runs; this only reads the principal it attached.
//!
//! ```rust,ignore
//! async fn my_handler(Auth(principal): Auth) -> impl IntoResponse {
//!     // principal is AuthenticatedPrincipal
//! }
//! ```

use axum::{extract::FromRequestParts, http::request::Parts};

use super::{AuthError, AuthenticatedPrincipal};

/// Extractor for the current request's principal.
pub struct Auth(pub AuthenticatedPrincipal);

impl<S> FromRequestParts<S> for Auth
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedPrincipal>()
            .cloned()
            .map(Auth)
            .ok_or(AuthError::MissingAuthHeader)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::test_support::player;
    use axum::http::Request;

    fn parts() -> Parts {
        Request::builder()
            .uri("/test")
            .body(())
            .unwrap()
            .into_parts()
            .0
    }

    #[tokio::test]
    async fn reads_principal_from_extensions() {
        let mut parts = parts();
        let principal = AuthenticatedPrincipal::for_player(&player("alice", "a@x.com"));
        parts.extensions.insert(principal.clone());

        let Auth(found) = Auth::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(found, principal);
    }

    #[tokio::test]
    async fn rejects_without_principal() {
        let mut parts = parts();
        let result = Auth::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AuthError::MissingAuthHeader)));
    }
}
