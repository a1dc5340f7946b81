// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Per-request authentication filter.
//!
//! ## Pipeline
//!
//! 1. Allow-listed paths pass through unauthenticated.
//! 2. A request that already carries a principal is left alone.
//! 3. `Authorization: Bearer <token>` is required; absent or another scheme
//!    is rejected here with 401.
//! 4. The token signature is checked and its subject extracted.
//! 5. The subject must resolve to a stored player.
//! 6. The token must not be expired at the injected clock's `now`.
//! 7. The subject must equal the resolved player's username.
//!
//! On success an [`AuthenticatedPrincipal`] is inserted into the request's
//! extensions and the next stage runs. Any rejection short-circuits with a
//! 401 response; nothing downstream executes.

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, Extensions, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use super::{AuthError, AuthenticatedPrincipal, TokenCodec};
use crate::state::AppState;
use crate::storage::IdentityStore;

/// Paths reachable without a token.
pub const PUBLIC_PATHS: &[&str] = &["/api/player/register", "/api/player/login", "/health"];

/// Terminal state of a request that was allowed through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterOutcome {
    /// Allow-listed path; no authentication attempted
    Passthrough,
    /// A principal was already attached earlier in the pipeline
    AlreadyAuthenticated,
    /// Token validated; principal to attach
    Validated(AuthenticatedPrincipal),
}

pub fn is_public_path(path: &str) -> bool {
    PUBLIC_PATHS.contains(&path)
}

/// Strip the `Bearer ` scheme from the authorization header.
fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingAuthHeader)?
        .to_str()
        .map_err(|_| AuthError::InvalidAuthHeader)?;

    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .ok_or(AuthError::InvalidAuthHeader)
}

/// Steps 1 and 2: outcomes that need no token.
fn skip_check(path: &str, extensions: &Extensions) -> Option<FilterOutcome> {
    if is_public_path(path) {
        Some(FilterOutcome::Passthrough)
    } else if extensions.get::<AuthenticatedPrincipal>().is_some() {
        Some(FilterOutcome::AlreadyAuthenticated)
    } else {
        None
    }
}

/// Steps 3 to 7. Blocking: the identity lookup may hit the database.
fn validate_bearer(
    headers: &HeaderMap,
    identities: &dyn IdentityStore,
    codec: &TokenCodec,
    now: DateTime<Utc>,
) -> Result<AuthenticatedPrincipal, AuthError> {
    let token = bearer_token(headers)?;

    // Verifies the signature; the claims are reused for the expiry check.
    let claims = codec.verify(token)?;

    let player = identities
        .find_by_username(&claims.sub)
        .map_err(|e| AuthError::InternalError(e.to_string()))?
        .ok_or_else(|| AuthError::UnknownSubject(claims.sub.clone()))?;

    if TokenCodec::is_expired(&claims, now) {
        return Err(AuthError::TokenExpired);
    }

    if claims.sub != player.username {
        return Err(AuthError::InvalidToken(
            "subject does not match resolved identity".to_string(),
        ));
    }

    Ok(AuthenticatedPrincipal::for_player(&player))
}

/// Axum middleware running the pipeline above.
///
/// The token check runs on the blocking pool, like bcrypt in the login
/// handler, since the identity store is synchronous.
///
/// ```rust,ignore
/// let app = Router::new()
///     .route("/api/players", get(list_players))
///     .layer(axum::middleware::from_fn_with_state(state.clone(), require_auth));
/// ```
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let outcome = match skip_check(request.uri().path(), request.extensions()) {
        Some(outcome) => Ok(outcome),
        None => {
            let now = state.clock.now();
            let headers = request.headers().clone();
            let identities = state.identities.clone();
            let codec = state.codec.clone();
            tokio::task::spawn_blocking(move || {
                validate_bearer(&headers, identities.as_ref(), &codec, now)
            })
            .await
            .unwrap_or_else(|e| Err(AuthError::InternalError(e.to_string())))
            .map(FilterOutcome::Validated)
        }
    };

    match outcome {
        Ok(FilterOutcome::Validated(principal)) => {
            debug!(username = %principal.username, "request authenticated");
            request.extensions_mut().insert(principal);
            next.run(request).await
        }
        Ok(FilterOutcome::Passthrough | FilterOutcome::AlreadyAuthenticated) => {
            next.run(request).await
        }
        Err(e) => {
            warn!(
                path = %request.uri().path(),
                reason = e.reason(),
                detail = ?e,
                "request rejected"
            );
            e.into_response()
        }
    }
}
