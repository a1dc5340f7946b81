// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use super::codec::TokenError;

/// Wire message shared by every token rejection.
const INVALID_OR_EXPIRED: &str = "Invalid or expired token";

/// Rejection produced by the request authentication filter.
///
/// `InvalidToken`, `UnknownSubject` and `TokenExpired` render identically on
/// the wire; the variant is kept so logs can tell them apart.
#[derive(Debug)]
pub enum AuthError {
    /// No authorization header present
    MissingAuthHeader,
    /// Header present but not `Bearer <token>`
    InvalidAuthHeader,
    /// Malformed token, bad signature, or subject/identity desync
    InvalidToken(String),
    /// Token subject no longer resolves to a player
    UnknownSubject(String),
    /// Correctly signed but past its expiry
    TokenExpired,
    /// Identity lookup failed for infrastructure reasons
    InternalError(String),
}

#[derive(Serialize)]
struct AuthErrorBody {
    error: String,
    error_code: String,
}

impl AuthError {
    /// Error code sent to the client.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingAuthHeader => "missing_auth_header",
            AuthError::InvalidAuthHeader => "invalid_auth_header",
            AuthError::InvalidToken(_)
            | AuthError::UnknownSubject(_)
            | AuthError::TokenExpired => "invalid_token",
            AuthError::InternalError(_) => "internal_error",
        }
    }

    /// Reason recorded in logs; finer grained than [`AuthError::error_code`].
    pub fn reason(&self) -> &'static str {
        match self {
            AuthError::MissingAuthHeader => "missing_auth_header",
            AuthError::InvalidAuthHeader => "invalid_auth_header",
            AuthError::InvalidToken(_) => "invalid_token",
            AuthError::UnknownSubject(_) => "unknown_subject",
            AuthError::TokenExpired => "token_expired",
            AuthError::InternalError(_) => "internal_error",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::UNAUTHORIZED,
        }
    }
}

impl From<TokenError> for AuthError {
    fn from(e: TokenError) -> Self {
        AuthError::InvalidToken(e.to_string())
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::MissingAuthHeader => write!(f, "Authorization header is required"),
            AuthError::InvalidAuthHeader => {
                write!(f, "Invalid authorization header format (expected 'Bearer <token>')")
            }
            AuthError::InvalidToken(_) | AuthError::UnknownSubject(_) | AuthError::TokenExpired => {
                write!(f, "{INVALID_OR_EXPIRED}")
            }
            AuthError::InternalError(msg) => write!(f, "Internal authentication error: {msg}"),
        }
    }
}

impl std::error::Error for AuthError {}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error = match &self {
            // Storage details stay in the logs.
            AuthError::InternalError(_) => "Internal authentication error".to_string(),
            other => other.to_string(),
        };
        let body = Json(AuthErrorBody {
            error,
            error_code: self.error_code().to_string(),
        });
        (status, body).into_response()
    }
}
