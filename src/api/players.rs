// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Player registration, login and lookup endpoints.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    auth::Auth,
    error::ApiError,
    models::{LoginRequest, LoginResponse, PlayerIdQuery, PlayerResponse, RegisterRequest},
    state::AppState,
};

#[utoipa::path(
    post,
    path = "/api/player/register",
    request_body = RegisterRequest,
    tag = "Players",
    responses(
        (status = 201, description = "Player registered", body = PlayerResponse),
        (status = 409, description = "Username or email already exists"),
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<PlayerResponse>), ApiError> {
    let auth = state.auth.clone();
    let player = tokio::task::spawn_blocking(move || auth.register(request)).await??;
    Ok((StatusCode::CREATED, Json(player.into())))
}

#[utoipa::path(
    post,
    path = "/api/player/login",
    request_body = LoginRequest,
    tag = "Players",
    responses(
        (status = 200, description = "Token issued", body = LoginResponse),
        (status = 401, description = "Invalid username or password"),
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let auth = state.auth.clone();
    let now = state.clock.now();
    let issued =
        tokio::task::spawn_blocking(move || auth.login(&request.username, &request.password, now))
            .await??;
    Ok(Json(issued.into()))
}

#[utoipa::path(
    get,
    path = "/api/players",
    tag = "Players",
    security(("bearer" = [])),
    responses((status = 200, body = [PlayerResponse]))
)]
pub async fn list_players(
    State(state): State<AppState>,
) -> Result<Json<Vec<PlayerResponse>>, ApiError> {
    let players = state.identities.list()?;
    Ok(Json(players.into_iter().map(PlayerResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/player",
    params(PlayerIdQuery),
    tag = "Players",
    security(("bearer" = [])),
    responses(
        (status = 200, body = PlayerResponse),
        (status = 404, description = "Player not found"),
    )
)]
pub async fn get_player(
    State(state): State<AppState>,
    Query(query): Query<PlayerIdQuery>,
) -> Result<Json<PlayerResponse>, ApiError> {
    state
        .identities
        .find_by_id(query.id)?
        .map(|player| Json(player.into()))
        .ok_or_else(|| ApiError::not_found("Player not found"))
}

#[utoipa::path(
    delete,
    path = "/api/player",
    params(PlayerIdQuery),
    tag = "Players",
    security(("bearer" = [])),
    responses(
        (status = 204),
        (status = 404, description = "Player not found"),
    )
)]
pub async fn delete_player(
    State(state): State<AppState>,
    Query(query): Query<PlayerIdQuery>,
) -> Result<StatusCode, ApiError> {
    if state.identities.delete(query.id)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found("Player not found"))
    }
}

/// The authenticated player's own record.
#[utoipa::path(
    get,
    path = "/api/player/me",
    tag = "Players",
    security(("bearer" = [])),
    responses(
        (status = 200, body = PlayerResponse),
        (status = 401, description = "Unauthorized - invalid or missing token"),
    )
)]
pub async fn current_player(
    State(state): State<AppState>,
    Auth(principal): Auth,
) -> Result<Json<PlayerResponse>, ApiError> {
    state
        .identities
        .find_by_id(principal.player_id)?
        .map(|player| Json(player.into()))
        .ok_or_else(|| ApiError::not_found("Player not found"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthenticatedPrincipal;

    fn register_request(username: &str, email: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.into(),
            email: email.into(),
            password: "pw1".into(),
            first_name: None,
            middle_name: None,
            last_name: None,
        }
    }

    #[tokio::test]
    async fn register_returns_created_projection() {
        let state = AppState::for_tests();
        let (status, Json(player)) =
            register(State(state.clone()), Json(register_request("alice", "a@x.com")))
                .await
                .expect("registration succeeds");

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(player.username, "alice");
        assert!(state.identities.find_by_id(player.id).unwrap().is_some());
    }

    #[tokio::test]
    async fn duplicate_register_is_conflict() {
        let state = AppState::for_tests();
        register(State(state.clone()), Json(register_request("alice", "a@x.com")))
            .await
            .unwrap();

        let err = register(State(state), Json(register_request("alice", "a2@x.com")))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn delete_then_get_is_not_found() {
        let state = AppState::for_tests();
        let (_, Json(player)) =
            register(State(state.clone()), Json(register_request("alice", "a@x.com")))
                .await
                .unwrap();

        let status = delete_player(State(state.clone()), Query(PlayerIdQuery { id: player.id }))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::NO_CONTENT);

        let err = get_player(State(state.clone()), Query(PlayerIdQuery { id: player.id }))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);

        let err = delete_player(State(state), Query(PlayerIdQuery { id: player.id }))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn current_player_reads_principal() {
        let state = AppState::for_tests();
        register(State(state.clone()), Json(register_request("alice", "a@x.com")))
            .await
            .unwrap();
        let stored = state.identities.find_by_username("alice").unwrap().unwrap();
        let principal = AuthenticatedPrincipal::for_player(&stored);

        let Json(me) = current_player(State(state), Auth(principal)).await.unwrap();
        assert_eq!(me.id, stored.id);
        assert_eq!(me.email, "a@x.com");
    }
}
