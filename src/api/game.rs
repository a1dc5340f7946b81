// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Puzzle proxy and game-history endpoints.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    error::ApiError,
    models::{CreateGameHistoryRequest, GameHistoryEntry, GameHistoryQuery, GameQuestion},
    state::AppState,
};

#[utoipa::path(
    get,
    path = "/api/game",
    tag = "Games",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "A fresh puzzle", body = GameQuestion),
        (status = 502, description = "Puzzle API unavailable"),
    )
)]
pub async fn get_game(State(state): State<AppState>) -> Result<Json<GameQuestion>, ApiError> {
    Ok(Json(state.puzzles.fetch().await?))
}

#[utoipa::path(
    post,
    path = "/api/game-history",
    request_body = CreateGameHistoryRequest,
    tag = "Games",
    security(("bearer" = [])),
    responses((status = 201, body = GameHistoryEntry))
)]
pub async fn add_game_history(
    State(state): State<AppState>,
    Json(request): Json<CreateGameHistoryRequest>,
) -> Result<(StatusCode, Json<GameHistoryEntry>), ApiError> {
    let entry = GameHistoryEntry {
        id: Uuid::new_v4(),
        game_status: request.game_status,
        player_id: request.player_id,
        played_at: state.clock.now(),
    };
    let entry = state.history.record(entry)?;
    Ok((StatusCode::CREATED, Json(entry)))
}

#[utoipa::path(
    get,
    path = "/api/game-history",
    params(GameHistoryQuery),
    tag = "Games",
    security(("bearer" = [])),
    responses((status = 200, body = [GameHistoryEntry]))
)]
pub async fn get_game_history(
    State(state): State<AppState>,
    Query(query): Query<GameHistoryQuery>,
) -> Result<Json<Vec<GameHistoryEntry>>, ApiError> {
    Ok(Json(state.history.list_for_player(query.player_id)?))
}
