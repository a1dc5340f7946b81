// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::{middleware::require_auth, Capability},
    models::{
        CreateGameHistoryRequest, GameHistoryEntry, GameQuestion, LoginRequest, LoginResponse,
        PlayerResponse, RegisterRequest,
    },
    state::AppState,
};

pub mod game;
pub mod health;
pub mod players;

/// Build the application router.
///
/// Every route registered here sits behind [`require_auth`]; the filter's own
/// allow-list lets registration, login and the health probe through. The
/// Swagger UI and OpenAPI document are merged afterwards and stay public.
pub fn router(state: AppState) -> Router {
    let routes = Router::new()
        .route("/api/player/register", post(players::register))
        .route("/api/player/login", post(players::login))
        .route("/api/players", get(players::list_players))
        .route(
            "/api/player",
            get(players::get_player).delete(players::delete_player),
        )
        .route("/api/player/me", get(players::current_player))
        .route("/api/game", get(game::get_game))
        .route(
            "/api/game-history",
            get(game::get_game_history).post(game::add_game_history),
        )
        .route("/health", get(health::liveness))
        .layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .with_state(state);

    Router::new()
        .merge(routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(CorsLayer::permissive())
}

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        players::register,
        players::login,
        players::list_players,
        players::get_player,
        players::delete_player,
        players::current_player,
        game::get_game,
        game::add_game_history,
        game::get_game_history,
        health::liveness
    ),
    components(
        schemas(
            PlayerResponse,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            GameQuestion,
            GameHistoryEntry,
            CreateGameHistoryRequest,
            Capability,
            health::HealthResponse
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Players", description = "Registration, login and player records"),
        (name = "Games", description = "Puzzles and game history"),
        (name = "Health", description = "Liveness probe")
    )
)]
struct ApiDoc;
