// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use banana_game_server::{
    api::router,
    auth::{CredentialVerifier, KeySource, SigningKey},
    config::ServerConfig,
    logging::init_tracing,
    providers::PuzzleClient,
    state::AppState,
    storage::{Database, GameHistoryStore, IdentityStore, MemoryStore},
};
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() {
    let config = ServerConfig::from_env().expect("Invalid server configuration");
    init_tracing(config.json_logs);

    let key = SigningKey::from_env().expect("Failed to load JWT signing key");
    if key.source() == KeySource::Ephemeral {
        warn!("JWT_SECRET not set; tokens are signed with an ephemeral key and will not survive a restart");
    }

    let (identities, history): (Arc<dyn IdentityStore>, Arc<dyn GameHistoryStore>) =
        match config.database_path() {
            Some(path) => {
                let db = Arc::new(Database::open(&path).expect("Failed to open database"));
                info!(path = %path.display(), "Using redb storage");
                (db.clone(), db)
            }
            None => {
                let store = Arc::new(MemoryStore::new());
                warn!("DATA_DIR not set; players and history are kept in memory only");
                (store.clone(), store)
            }
        };

    let puzzles =
        PuzzleClient::new(config.puzzle_api_url.clone()).expect("Failed to build puzzle client");
    let state = AppState::new(identities, history, &key, CredentialVerifier::default(), puzzles)
        .expect("Failed to prepare password verifier");
    let app = router(state);

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .expect("Failed to bind listener");
    info!(addr = %config.bind_addr, "Banana game server listening (docs at /docs)");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("HTTP server failed");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
