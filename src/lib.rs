// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Banana Game server
//!
//! HTTP backend for the banana puzzle game: player accounts, stateless
//! bearer-token authentication, a proxy for the upstream puzzle API and a
//! per-player game history.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Token codec, password hashing, login service and request filter
//! - `providers` - Upstream puzzle API client
//! - `storage` - Player and game-history stores (in-memory and redb)

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod providers;
pub mod state;
pub mod storage;
