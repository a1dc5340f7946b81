// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Environment variable names, defaults, and the startup settings read from
//! them.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `JWT_SECRET` | Base64 HMAC secret (≥ 32 bytes decoded) | Ephemeral key generated at startup |
//! | `DATA_DIR` | Directory holding `banana.redb` | In-memory storage |
//! | `PUZZLE_API_URL` | Upstream puzzle endpoint | `https://marcconrad.com/uob/banana/api.php?out=json` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::net::SocketAddr;
use std::path::PathBuf;

use url::Url;

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";

/// Environment variable holding the base64-encoded token signing secret.
///
/// When unset a random key is generated at startup and every token becomes
/// invalid on restart.
pub const JWT_SECRET_ENV: &str = "JWT_SECRET";

/// Environment variable name for the data directory path.
pub const DATA_DIR_ENV: &str = "DATA_DIR";

pub const PUZZLE_API_URL_ENV: &str = "PUZZLE_API_URL";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_PUZZLE_API_URL: &str = "https://marcconrad.com/uob/banana/api.php?out=json";
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

/// Database file name inside `DATA_DIR`.
pub const DATABASE_FILE: &str = "banana.redb";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid bind address {0}")]
    BindAddress(String),

    #[error("invalid PUZZLE_API_URL: {0}")]
    PuzzleUrl(#[from] url::ParseError),
}

/// Settings read once at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// `None` selects in-memory storage
    pub data_dir: Option<PathBuf>,
    pub puzzle_api_url: Url,
    pub json_logs: bool,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup (tests pass a map).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = lookup(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port: u16 = lookup(PORT_ENV)
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);
        let bind_addr = format!("{host}:{port}")
            .parse()
            .map_err(|_| ConfigError::BindAddress(format!("{host}:{port}")))?;

        let data_dir = lookup(DATA_DIR_ENV)
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from);

        let puzzle_api_url = Url::parse(
            &lookup(PUZZLE_API_URL_ENV).unwrap_or_else(|| DEFAULT_PUZZLE_API_URL.to_string()),
        )?;

        let json_logs = lookup(LOG_FORMAT_ENV)
            .map(|f| f.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        Ok(Self {
            bind_addr,
            data_dir,
            puzzle_api_url,
            json_logs,
        })
    }

    /// Path of the redb file, if persistent storage is configured.
    pub fn database_path(&self) -> Option<PathBuf> {
        self.data_dir.as_ref().map(|dir| dir.join(DATABASE_FILE))
    }
}
