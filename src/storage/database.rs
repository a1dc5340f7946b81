// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Embedded player database backed by redb (pure Rust, ACID).
//!
//! ## Table Layout
//!
//! - `players`: player_id → serialized Player
//! - `player_usernames`: username → player_id
//! - `player_emails`: email → player_id
//! - `game_history`: composite key (player_id|played_at_micros|entry_id) → serialized entry

use std::path::Path;

use redb::{ReadableDatabase, ReadableTable, TableDefinition};
use uuid::Uuid;

use super::{GameHistoryStore, IdentityStore, StorageError, StorageResult};
use crate::models::{GameHistoryEntry, Player};

// =============================================================================
// Table Definitions
// =============================================================================

/// Primary table: player_id → serialized Player (JSON bytes).
const PLAYERS: TableDefinition<&str, &[u8]> = TableDefinition::new("players");

/// Unique index: username → player_id.
const PLAYER_USERNAMES: TableDefinition<&str, &str> = TableDefinition::new("player_usernames");

/// Unique index: email → player_id.
const PLAYER_EMAILS: TableDefinition<&str, &str> = TableDefinition::new("player_emails");

/// History: `player_id|played_at_micros|entry_id` → serialized entry.
const GAME_HISTORY: TableDefinition<&str, &[u8]> = TableDefinition::new("game_history");

// =============================================================================
// Key Helpers
// =============================================================================

/// Zero-padded timestamp keeps a player's entries in chronological order.
fn history_key(entry: &GameHistoryEntry) -> String {
    format!(
        "{}|{:020}|{}",
        entry.player_id,
        entry.played_at.timestamp_micros().max(0),
        entry.id
    )
}

/// Half-open range covering every history key of one player.
/// `}` is the byte right after `|`.
fn history_range(player_id: Uuid) -> (String, String) {
    (format!("{player_id}|"), format!("{player_id}}}"))
}

// =============================================================================
// Database
// =============================================================================

pub struct Database {
    db: redb::Database,
}

impl Database {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let db = redb::Database::create(path)?;

        // Pre-create all tables so later read transactions don't fail
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(PLAYERS)?;
            let _ = write_txn.open_table(PLAYER_USERNAMES)?;
            let _ = write_txn.open_table(PLAYER_EMAILS)?;
            let _ = write_txn.open_table(GAME_HISTORY)?;
        }
        write_txn.commit()?;

        Ok(Self { db })
    }

    fn find_via_index(
        &self,
        index: TableDefinition<'static, &'static str, &'static str>,
        key: &str,
    ) -> StorageResult<Option<Player>> {
        let read_txn = self.db.begin_read()?;
        let index_table = read_txn.open_table(index)?;
        let player_id = match index_table.get(key)? {
            Some(id) => id.value().to_string(),
            None => return Ok(None),
        };
        let players = read_txn.open_table(PLAYERS)?;
        match players.get(player_id.as_str())? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }
}

impl IdentityStore for Database {
    fn find_by_username(&self, username: &str) -> StorageResult<Option<Player>> {
        self.find_via_index(PLAYER_USERNAMES, username)
    }

    fn find_by_email(&self, email: &str) -> StorageResult<Option<Player>> {
        self.find_via_index(PLAYER_EMAILS, email)
    }

    fn find_by_id(&self, id: Uuid) -> StorageResult<Option<Player>> {
        let read_txn = self.db.begin_read()?;
        let players = read_txn.open_table(PLAYERS)?;
        match players.get(id.to_string().as_str())? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    fn list(&self) -> StorageResult<Vec<Player>> {
        let read_txn = self.db.begin_read()?;
        let players = read_txn.open_table(PLAYERS)?;
        let mut result = Vec::new();
        for item in players.iter()? {
            let (_, value) = item?;
            result.push(serde_json::from_slice::<Player>(value.value())?);
        }
        result.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(result)
    }

    fn save(&self, player: Player) -> StorageResult<Player> {
        let id = player.id.to_string();
        let json = serde_json::to_vec(&player)?;

        let write_txn = self.db.begin_write()?;
        {
            let mut usernames = write_txn.open_table(PLAYER_USERNAMES)?;
            let mut emails = write_txn.open_table(PLAYER_EMAILS)?;
            let mut players = write_txn.open_table(PLAYERS)?;

            let taken = usernames.get(player.username.as_str())?.is_some()
                || emails.get(player.email.as_str())?.is_some()
                || players.get(id.as_str())?.is_some();
            if taken {
                // Dropping the transaction without commit aborts it.
                return Err(StorageError::AlreadyExists(format!(
                    "Player {}",
                    player.username
                )));
            }

            usernames.insert(player.username.as_str(), id.as_str())?;
            emails.insert(player.email.as_str(), id.as_str())?;
            players.insert(id.as_str(), json.as_slice())?;
        }
        write_txn.commit()?;
        Ok(player)
    }

    fn delete(&self, id: Uuid) -> StorageResult<bool> {
        let id = id.to_string();

        let write_txn = self.db.begin_write()?;
        let removed = {
            let mut players = write_txn.open_table(PLAYERS)?;
            let removed = players.remove(id.as_str())?.map(|v| v.value().to_vec());
            match removed {
                Some(bytes) => {
                    let player: Player = serde_json::from_slice(&bytes)?;
                    write_txn
                        .open_table(PLAYER_USERNAMES)?
                        .remove(player.username.as_str())?;
                    write_txn
                        .open_table(PLAYER_EMAILS)?
                        .remove(player.email.as_str())?;
                    true
                }
                None => false,
            }
        };
        write_txn.commit()?;
        Ok(removed)
    }
}

impl GameHistoryStore for Database {
    fn record(&self, entry: GameHistoryEntry) -> StorageResult<GameHistoryEntry> {
        let json = serde_json::to_vec(&entry)?;
        let key = history_key(&entry);

        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(GAME_HISTORY)?;
            table.insert(key.as_str(), json.as_slice())?;
        }
        write_txn.commit()?;
        Ok(entry)
    }

    fn list_for_player(&self, player_id: Uuid) -> StorageResult<Vec<GameHistoryEntry>> {
        let (start, end) = history_range(player_id);
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(GAME_HISTORY)?;

        let mut entries = Vec::new();
        for item in table.range(start.as_str()..end.as_str())? {
            let (_, value) = item?;
            entries.push(serde_json::from_slice(value.value())?);
        }
        Ok(entries)
    }
}
