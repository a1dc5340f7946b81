// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory store for development and tests. Contents die with the process.

use std::collections::HashMap;
use std::sync::RwLock;

use uuid::Uuid;

use super::{GameHistoryStore, IdentityStore, StorageError, StorageResult};
use crate::models::{GameHistoryEntry, Player};

#[derive(Default)]
struct Inner {
    players: HashMap<Uuid, Player>,
    history: Vec<GameHistoryEntry>,
}

#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StorageResult<std::sync::RwLockReadGuard<'_, Inner>> {
        self.inner.read().map_err(|_| StorageError::Poisoned)
    }

    fn write(&self) -> StorageResult<std::sync::RwLockWriteGuard<'_, Inner>> {
        self.inner.write().map_err(|_| StorageError::Poisoned)
    }
}

impl IdentityStore for MemoryStore {
    fn find_by_username(&self, username: &str) -> StorageResult<Option<Player>> {
        Ok(self
            .read()?
            .players
            .values()
            .find(|player| player.username == username)
            .cloned())
    }

    fn find_by_email(&self, email: &str) -> StorageResult<Option<Player>> {
        Ok(self
            .read()?
            .players
            .values()
            .find(|player| player.email == email)
            .cloned())
    }

    fn find_by_id(&self, id: Uuid) -> StorageResult<Option<Player>> {
        Ok(self.read()?.players.get(&id).cloned())
    }

    fn list(&self) -> StorageResult<Vec<Player>> {
        let mut players: Vec<Player> = self.read()?.players.values().cloned().collect();
        players.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(players)
    }

    fn save(&self, player: Player) -> StorageResult<Player> {
        let mut inner = self.write()?;
        let taken = inner.players.values().any(|existing| {
            existing.username == player.username || existing.email == player.email
        });
        if taken || inner.players.contains_key(&player.id) {
            return Err(StorageError::AlreadyExists(format!("Player {}", player.username)));
        }
        inner.players.insert(player.id, player.clone());
        Ok(player)
    }

    fn delete(&self, id: Uuid) -> StorageResult<bool> {
        Ok(self.write()?.players.remove(&id).is_some())
    }
}

impl GameHistoryStore for MemoryStore {
    fn record(&self, entry: GameHistoryEntry) -> StorageResult<GameHistoryEntry> {
        self.write()?.history.push(entry.clone());
        Ok(entry)
    }

    fn list_for_player(&self, player_id: Uuid) -> StorageResult<Vec<GameHistoryEntry>> {
        let mut entries: Vec<GameHistoryEntry> = self
            .read()?
            .history
            .iter()
            .filter(|entry| entry.player_id == player_id)
            .cloned()
            .collect();
        entries.sort_by_key(|entry| entry.played_at);
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::test_support::{history_contract, identity_contract};

    #[test]
    fn satisfies_identity_contract() {
        identity_contract(&MemoryStore::new());
    }

    #[test]
    fn satisfies_history_contract() {
        history_contract(&MemoryStore::new());
    }
}
