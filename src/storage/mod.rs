// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Storage Module
//!
//! Player identities and game history live behind two small traits so the
//! HTTP and auth layers never depend on a concrete backend.
//!
//! ## Backends
//!
//! - [`MemoryStore`]: process-local maps, used when `DATA_DIR` is unset and in tests
//! - [`Database`]: embedded redb file at `$DATA_DIR/banana.redb`
//!
//! ## Uniqueness
//!
//! `IdentityStore::save` enforces username and email uniqueness atomically,
//! so two concurrent registrations cannot both win.

pub mod database;
pub mod memory;

use uuid::Uuid;

use crate::models::{GameHistoryEntry, Player};

pub use database::Database;
pub use memory::MemoryStore;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("redb database error: {0}")]
    RedbDatabase(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    RedbTable(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("already exists: {0}")]
    AlreadyExists(String),

    #[error("storage lock poisoned")]
    Poisoned,
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Player identity persistence.
pub trait IdentityStore: Send + Sync {
    fn find_by_username(&self, username: &str) -> StorageResult<Option<Player>>;

    fn find_by_email(&self, email: &str) -> StorageResult<Option<Player>>;

    fn find_by_id(&self, id: Uuid) -> StorageResult<Option<Player>>;

    fn list(&self) -> StorageResult<Vec<Player>>;

    /// Insert a new player.
    ///
    /// Fails with [`StorageError::AlreadyExists`] if the username or email is
    /// taken; nothing is written in that case.
    fn save(&self, player: Player) -> StorageResult<Player>;

    /// Remove a player. Returns whether anything was removed.
    fn delete(&self, id: Uuid) -> StorageResult<bool>;
}

/// Game-history persistence.
pub trait GameHistoryStore: Send + Sync {
    fn record(&self, entry: GameHistoryEntry) -> StorageResult<GameHistoryEntry>;

    /// Entries for one player, oldest first.
    fn list_for_player(&self, player_id: Uuid) -> StorageResult<Vec<GameHistoryEntry>>;
}
