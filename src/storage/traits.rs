//! Storage traits and error types

use crate::storage::{CareerRecord, PlayerRecord, StintRecord};
use chrono::NaiveDate;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for storage backend implementations
///
/// The pipeline only ever holds one implementation at a time; the trait
/// exists so tests can run against an in-memory database and so the
/// checkpointing contract is visible in one place.
pub trait Storage {
    // ===== Checkpoints =====

    /// Reads a stage's resume cursor
    fn get_checkpoint(&self, key: &str) -> StorageResult<Option<String>>;

    /// Upserts a stage's resume cursor, stamping the write time
    fn set_checkpoint(&mut self, key: &str, value: &str) -> StorageResult<()>;

    // ===== Players =====

    /// Inserts or updates a player profile; `created_utc` survives updates
    fn upsert_player(&mut self, player: &PlayerRecord) -> StorageResult<()>;

    fn get_player(&self, page_title: &str) -> StorageResult<Option<PlayerRecord>>;

    fn count_players(&self) -> StorageResult<u64>;

    // ===== Team stints =====

    /// Inserts a stint if no row with the same identity tuple exists
    fn insert_stint(&mut self, stint: &StintRecord) -> StorageResult<()>;

    fn count_stints(&self) -> StorageResult<u64>;

    fn count_stints_for(&self, page_title: &str) -> StorageResult<u64>;

    // ===== Per-item durability =====

    /// Persists one work item's effects and its cursor advance atomically:
    /// player upsert, stint inserts, and the checkpoint update commit in a
    /// single transaction. A crash mid-item therefore never leaves the
    /// cursor pointing past uncommitted writes.
    fn commit_player_item(
        &mut self,
        player: &PlayerRecord,
        stints: &[StintRecord],
        stage_key: &str,
        cursor: usize,
    ) -> StorageResult<()>;

    // ===== Derived careers =====

    /// Deletes and fully rebuilds `player_careers` from the current stints.
    /// An absent end date counts as ongoing as of `today`. Returns the number
    /// of career rows written.
    fn rebuild_careers(&mut self, today: NaiveDate) -> StorageResult<usize>;

    fn get_career(&self, page_title: &str) -> StorageResult<Option<CareerRecord>>;

    fn count_careers(&self) -> StorageResult<u64>;
}
