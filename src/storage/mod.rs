//! Storage layer
//!
//! SQLite-backed persistence behind a trait so the pipeline can be tested
//! against an in-memory database. All writes are idempotent: players upsert,
//! stints insert-if-absent on their identity tuple, careers rebuild from
//! scratch. Checkpoints live in the same database so an item's effects and
//! its cursor advance can commit in one transaction.

mod schema;
mod sqlite;
mod traits;

pub use schema::initialize_schema;
pub use sqlite::SqliteStorage;
pub use traits::{Storage, StorageError, StorageResult};

/// Profile row for the players table, keyed by page title
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerRecord {
    pub page_title: String,
    pub page_url: String,
    pub display_name: Option<String>,
    pub country: Option<String>,
    pub role: Option<String>,
}

/// One team-history row
///
/// Identity is the (player, team, joined, left, note) tuple; inserting the
/// same tuple twice stores one row.
#[derive(Debug, Clone, PartialEq)]
pub struct StintRecord {
    pub player_title: String,
    pub team: Option<String>,
    pub joined: Option<String>,
    pub left: Option<String>,
    pub note: Option<String>,
    pub source_url: Option<String>,
}

/// Derived career aggregate, fully recomputed on each aggregation run
#[derive(Debug, Clone, PartialEq)]
pub struct CareerRecord {
    pub player_title: String,
    pub career_start: Option<String>,
    pub career_end: Option<String>,
    pub career_days: Option<f64>,
    pub stints_count: i64,
}
