//! SQLite storage implementation

use crate::storage::schema::initialize_schema;
use crate::storage::traits::{Storage, StorageResult};
use crate::storage::{CareerRecord, PlayerRecord, StintRecord};
use chrono::{NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Opens (or creates) the database at the given path
    pub fn new(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }
}

fn now_utc() -> String {
    Utc::now().to_rfc3339()
}

// Write helpers shared by the trait methods and the per-item transaction.
// They take a plain Connection so a Transaction can deref into them.

fn set_checkpoint_sql(conn: &Connection, key: &str, value: &str) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO checkpoints(key, value, updated_utc) VALUES (?1, ?2, ?3)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_utc = excluded.updated_utc",
        params![key, value, now_utc()],
    )?;
    Ok(())
}

fn upsert_player_sql(conn: &Connection, player: &PlayerRecord) -> rusqlite::Result<()> {
    let now = now_utc();
    conn.execute(
        "INSERT INTO players(page_title, page_url, display_name, country, role, created_utc, updated_utc)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
         ON CONFLICT(page_title) DO UPDATE SET
           page_url = excluded.page_url,
           display_name = excluded.display_name,
           country = excluded.country,
           role = excluded.role,
           updated_utc = excluded.updated_utc",
        params![
            player.page_title,
            player.page_url,
            player.display_name,
            player.country,
            player.role,
            now,
        ],
    )?;
    Ok(())
}

fn insert_stint_sql(conn: &Connection, stint: &StintRecord) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT OR IGNORE INTO team_stints(player_title, team, joined, \"left\", note, source_url, created_utc)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            stint.player_title,
            stint.team,
            stint.joined,
            stint.left,
            stint.note,
            stint.source_url,
            now_utc(),
        ],
    )?;
    Ok(())
}

impl Storage for SqliteStorage {
    // ===== Checkpoints =====

    fn get_checkpoint(&self, key: &str) -> StorageResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM checkpoints WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set_checkpoint(&mut self, key: &str, value: &str) -> StorageResult<()> {
        set_checkpoint_sql(&self.conn, key, value)?;
        Ok(())
    }

    // ===== Players =====

    fn upsert_player(&mut self, player: &PlayerRecord) -> StorageResult<()> {
        upsert_player_sql(&self.conn, player)?;
        Ok(())
    }

    fn get_player(&self, page_title: &str) -> StorageResult<Option<PlayerRecord>> {
        let player = self
            .conn
            .query_row(
                "SELECT page_title, page_url, display_name, country, role
                 FROM players WHERE page_title = ?1",
                params![page_title],
                |row| {
                    Ok(PlayerRecord {
                        page_title: row.get(0)?,
                        page_url: row.get(1)?,
                        display_name: row.get(2)?,
                        country: row.get(3)?,
                        role: row.get(4)?,
                    })
                },
            )
            .optional()?;
        Ok(player)
    }

    fn count_players(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM players", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    // ===== Team stints =====

    fn insert_stint(&mut self, stint: &StintRecord) -> StorageResult<()> {
        insert_stint_sql(&self.conn, stint)?;
        Ok(())
    }

    fn count_stints(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM team_stints", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn count_stints_for(&self, page_title: &str) -> StorageResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM team_stints WHERE player_title = ?1",
            params![page_title],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    // ===== Per-item durability =====

    fn commit_player_item(
        &mut self,
        player: &PlayerRecord,
        stints: &[StintRecord],
        stage_key: &str,
        cursor: usize,
    ) -> StorageResult<()> {
        let tx = self.conn.transaction()?;

        upsert_player_sql(&tx, player)?;
        for stint in stints {
            insert_stint_sql(&tx, stint)?;
        }
        set_checkpoint_sql(&tx, stage_key, &cursor.to_string())?;

        tx.commit()?;
        Ok(())
    }

    // ===== Derived careers =====

    fn rebuild_careers(&mut self, today: NaiveDate) -> StorageResult<usize> {
        let today = today.to_string();
        let now = now_utc();

        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM player_careers", [])?;

        // Players whose stints carry no parsable joined date get no career row
        let written = tx.execute(
            "INSERT INTO player_careers(player_title, career_start, career_end, career_days, stints_count, updated_utc)
             SELECT
               player_title,
               MIN(joined),
               MAX(COALESCE(\"left\", ?1)),
               ROUND(julianday(MAX(COALESCE(\"left\", ?1))) - julianday(MIN(joined)), 1),
               COUNT(*),
               ?2
             FROM team_stints
             WHERE joined IS NOT NULL
             GROUP BY player_title",
            params![today, now],
        )?;

        tx.commit()?;
        Ok(written)
    }

    fn get_career(&self, page_title: &str) -> StorageResult<Option<CareerRecord>> {
        let career = self
            .conn
            .query_row(
                "SELECT player_title, career_start, career_end, career_days, stints_count
                 FROM player_careers WHERE player_title = ?1",
                params![page_title],
                |row| {
                    Ok(CareerRecord {
                        player_title: row.get(0)?,
                        career_start: row.get(1)?,
                        career_end: row.get(2)?,
                        career_days: row.get(3)?,
                        stints_count: row.get(4)?,
                    })
                },
            )
            .optional()?;
        Ok(career)
    }

    fn count_careers(&self) -> StorageResult<u64> {
        let count: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM player_careers", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}
