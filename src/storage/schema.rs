//! Database schema definitions

/// SQL schema for the database
///
/// `team_stints` identity uses a coalescing unique index rather than an
/// inline UNIQUE constraint: SQLite treats NULLs as distinct inside UNIQUE,
/// which would let a re-scrape duplicate rows whose note or end date is NULL.
pub const SCHEMA_SQL: &str = r#"
-- Resume cursors, one row per pipeline stage
CREATE TABLE IF NOT EXISTS checkpoints (
    key TEXT PRIMARY KEY,
    value TEXT,
    updated_utc TEXT
);

-- Scraped player profiles, keyed by wiki page title
CREATE TABLE IF NOT EXISTS players (
    page_title TEXT PRIMARY KEY,
    page_url TEXT,
    display_name TEXT,
    country TEXT,
    role TEXT,
    created_utc TEXT,
    updated_utc TEXT
);

-- Team history rows
CREATE TABLE IF NOT EXISTS team_stints (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    player_title TEXT NOT NULL REFERENCES players(page_title) ON DELETE CASCADE,
    team TEXT,
    joined TEXT,
    "left" TEXT,
    note TEXT,
    source_url TEXT,
    created_utc TEXT
);

CREATE UNIQUE INDEX IF NOT EXISTS idx_stints_identity ON team_stints(
    player_title,
    COALESCE(team, ''),
    COALESCE(joined, ''),
    COALESCE("left", ''),
    COALESCE(note, '')
);

CREATE INDEX IF NOT EXISTS idx_stints_player ON team_stints(player_title);

-- Derived per-player career aggregates, rebuilt in full by the careers stage
CREATE TABLE IF NOT EXISTS player_careers (
    player_title TEXT PRIMARY KEY REFERENCES players(page_title) ON DELETE CASCADE,
    career_start TEXT,
    career_end TEXT,
    career_days REAL,
    stints_count INTEGER,
    updated_utc TEXT
);
"#;

/// Initializes the database schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_schema_initializes() {
        let conn = Connection::open_in_memory().unwrap();
        assert!(initialize_schema(&conn).is_ok());
    }

    #[test]
    fn test_schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();

        initialize_schema(&conn).unwrap();
        assert!(initialize_schema(&conn).is_ok());
    }

    #[test]
    fn test_tables_exist_after_init() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();

        for table in ["checkpoints", "players", "team_stints", "player_careers"] {
            let count: i64 = conn
                .query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1",
                    [table],
                    |row| row.get(0),
                )
                .unwrap();
            assert_eq!(count, 1, "Table {} should exist", table);
        }
    }

    #[test]
    fn test_stint_identity_index_deduplicates_nulls() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();

        conn.execute(
            "INSERT INTO players(page_title) VALUES ('Faker')",
            [],
        )
        .unwrap();

        // note and left are NULL; the coalescing index must still collapse
        // the second insert
        for _ in 0..2 {
            conn.execute(
                "INSERT OR IGNORE INTO team_stints(player_title, team, joined, \"left\", note)
                 VALUES ('Faker', 'T1', '2014-12-02', NULL, NULL)",
                [],
            )
            .unwrap();
        }

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM team_stints", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }
}
