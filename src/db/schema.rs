//! SQL DDL for all spindle tables.
//!
//! Defines the `categories`, `items`, `review_log`, and `schema_meta` tables. All
//! DDL uses `IF NOT EXISTS` for idempotent initialization. Columns added after
//! schema version 1 live in [`super::migrations`].

use rusqlite::Connection;

/// All schema DDL statements for the v1 tables.
const SCHEMA_SQL: &str = r#"
-- Categories, keyed by reconciled id; name is the rescan identity
CREATE TABLE IF NOT EXISTS categories (
    id INTEGER PRIMARY KEY CHECK(id > 0),
    name TEXT NOT NULL UNIQUE,
    last_viewed TEXT
);

-- Items, ids are unique within their category
CREATE TABLE IF NOT EXISTS items (
    category_id INTEGER NOT NULL REFERENCES categories(id) ON DELETE CASCADE,
    id INTEGER NOT NULL CHECK(id > 0),
    position INTEGER NOT NULL,
    title TEXT NOT NULL,
    media_ref TEXT,
    views INTEGER NOT NULL DEFAULT 0 CHECK(views >= 0),
    last_viewed TEXT,
    PRIMARY KEY (category_id, id)
);

CREATE INDEX IF NOT EXISTS idx_items_views ON items(category_id, views);

-- Audit log
CREATE TABLE IF NOT EXISTS review_log (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    operation TEXT NOT NULL CHECK(operation IN ('sync','review','complete')),
    category_id INTEGER,
    details TEXT,
    created_at TEXT NOT NULL
);

-- Schema metadata
CREATE TABLE IF NOT EXISTS schema_meta (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
"#;

/// Initialize all schema tables. Idempotent (uses IF NOT EXISTS).
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)?;

    // Set initial schema version if not already present
    conn.execute(
        "INSERT OR IGNORE INTO schema_meta (key, value) VALUES ('schema_version', '1')",
        [],
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_creates_all_tables() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();

        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();

        assert!(tables.contains(&"categories".to_string()));
        assert!(tables.contains(&"items".to_string()));
        assert!(tables.contains(&"review_log".to_string()));
        assert!(tables.contains(&"schema_meta".to_string()));
    }

    #[test]
    fn schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        init_schema(&conn).unwrap(); // second call should not error
    }

    #[test]
    fn negative_views_are_rejected() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        conn.execute("INSERT INTO categories (id, name) VALUES (1, 'c')", [])
            .unwrap();

        let result = conn.execute(
            "INSERT INTO items (category_id, id, position, title, views) VALUES (1, 1, 0, 't', -1)",
            [],
        );
        assert!(result.is_err());
    }
}
