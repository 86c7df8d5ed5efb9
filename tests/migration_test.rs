mod helpers;

use spindle::db;
use spindle::db::migrations::{get_schema_version, has_column, run_migrations, CURRENT_SCHEMA_VERSION};

#[test]
fn fresh_db_migrates_to_current_version() {
    let conn = helpers::test_db();
    assert_eq!(get_schema_version(&conn).unwrap(), CURRENT_SCHEMA_VERSION);
}

#[test]
fn migration_adds_completed_flag() {
    let conn = helpers::test_db();
    assert!(has_column(&conn, "categories", "completed").unwrap());
}

#[test]
fn migrations_are_idempotent() {
    let conn = helpers::test_db();
    run_migrations(&conn).unwrap();
    assert_eq!(get_schema_version(&conn).unwrap(), CURRENT_SCHEMA_VERSION);
}

#[test]
fn manual_v1_db_upgrades_correctly() {
    // A v1 database that hasn't been migrated
    let conn = rusqlite::Connection::open_in_memory().unwrap();
    conn.pragma_update(None, "foreign_keys", "ON").unwrap();
    db::schema::init_schema(&conn).unwrap();
    conn.execute("INSERT INTO categories (id, name) VALUES (1, 'old')", []).unwrap();

    assert_eq!(get_schema_version(&conn).unwrap(), 1);
    assert!(!has_column(&conn, "categories", "completed").unwrap());

    run_migrations(&conn).unwrap();

    assert_eq!(get_schema_version(&conn).unwrap(), CURRENT_SCHEMA_VERSION);
    let completed: i64 = conn
        .query_row("SELECT completed FROM categories WHERE id = 1", [], |row| row.get(0))
        .unwrap();
    assert_eq!(completed, 0, "existing rows default to not completed");
}

#[test]
fn open_database_creates_file_and_parent_dirs() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("material.db");

    let conn = db::open_database(&path).unwrap();

    assert!(path.exists());
    let timeout: i64 = conn.query_row("PRAGMA busy_timeout", [], |row| row.get(0)).unwrap();
    assert_eq!(timeout, 5000);
    let fk: i64 = conn.query_row("PRAGMA foreign_keys", [], |row| row.get(0)).unwrap();
    assert_eq!(fk, 1);
}

#[test]
fn health_check_reports_counts() {
    let conn = helpers::test_db();
    conn.execute("INSERT INTO categories (id, name) VALUES (1, 'a')", []).unwrap();
    conn.execute(
        "INSERT INTO items (category_id, id, position, title) VALUES (1, 1, 0, 'x')",
        [],
    )
    .unwrap();

    let report = db::check_database_health(&conn).unwrap();

    assert_eq!(report.schema_version, CURRENT_SCHEMA_VERSION);
    assert_eq!(report.category_count, 1);
    assert_eq!(report.item_count, 1);
    assert_eq!(report.log_count, 0);
    assert!(report.integrity_ok);
}
