use catalog_core::db::migrations::latest_version;
use catalog_core::db::{open_configured, open_db, open_db_in_memory, DbError};
use catalog_core::DatabaseTarget;
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "products");
    assert_index_exists(&conn, "idx_products_name");
    assert_index_exists(&conn, "idx_products_category");
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.db");

    let conn_first = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_first), latest_version());
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    assert_table_exists(&conn_second, "products");
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    assert!(err.to_string().contains("product store schema version 999"));
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn open_configured_supports_memory_and_file_targets() {
    let conn = open_configured(&DatabaseTarget::InMemory).unwrap();
    assert_table_exists(&conn, "products");

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("configured.db");
    let conn = open_configured(&DatabaseTarget::File(path.clone())).unwrap();
    assert_table_exists(&conn, "products");
    assert!(path.exists());
}

#[test]
fn schema_rejects_unknown_category_and_non_boolean_availability() {
    let conn = open_db_in_memory().unwrap();

    let bad_category = conn.execute(
        "INSERT INTO products (name, price, available, category)
         VALUES ('Hat', '1.00', 1, 'GADGETS');",
        [],
    );
    assert!(bad_category.is_err());

    let bad_available = conn.execute(
        "INSERT INTO products (name, price, available)
         VALUES ('Hat', '1.00', 2);",
        [],
    );
    assert!(bad_available.is_err());

    let defaults = conn.execute(
        "INSERT INTO products (name, price, available) VALUES ('Hat', '1.00', 0);",
        [],
    );
    assert_eq!(defaults.unwrap(), 1);
    let (description, category): (String, String) = conn
        .query_row(
            "SELECT description, category FROM products WHERE name = 'Hat';",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .unwrap();
    assert_eq!(description, "");
    assert_eq!(category, "UNKNOWN");
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    assert_schema_object(conn, "table", table_name);
}

fn assert_index_exists(conn: &Connection, index_name: &str) {
    assert_schema_object(conn, "index", index_name);
}

fn assert_schema_object(conn: &Connection, kind: &str, name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = ?1 AND name = ?2
            );",
            [kind, name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "{kind} {name} does not exist");
}
