use quicklist_core::db::{SchemaError, Store};
use rusqlite::Connection;

#[test]
fn open_in_memory_creates_items_table() {
    let store = Store::open_in_memory().unwrap();
    assert!(store.table_exists("items").unwrap());
    assert!(!store.table_exists("tags").unwrap());
}

#[test]
fn initialize_twice_is_idempotent() {
    let store = Store::open_in_memory().unwrap();

    store.initialize().unwrap();
    store.initialize().unwrap();

    let tables: Vec<String> = store
        .query(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name = 'items';",
            [],
            |row| Ok(row.get(0)?),
        )
        .unwrap();
    assert_eq!(tables, vec!["items".to_string()]);
}

#[test]
fn reopening_file_keeps_existing_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("quicklist.db");

    let store = Store::open(&path).unwrap();
    store
        .execute("INSERT INTO items (text) VALUES (?1);", ["kept"])
        .unwrap();
    drop(store);

    let reopened = Store::open(&path).unwrap();
    let texts: Vec<String> = reopened
        .query("SELECT text FROM items;", [], |row| Ok(row.get(0)?))
        .unwrap();
    assert_eq!(texts, vec!["kept".to_string()]);
}

#[test]
fn opening_existing_file_with_items_table_does_not_fail() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("legacy.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(
        "CREATE TABLE items (id INTEGER PRIMARY KEY AUTOINCREMENT, text TEXT);
         INSERT INTO items (text) VALUES ('from before');",
    )
    .unwrap();
    drop(conn);

    let store = Store::open(&path).unwrap();
    let count: Vec<i64> = store
        .query("SELECT COUNT(*) FROM items;", [], |row| Ok(row.get(0)?))
        .unwrap();
    assert_eq!(count, vec![1]);
}

#[test]
fn open_reports_schema_error_for_unopenable_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing-dir").join("quicklist.db");

    let err = Store::open(&path).err().expect("open should fail");
    assert!(matches!(err, SchemaError::Open(_)));
}

#[test]
fn execute_reports_rows_affected_and_rolls_back_on_error() {
    let store = Store::open_in_memory().unwrap();

    let inserted = store
        .execute("INSERT INTO items (text) VALUES (?1);", ["a"])
        .unwrap();
    assert_eq!(inserted, 1);

    let missing = store
        .execute("UPDATE items SET text = ?1 WHERE id = ?2;", rusqlite::params!["b", 99])
        .unwrap();
    assert_eq!(missing, 0);

    let failed = store.with_transaction(|tx| {
        tx.execute("INSERT INTO items (text) VALUES (?1);", ["partial"])?;
        tx.execute("INSERT INTO no_such_table (text) VALUES (?1);", ["boom"])?;
        Ok(())
    });
    assert!(failed.is_err());

    let texts: Vec<String> = store
        .query("SELECT text FROM items;", [], |row| Ok(row.get(0)?))
        .unwrap();
    assert_eq!(texts, vec!["a".to_string()]);
}
