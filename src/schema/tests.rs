#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use rusqlite::Connection;
use std::path::PathBuf;
use tempfile::TempDir;

fn database(ddl: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("test.db");
    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(ddl).unwrap();
    (dir, path)
}

fn open(path: &std::path::Path) -> Box<dyn SchemaSource> {
    connect(&ConnectionConfig::sqlite(path.to_string_lossy())).unwrap()
}

#[test]
fn test_introspect_orders_tables_and_columns() {
    let (_dir, path) = database(
        "CREATE TABLE users (id INTEGER PRIMARY KEY NOT NULL, email VARCHAR(255) NOT NULL, age INT NULL);
         CREATE TABLE accounts (zeta TEXT, alpha TEXT);",
    );
    let tables = introspect(open(&path), &[]).unwrap();
    let names: Vec<_> = tables.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, ["accounts", "users"]);

    let accounts: Vec<_> = tables[0].columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(accounts, ["zeta", "alpha"]);

    let users = &tables[1];
    assert_eq!(
        users.columns[0],
        ColumnDescriptor {
            name: "id".into(),
            native_type: "bigint".into(),
            nullable: false,
            is_primary_key: true,
            max_length: None,
            default_value: None,
        }
    );
    assert_eq!(users.columns[1].native_type, "VARCHAR(255)");
    assert_eq!(users.columns[1].max_length, Some(255));
    assert!(!users.columns[1].nullable);
    assert!(users.columns[2].nullable);
    assert!(!users.columns[2].is_primary_key);
}

#[test]
fn test_introspect_foreign_keys_and_defaults() {
    let (_dir, path) = database(
        "CREATE TABLE users (id INTEGER PRIMARY KEY);
         CREATE TABLE orders (
             id INTEGER PRIMARY KEY,
             user_id INTEGER NOT NULL REFERENCES users(id),
             status TEXT NOT NULL DEFAULT 'new'
         );",
    );
    let tables = introspect(open(&path), &[]).unwrap();
    let orders = tables.iter().find(|t| t.name == "orders").unwrap();
    assert_eq!(
        orders.foreign_keys,
        vec![ForeignKey {
            column: "user_id".into(),
            referenced_table: "users".into(),
            referenced_column: Some("id".into()),
        }]
    );
    assert_eq!(orders.columns[2].default_value.as_deref(), Some("'new'"));
}

#[test]
fn test_introspect_table_filter() {
    let (_dir, path) = database("CREATE TABLE a (x INT); CREATE TABLE b (y INT);");
    let tables = introspect(open(&path), &["b".to_string()]).unwrap();
    assert_eq!(tables.len(), 1);
    assert_eq!(tables[0].name, "b");

    let err = introspect(open(&path), &["missing".to_string()]).unwrap_err();
    assert!(matches!(err, GenError::SchemaRead(_)));
}

#[test]
fn test_empty_schema_is_an_error() {
    let (_dir, path) = database("");
    let err = introspect(open(&path), &[]).unwrap_err();
    match err {
        GenError::SchemaRead(msg) => assert!(msg.contains("no tables")),
        other => panic!("expected SchemaRead, got {other:?}"),
    }
}

#[test]
fn test_missing_database_file_is_a_connection_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = ConnectionConfig::sqlite(dir.path().join("nope.db").to_string_lossy());
    match connect(&config) {
        Err(GenError::Connection { engine, .. }) => assert_eq!(engine, "sqlite"),
        Err(other) => panic!("expected Connection error, got {other:?}"),
        Ok(_) => panic!("expected Connection error"),
    }
}
