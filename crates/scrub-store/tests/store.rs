//! Integration tests for the SQLite store.

use polars::prelude::{Column, DataFrame, DataType, IntoColumn, NamedFrom, Series};
use tempfile::TempDir;

use scrub_store::{IfExists, SqliteStore, StoreError};

fn sample_df() -> DataFrame {
    let columns: Vec<Column> = vec![
        Series::new("id".into(), &[1i64, 2, 3, 4, 5]).into_column(),
        Series::new("name".into(), &["Alice", "Bob", "Charlie", "David", "Eve"]).into_column(),
        Series::new("value".into(), &[10.5f64, 20.3, 15.7, 30.2, 25.1]).into_column(),
        Series::new("active".into(), &[Some(true), Some(false), None, Some(true), Some(true)])
            .into_column(),
    ];
    DataFrame::new(columns).unwrap()
}

fn connected() -> SqliteStore {
    let mut store = SqliteStore::in_memory();
    store.connect().unwrap();
    store
}

#[test]
fn connect_and_close_are_idempotent() {
    let mut store = SqliteStore::in_memory();
    store.connect().unwrap();
    store.connect().unwrap();
    assert!(store.is_connected());
    store.close().unwrap();
    store.close().unwrap();
    assert!(!store.is_connected());
}

#[test]
fn file_backed_store_creates_database() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("test.sqlite");
    let store = SqliteStore::open(&path).unwrap();
    assert!(store.is_connected());
    assert!(path.exists());
}

#[test]
fn every_operation_requires_connection() {
    let mut store = SqliteStore::in_memory();
    let df = sample_df();
    assert!(matches!(
        store.save_table(&df, "t", IfExists::Replace),
        Err(StoreError::NotConnected)
    ));
    assert!(matches!(store.load_table("t", None), Err(StoreError::NotConnected)));
    assert!(matches!(store.query("SELECT 1"), Err(StoreError::NotConnected)));
    assert!(matches!(store.execute("SELECT 1"), Err(StoreError::NotConnected)));
    assert!(matches!(store.list_tables(), Err(StoreError::NotConnected)));
}

#[test]
fn save_and_load_preserves_shape_and_types() {
    let mut store = connected();
    let df = sample_df();
    assert_eq!(store.save_table(&df, "people", IfExists::Replace).unwrap(), 5);

    let loaded = store.load_table("people", None).unwrap();
    assert_eq!(loaded.shape(), df.shape());
    assert_eq!(loaded.get_column_names(), df.get_column_names());
    assert_eq!(loaded.column("id").unwrap().dtype(), &DataType::Int64);
    assert_eq!(loaded.column("value").unwrap().dtype(), &DataType::Float64);
    assert_eq!(loaded.column("active").unwrap().dtype(), &DataType::Boolean);
    assert!(loaded.equals_missing(&df));
}

#[test]
fn load_with_limit() {
    let mut store = connected();
    store.save_table(&sample_df(), "people", IfExists::Replace).unwrap();
    let loaded = store.load_table("people", Some(2)).unwrap();
    assert_eq!(loaded.height(), 2);
}

#[test]
fn replace_overwrites_table() {
    let mut store = connected();
    store.save_table(&sample_df(), "people", IfExists::Replace).unwrap();
    let replacement = DataFrame::new(vec![
        Series::new("id".into(), &[10i64]).into_column(),
        Series::new("name".into(), &["New"]).into_column(),
    ])
    .unwrap();
    store.save_table(&replacement, "people", IfExists::Replace).unwrap();
    let loaded = store.load_table("people", None).unwrap();
    assert_eq!(loaded.shape(), (1, 2));
}

#[test]
fn append_adds_rows() {
    let mut store = connected();
    store.save_table(&sample_df(), "people", IfExists::Replace).unwrap();
    store.save_table(&sample_df(), "people", IfExists::Append).unwrap();
    assert_eq!(store.load_table("people", None).unwrap().height(), 10);
}

#[test]
fn fail_policy_leaves_table_untouched() {
    let mut store = connected();
    store.save_table(&sample_df(), "people", IfExists::Replace).unwrap();
    let err = store
        .save_table(&sample_df(), "people", IfExists::Fail)
        .unwrap_err();
    assert!(matches!(err, StoreError::TableExists { ref table } if table == "people"));
    assert_eq!(store.load_table("people", None).unwrap().height(), 5);
}

#[test]
fn query_and_execute() {
    let mut store = connected();
    store.save_table(&sample_df(), "people", IfExists::Replace).unwrap();
    let result = store
        .query("SELECT name, value FROM people WHERE value > 20 ORDER BY value")
        .unwrap();
    assert_eq!(result.height(), 3);
    let names: Vec<Option<&str>> = result
        .column("name")
        .unwrap()
        .str()
        .unwrap()
        .into_iter()
        .collect();
    assert_eq!(names, vec![Some("Bob"), Some("Eve"), Some("David")]);

    store.execute("DELETE FROM people WHERE id > 1").unwrap();
    assert_eq!(store.load_table("people", None).unwrap().height(), 1);
}

#[test]
fn list_tables_in_name_order() {
    let mut store = connected();
    store.save_table(&sample_df(), "zeta", IfExists::Replace).unwrap();
    store.save_table(&sample_df(), "alpha", IfExists::Replace).unwrap();
    assert_eq!(store.list_tables().unwrap(), vec!["alpha", "zeta"]);
    assert!(store.has_table("alpha").unwrap());
}

#[test]
fn missing_table_is_reported() {
    let store = connected();
    assert!(matches!(
        store.load_table("ghost", None),
        Err(StoreError::TableNotFound { .. })
    ));
}

#[test]
fn data_survives_reconnect() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("data.sqlite");
    let mut store = SqliteStore::open(&path).unwrap();
    store.save_table(&sample_df(), "people", IfExists::Replace).unwrap();
    store.close().unwrap();

    let reopened = SqliteStore::open(&path).unwrap();
    assert_eq!(reopened.load_table("people", None).unwrap().height(), 5);
}
