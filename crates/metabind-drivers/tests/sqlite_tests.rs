#![cfg(feature = "sqlite")]

//! Integration tests for metadata loading against real SQLite databases
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use metabind_core::{
    Connection, DataSource, DatabaseType, Result, SchemaMetadataLoader, TableLookup,
    TableMetadataLoader,
};
use metabind_drivers::sqlite::SqliteConnection;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

/// Opens a fresh connection to one database file per request
struct FileDataSource {
    path: PathBuf,
    opened: AtomicUsize,
}

impl FileDataSource {
    fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }
}

impl DataSource for FileDataSource {
    fn get_connection(&self) -> Result<Box<dyn Connection + '_>> {
        self.opened.fetch_add(1, Ordering::SeqCst);
        let conn = SqliteConnection::open(self.path.to_str().expect("utf-8 path"))?;
        Ok(Box::new(conn))
    }
}

/// Initialize logging for tests if not already initialized
fn initialize_logging() {
    use std::sync::Once;
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("metabind=debug")),
            )
            .with_test_writer()
            .finish();

        let _ = tracing::subscriber::set_global_default(subscriber);
    });
}

/// Helper to create a test database with sample tables
fn setup_test_database() -> (TempDir, FileDataSource) {
    initialize_logging();
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("metabind_test.db");
    let conn = SqliteConnection::open(path.to_str().unwrap()).expect("create test database");

    conn.execute_batch(
        r#"
        CREATE TABLE users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            username TEXT NOT NULL UNIQUE,
            email VARCHAR(255) NOT NULL,
            balance REAL DEFAULT 0.0
        );
        CREATE TABLE orders (
            id INTEGER PRIMARY KEY,
            total DECIMAL(10,2) NOT NULL
        );
        CREATE INDEX idx_total ON orders(total);
        CREATE TABLE order_lines (
            order_id INTEGER NOT NULL REFERENCES orders(id),
            line INTEGER NOT NULL,
            sku TEXT NOT NULL,
            PRIMARY KEY (order_id, line)
        );
        CREATE INDEX idx_lines_sku ON order_lines(sku);
        CREATE INDEX idx_lines_sku_line ON order_lines(sku, line);
        CREATE VIEW order_totals AS SELECT id, total FROM orders;
        "#,
    )
    .expect("setup schema");
    conn.close().expect("close setup connection");

    let data_source = FileDataSource {
        path,
        opened: AtomicUsize::new(0),
    };
    (dir, data_source)
}

#[test]
fn test_load_existing_table() {
    let (_dir, data_source) = setup_test_database();

    let lookup = TableMetadataLoader::load(&data_source, "orders", DatabaseType::Sqlite)
        .expect("load orders");

    let TableLookup::Found(table) = lookup else {
        panic!("orders should exist");
    };
    assert_eq!(table.column_names().collect::<Vec<_>>(), vec!["id", "total"]);
    assert_eq!(table.primary_key_columns().collect::<Vec<_>>(), vec!["id"]);
    assert!(table.column("id").is_some_and(|c| c.generated));
    assert!(table.column("total").is_some_and(|c| !c.generated && !c.case_sensitive));
    assert!(table.contains_index("idx_total"));
    assert_eq!(table.indexes().len(), 1);
    assert_eq!(data_source.opened(), 1);
}

#[test]
fn test_load_missing_table() {
    let (_dir, data_source) = setup_test_database();

    let lookup = TableMetadataLoader::load(&data_source, "ghost", DatabaseType::Sqlite)
        .expect("load ghost");

    assert_eq!(lookup, TableLookup::NotFound);
    assert_eq!(data_source.opened(), 1);
}

#[test]
fn test_load_does_not_match_patterns() {
    let (_dir, data_source) = setup_test_database();

    for pattern in ["order%", "order_", "ORDERS "] {
        let lookup = TableMetadataLoader::load(&data_source, pattern, DatabaseType::Sqlite)
            .expect("load pattern");
        assert_eq!(lookup, TableLookup::NotFound, "{pattern} must not match");
    }
}

#[test]
fn test_load_ignores_table_name_case() {
    let (_dir, data_source) = setup_test_database();

    let lookup = TableMetadataLoader::load(&data_source, "ORDERS", DatabaseType::Sqlite)
        .expect("load ORDERS");

    let table = lookup.into_option().expect("ORDERS should resolve to orders");
    assert_eq!(table.column_names().collect::<Vec<_>>(), vec!["id", "total"]);
    assert!(table.contains_index("idx_total"));
}

#[test]
fn test_load_tables_named_like_internal_ones() {
    let (_dir, data_source) = setup_test_database();
    let conn = SqliteConnection::open(data_source.path.to_str().unwrap()).expect("open");
    conn.execute_batch(
        "CREATE TABLE sqlitex (id INTEGER PRIMARY KEY); \
         CREATE TABLE SQLiteStats (hits INTEGER NOT NULL);",
    )
    .expect("create tables");
    conn.close().expect("close");

    for name in ["sqlitex", "SQLiteStats"] {
        let lookup = TableMetadataLoader::load(&data_source, name, DatabaseType::Sqlite)
            .expect("load table");
        assert!(lookup.is_found(), "{name} should be found");

        let shape_only =
            TableMetadataLoader::load_without_column_metadata(&data_source, name, DatabaseType::Sqlite)
                .expect("load table");
        assert!(shape_only.is_found(), "{name} should be found");
    }

    let schema = SchemaMetadataLoader::load(&data_source, 2, DatabaseType::Sqlite)
        .expect("load schema");
    assert!(schema.contains_column("sqlitex", "id"));
    assert!(schema.contains_column("SQLiteStats", "hits"));
}

#[test]
fn test_load_view() {
    let (_dir, data_source) = setup_test_database();

    let lookup = TableMetadataLoader::load(&data_source, "order_totals", DatabaseType::Sqlite)
        .expect("load view");

    let table = lookup.into_option().expect("view should be found");
    assert_eq!(table.column_names().collect::<Vec<_>>(), vec!["id", "total"]);
    assert!(table.indexes().is_empty());
}

#[test]
fn test_composite_key_and_indexes() {
    let (_dir, data_source) = setup_test_database();

    let lookup = TableMetadataLoader::load(&data_source, "order_lines", DatabaseType::Sqlite)
        .expect("load order_lines");
    let table = lookup.into_option().expect("order_lines should exist");

    assert_eq!(
        table.primary_key_columns().collect::<Vec<_>>(),
        vec!["order_id", "line"]
    );
    assert!(table.columns().iter().all(|c| !c.generated));
    assert!(table.column("sku").is_some_and(|c| c.case_sensitive));
    assert!(table.contains_index("idx_lines_sku"));
    assert!(table.contains_index("idx_lines_sku_line"));
    // The multi-column index is listed once
    let names: Vec<_> = table.indexes().iter().map(|i| i.name.as_str()).collect();
    assert_eq!(
        names.iter().filter(|n| **n == "idx_lines_sku_line").count(),
        1
    );
}

#[test]
fn test_shape_only_load() {
    let (_dir, data_source) = setup_test_database();

    let found =
        TableMetadataLoader::load_without_column_metadata(&data_source, "users", DatabaseType::Sqlite)
            .expect("load users");
    let missing =
        TableMetadataLoader::load_without_column_metadata(&data_source, "ghost", DatabaseType::Sqlite)
            .expect("load ghost");

    let table = found.into_option().expect("users should exist");
    assert!(table.columns().is_empty());
    assert!(table.indexes().is_empty());
    assert_eq!(missing, TableLookup::NotFound);
    assert_eq!(data_source.opened(), 2);
}

#[test]
fn test_missing_database_file_fails() {
    let dir = tempfile::tempdir().expect("temp dir");
    let data_source = FileDataSource {
        path: dir.path().join("missing").join("db.sqlite"),
        opened: AtomicUsize::new(0),
    };

    let result = TableMetadataLoader::load(&data_source, "orders", DatabaseType::Sqlite);

    assert!(result.is_err());
}

#[test]
fn test_schema_loader() {
    let (_dir, data_source) = setup_test_database();

    let schema = SchemaMetadataLoader::load(&data_source, 2, DatabaseType::Sqlite)
        .expect("load schema");

    assert_eq!(
        schema.all_table_names().collect::<Vec<_>>(),
        vec!["order_lines", "order_totals", "orders", "users"]
    );
    assert!(schema.contains_column("users", "email"));
    assert!(schema.contains_column("orders", "total"));
    assert!(!schema.contains_column("orders", "email"));
    // One connection to list names plus one per group
    assert_eq!(data_source.opened(), 3);
}

#[test]
fn test_schema_loader_single_connection() {
    let (_dir, data_source) = setup_test_database();

    let schema = SchemaMetadataLoader::load(&data_source, 1, DatabaseType::Sqlite)
        .expect("load schema");

    assert_eq!(schema.len(), 4);
    assert_eq!(data_source.opened(), 2);
}
