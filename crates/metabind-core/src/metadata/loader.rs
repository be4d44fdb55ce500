//! Table metadata loading
//!
//! Every load acquires exactly one connection, checks that the table exists
//! and, only then, asks the column and index loaders for its shape on that
//! same connection. The connection is released on every exit path.

use serde::{Deserialize, Serialize};

use super::column::introspection;
use super::{
    ColumnLoader, IndexLoader, IntrospectionColumnLoader, IntrospectionIndexLoader, TableMetadata,
};
use crate::{Connection, DataSource, DatabaseType, Result, ScopedConnection, resolve_schema};

/// Outcome of looking up one table
///
/// A missing table is an ordinary answer, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TableLookup {
    Found(TableMetadata),
    NotFound,
}

impl TableLookup {
    pub fn is_found(&self) -> bool {
        matches!(self, TableLookup::Found(_))
    }

    pub fn found(&self) -> Option<&TableMetadata> {
        match self {
            TableLookup::Found(table) => Some(table),
            TableLookup::NotFound => None,
        }
    }

    pub fn into_option(self) -> Option<TableMetadata> {
        match self {
            TableLookup::Found(table) => Some(table),
            TableLookup::NotFound => None,
        }
    }
}

impl From<Option<TableMetadata>> for TableLookup {
    fn from(value: Option<TableMetadata>) -> Self {
        value.map_or(TableLookup::NotFound, TableLookup::Found)
    }
}

/// Loads metadata for single tables
///
/// Stateless; all operations are associated functions.
pub struct TableMetadataLoader;

impl TableMetadataLoader {
    /// Load columns and indexes of `table`
    pub fn load<D: DataSource + ?Sized>(
        data_source: &D,
        table: &str,
        database_type: DatabaseType,
    ) -> Result<TableLookup> {
        Self::load_with(
            data_source,
            table,
            database_type,
            &IntrospectionColumnLoader,
            &IntrospectionIndexLoader,
        )
    }

    /// Load `table` using caller-supplied column and index loaders
    #[tracing::instrument(skip(data_source, column_loader, index_loader), fields(database_type = %database_type))]
    pub fn load_with<D: DataSource + ?Sized>(
        data_source: &D,
        table: &str,
        database_type: DatabaseType,
        column_loader: &dyn ColumnLoader,
        index_loader: &dyn IndexLoader,
    ) -> Result<TableLookup> {
        ScopedConnection::run(data_source, |connection| {
            Self::load_on(connection, table, database_type, column_loader, index_loader)
        })
    }

    /// Check that `table` exists without loading its shape
    ///
    /// A found table comes back with no columns and no indexes, so callers
    /// of this path cannot tell an unshaped table from an empty one.
    #[tracing::instrument(skip(data_source), fields(database_type = %database_type))]
    pub fn load_without_column_metadata<D: DataSource + ?Sized>(
        data_source: &D,
        table: &str,
        database_type: DatabaseType,
    ) -> Result<TableLookup> {
        ScopedConnection::run(data_source, |connection| {
            if !Self::table_exists(connection, table, database_type)? {
                tracing::debug!("table not found");
                return Ok(TableLookup::NotFound);
            }
            Ok(TableLookup::Found(TableMetadata::empty()))
        })
    }

    /// Load `table` on a connection the caller already holds
    pub(crate) fn load_on(
        connection: &dyn Connection,
        table: &str,
        database_type: DatabaseType,
        column_loader: &dyn ColumnLoader,
        index_loader: &dyn IndexLoader,
    ) -> Result<TableLookup> {
        if !Self::table_exists(connection, table, database_type)? {
            tracing::debug!(table = %table, "table not found");
            return Ok(TableLookup::NotFound);
        }
        let columns = column_loader.load(connection, table, database_type)?;
        let indexes = index_loader.load(connection, table, database_type)?;
        tracing::debug!(
            table = %table,
            columns = columns.len(),
            indexes = indexes.len(),
            "table metadata loaded"
        );
        Ok(TableLookup::Found(TableMetadata::new(columns, indexes)))
    }

    /// Whether `table` exists in the connection's catalog and resolved schema
    ///
    /// The name is never treated as a pattern. Case sensitivity is the
    /// driver's. No type filter is applied.
    pub fn table_exists(
        connection: &dyn Connection,
        table: &str,
        database_type: DatabaseType,
    ) -> Result<bool> {
        let introspection = introspection(connection)?;
        let catalog = connection.catalog()?;
        let schema = resolve_schema(connection, database_type)?;
        tracing::trace!(table = %table, catalog = ?catalog, schema = ?schema, "probing table existence");

        let mut cursor =
            introspection.tables(catalog.as_deref(), schema.as_deref(), Some(table), None)?;
        Ok(cursor.next_entry()?.is_some())
    }
}
