//! Metadata for a whole schema

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::TableMetadata;

/// Table name to table metadata, in load order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaMetadata {
    tables: IndexMap<String, TableMetadata>,
}

impl SchemaMetadata {
    pub fn new(tables: impl IntoIterator<Item = (String, TableMetadata)>) -> Self {
        Self {
            tables: tables.into_iter().collect(),
        }
    }

    pub fn get(&self, table: &str) -> Option<&TableMetadata> {
        self.tables.get(table)
    }

    pub fn contains_table(&self, table: &str) -> bool {
        self.tables.contains_key(table)
    }

    /// Whether `table` is known and has a column named `column` (ASCII case ignored)
    pub fn contains_column(&self, table: &str, column: &str) -> bool {
        self.get(table)
            .is_some_and(|metadata| metadata.column(column).is_some())
    }

    pub fn all_table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    /// Column names of `table`, empty when the table is unknown
    pub fn all_column_names(&self, table: &str) -> Vec<&str> {
        self.get(table)
            .map(|metadata| metadata.column_names().collect())
            .unwrap_or_default()
    }

    /// Insert or replace a table, returning the previous metadata
    pub fn put(&mut self, table: impl Into<String>, metadata: TableMetadata) -> Option<TableMetadata> {
        self.tables.insert(table.into(), metadata)
    }

    pub fn remove(&mut self, table: &str) -> Option<TableMetadata> {
        self.tables.shift_remove(table)
    }

    /// Add every table of `other`, replacing tables with the same name
    pub fn merge(&mut self, other: SchemaMetadata) {
        self.tables.extend(other.tables);
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TableMetadata)> {
        self.tables.iter().map(|(name, table)| (name.as_str(), table))
    }
}
