//! Immutable table metadata snapshot

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use super::{ColumnMetadata, IndexMetadata};

/// Structural shape of one table at load time
///
/// There are no mutation methods. Reloading a table produces a new value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableMetadata {
    columns: Vec<ColumnMetadata>,
    indexes: IndexSet<IndexMetadata>,
}

impl TableMetadata {
    pub fn new(
        columns: impl IntoIterator<Item = ColumnMetadata>,
        indexes: impl IntoIterator<Item = IndexMetadata>,
    ) -> Self {
        Self {
            columns: columns.into_iter().collect(),
            indexes: indexes.into_iter().collect(),
        }
    }

    /// A table known to exist whose shape was not loaded
    pub fn empty() -> Self {
        Self::default()
    }

    /// Columns in table order
    pub fn columns(&self) -> &[ColumnMetadata] {
        &self.columns
    }

    pub fn indexes(&self) -> &IndexSet<IndexMetadata> {
        &self.indexes
    }

    /// True when neither columns nor indexes are known
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty() && self.indexes.is_empty()
    }

    /// Find a column by name, ignoring ASCII case
    pub fn column(&self, name: &str) -> Option<&ColumnMetadata> {
        self.columns
            .iter()
            .find(|column| column.name.eq_ignore_ascii_case(name))
    }

    pub fn column_at(&self, index: usize) -> Option<&ColumnMetadata> {
        self.columns.get(index)
    }

    /// Position of a column by name, ignoring ASCII case
    pub fn find_column_index(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|column| column.name.eq_ignore_ascii_case(name))
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|column| column.name.as_str())
    }

    /// Whether the column at `index` is part of the primary key
    pub fn is_primary_key(&self, index: usize) -> bool {
        self.columns
            .get(index)
            .is_some_and(|column| column.primary_key)
    }

    pub fn primary_key_columns(&self) -> impl Iterator<Item = &str> {
        self.columns
            .iter()
            .filter(|column| column.primary_key)
            .map(|column| column.name.as_str())
    }

    pub fn contains_index(&self, name: &str) -> bool {
        self.indexes.iter().any(|index| index.name == name)
    }
}
