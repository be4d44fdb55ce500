//! Schema introspection traits and types

use std::collections::VecDeque;

use crate::Result;
use serde::{Deserialize, Serialize};

/// Schema introspection interface
///
/// Every call is scoped by an optional catalog and an optional schema. `None`
/// means "do not filter on this qualifier".
pub trait SchemaIntrospection: Send + Sync {
    /// List tables.
    ///
    /// `table_name: Some(name)` matches that exact name only, no wildcard
    /// expansion. `None` lists every table. `types: None` applies no type filter.
    fn tables(
        &self,
        catalog: Option<&str>,
        schema: Option<&str>,
        table_name: Option<&str>,
        types: Option<&[TableType]>,
    ) -> Result<Box<dyn MetadataCursor<TableInfo> + '_>>;

    /// Get columns for a table, in ordinal order
    fn columns(
        &self,
        catalog: Option<&str>,
        schema: Option<&str>,
        table: &str,
    ) -> Result<Vec<ColumnInfo>>;

    /// Get primary key columns for a table
    fn primary_keys(
        &self,
        catalog: Option<&str>,
        schema: Option<&str>,
        table: &str,
    ) -> Result<Vec<PrimaryKeyColumn>>;

    /// Get index entries for a table, one per indexed column
    fn index_info(
        &self,
        catalog: Option<&str>,
        schema: Option<&str>,
        table: &str,
    ) -> Result<Vec<IndexColumnInfo>>;
}

/// Forward-only cursor over introspection results
///
/// Whatever the cursor holds on the driver side is released when it is
/// dropped, whether or not it was read to the end.
pub trait MetadataCursor<T>: Send {
    /// Advance to the next entry, `None` once exhausted
    fn next_entry(&mut self) -> Result<Option<T>>;
}

/// Cursor over entries a driver has already materialized
pub struct BufferedCursor<T> {
    entries: VecDeque<T>,
}

impl<T> BufferedCursor<T> {
    pub fn new(entries: impl IntoIterator<Item = T>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }
}

impl<T: Send> MetadataCursor<T> for BufferedCursor<T> {
    fn next_entry(&mut self) -> Result<Option<T>> {
        Ok(self.entries.pop_front())
    }
}

/// Table information (basic)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableInfo {
    pub catalog: Option<String>,
    pub schema: Option<String>,
    pub name: String,
    pub table_type: TableType,
}

/// Table type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TableType {
    Table,
    View,
    SystemTable,
    Temporary,
}

impl TableType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TableType::Table => "TABLE",
            TableType::View => "VIEW",
            TableType::SystemTable => "SYSTEM TABLE",
            TableType::Temporary => "TEMPORARY",
        }
    }
}

/// Column information as reported by the database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnInfo {
    /// Table the column belongs to
    pub table: String,
    pub name: String,
    /// 1-based position in the table
    pub ordinal: usize,
    /// Declared type name, as the database spells it
    pub data_type: String,
    pub nullable: bool,
    pub is_auto_increment: bool,
    /// Whether comparisons on this column are case sensitive
    pub case_sensitive: bool,
}

/// One column of a table's primary key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimaryKeyColumn {
    pub table: String,
    pub column: String,
    /// 1-based position within the key
    pub key_sequence: usize,
    pub constraint_name: Option<String>,
}

/// One column entry of an index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexColumnInfo {
    pub table: String,
    /// Index name; some databases report statistics rows without one
    pub index_name: Option<String>,
    pub column: Option<String>,
    pub non_unique: bool,
    /// 1-based position within the index
    pub ordinal: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffered_cursor_yields_in_order_then_none() {
        let mut cursor = BufferedCursor::new(vec![1, 2]);
        assert_eq!(cursor.next_entry().unwrap(), Some(1));
        assert_eq!(cursor.next_entry().unwrap(), Some(2));
        assert_eq!(cursor.next_entry().unwrap(), None);
        assert_eq!(cursor.next_entry().unwrap(), None);
    }

    #[test]
    fn test_table_type_names() {
        assert_eq!(TableType::Table.as_str(), "TABLE");
        assert_eq!(TableType::SystemTable.as_str(), "SYSTEM TABLE");
    }
}
