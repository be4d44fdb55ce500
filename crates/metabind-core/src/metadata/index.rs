//! Index metadata and its loader

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use super::column::introspection;
use crate::{Connection, DatabaseType, Result, resolve_schema};

/// One index of a table, identified by name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct IndexMetadata {
    pub name: String,
}

impl IndexMetadata {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Loads the index set of a table
pub trait IndexLoader: Send + Sync {
    fn load(
        &self,
        connection: &dyn Connection,
        table: &str,
        database_type: DatabaseType,
    ) -> Result<IndexSet<IndexMetadata>>;
}

/// Index loader backed by the connection's introspection facility
#[derive(Debug, Clone, Copy, Default)]
pub struct IntrospectionIndexLoader;

impl IndexLoader for IntrospectionIndexLoader {
    fn load(
        &self,
        connection: &dyn Connection,
        table: &str,
        database_type: DatabaseType,
    ) -> Result<IndexSet<IndexMetadata>> {
        let introspection = introspection(connection)?;
        let catalog = connection.catalog()?;
        let schema = resolve_schema(connection, database_type)?;
        tracing::trace!(table = %table, catalog = ?catalog, schema = ?schema, "loading index metadata");

        // Multi-column indexes report one entry per column.
        Ok(introspection
            .index_info(catalog.as_deref(), schema.as_deref(), table)?
            .into_iter()
            .filter(|entry| entry.table == table)
            .filter_map(|entry| entry.index_name)
            .map(IndexMetadata::new)
            .collect())
    }
}
