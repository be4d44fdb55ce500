//! Column metadata and its loader

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{Connection, DatabaseType, MetabindError, Result, SchemaIntrospection, resolve_schema};

/// Shape of one table column
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnMetadata {
    pub name: String,
    /// Declared type name
    pub data_type: String,
    pub primary_key: bool,
    /// Value generated by the database (auto increment, identity)
    pub generated: bool,
    pub case_sensitive: bool,
}

impl ColumnMetadata {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            primary_key: false,
            generated: false,
            case_sensitive: false,
        }
    }

    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    pub fn generated(mut self) -> Self {
        self.generated = true;
        self
    }

    pub fn case_sensitive(mut self) -> Self {
        self.case_sensitive = true;
        self
    }
}

/// Loads the ordered column list of a table
pub trait ColumnLoader: Send + Sync {
    fn load(
        &self,
        connection: &dyn Connection,
        table: &str,
        database_type: DatabaseType,
    ) -> Result<Vec<ColumnMetadata>>;
}

/// Column loader backed by the connection's introspection facility
#[derive(Debug, Clone, Copy, Default)]
pub struct IntrospectionColumnLoader;

impl ColumnLoader for IntrospectionColumnLoader {
    fn load(
        &self,
        connection: &dyn Connection,
        table: &str,
        database_type: DatabaseType,
    ) -> Result<Vec<ColumnMetadata>> {
        let introspection = introspection(connection)?;
        let catalog = connection.catalog()?;
        let schema = resolve_schema(connection, database_type)?;
        tracing::trace!(table = %table, catalog = ?catalog, schema = ?schema, "loading column metadata");

        let primary_keys: HashSet<String> = introspection
            .primary_keys(catalog.as_deref(), schema.as_deref(), table)?
            .into_iter()
            .map(|pk| pk.column)
            .collect();

        let mut columns = introspection.columns(catalog.as_deref(), schema.as_deref(), table)?;
        columns.retain(|column| column.table == table);
        columns.sort_by_key(|column| column.ordinal);

        Ok(columns
            .into_iter()
            .map(|column| ColumnMetadata {
                primary_key: primary_keys.contains(&column.name),
                generated: column.is_auto_increment,
                case_sensitive: column.case_sensitive,
                name: column.name,
                data_type: column.data_type,
            })
            .collect())
    }
}

pub(crate) fn introspection(connection: &dyn Connection) -> Result<&dyn SchemaIntrospection> {
    connection.as_schema_introspection().ok_or_else(|| {
        MetabindError::NotSupported(format!(
            "Driver '{}' does not support schema introspection",
            connection.driver_name()
        ))
    })
}
