//! Loading metadata for every table of a schema

use std::time::Instant;

use super::column::introspection;
use super::{
    ColumnLoader, IndexLoader, IntrospectionColumnLoader, IntrospectionIndexLoader,
    SchemaMetadata, TableMetadata,
};
use crate::{DataSource, DatabaseType, Result, ScopedConnection, TableType, resolve_schema};

const LOADED_TABLE_TYPES: [TableType; 2] = [TableType::Table, TableType::View];

/// Loads metadata for all user tables reachable from a data source
pub struct SchemaMetadataLoader;

impl SchemaMetadataLoader {
    /// Load every user table, using at most `max_connection_count` connections at once
    ///
    /// Table names are split into at most `max_connection_count` groups. Each
    /// group is loaded on its own connection; with more than one group the
    /// groups run on separate threads. The first failure is returned.
    #[tracing::instrument(skip(data_source), fields(database_type = %database_type))]
    pub fn load<D: DataSource + ?Sized>(
        data_source: &D,
        max_connection_count: usize,
        database_type: DatabaseType,
    ) -> Result<SchemaMetadata> {
        let started = Instant::now();
        let table_names = Self::load_table_names(data_source, database_type)?;
        if table_names.is_empty() {
            return Ok(SchemaMetadata::default());
        }

        let group_size = table_names
            .len()
            .div_ceil(max_connection_count.max(1))
            .max(1);
        let groups: Vec<&[String]> = table_names.chunks(group_size).collect();
        tracing::info!(
            tables = table_names.len(),
            groups = groups.len(),
            "loading schema metadata"
        );

        let tables = if groups.len() == 1 {
            Self::load_group(data_source, groups[0], database_type)?
        } else {
            std::thread::scope(|scope| {
                let handles: Vec<_> = groups
                    .iter()
                    .map(|group| {
                        scope.spawn(move || Self::load_group(data_source, group, database_type))
                    })
                    .collect();

                let mut tables = Vec::with_capacity(table_names.len());
                for handle in handles {
                    match handle.join() {
                        Ok(group) => tables.extend(group?),
                        Err(panic) => std::panic::resume_unwind(panic),
                    }
                }
                Ok::<_, crate::MetabindError>(tables)
            })?
        };

        tracing::info!(
            tables = tables.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "schema metadata loaded"
        );
        Ok(SchemaMetadata::new(tables))
    }

    /// Names of all user tables and views, in the order the database reports them
    ///
    /// Names containing `$` or `/` are system objects and are skipped.
    pub fn load_table_names<D: DataSource + ?Sized>(
        data_source: &D,
        database_type: DatabaseType,
    ) -> Result<Vec<String>> {
        ScopedConnection::run(data_source, |connection| {
            let introspection = introspection(connection)?;
            let catalog = connection.catalog()?;
            let schema = resolve_schema(connection, database_type)?;

            let mut cursor = introspection.tables(
                catalog.as_deref(),
                schema.as_deref(),
                None,
                Some(&LOADED_TABLE_TYPES),
            )?;
            let mut names = Vec::new();
            while let Some(table) = cursor.next_entry()? {
                if !is_system_table(&table.name) {
                    names.push(table.name);
                }
            }
            Ok(names)
        })
    }

    fn load_group<D: DataSource + ?Sized>(
        data_source: &D,
        tables: &[String],
        database_type: DatabaseType,
    ) -> Result<Vec<(String, TableMetadata)>> {
        ScopedConnection::run(data_source, |connection| {
            let mut loaded = Vec::with_capacity(tables.len());
            for table in tables {
                let columns = IntrospectionColumnLoader.load(connection, table, database_type)?;
                let indexes = IntrospectionIndexLoader.load(connection, table, database_type)?;
                loaded.push((table.clone(), TableMetadata::new(columns, indexes)));
            }
            Ok(loaded)
        })
    }
}

fn is_system_table(name: &str) -> bool {
    name.contains('$') || name.contains('/')
}
