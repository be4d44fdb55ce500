//! Command execution

use std::io::Write;

use anyhow::{Context, Result};
use metabind_connection::DataSourceConfig;
use metabind_core::{DataSource, DatabaseType, SchemaMetadataLoader, TableLookup, TableMetadataLoader};
use metabind_drivers::DriverRegistry;

use crate::cli::{Args, Command};
use crate::output::{TableReport, format_schema, format_table_metadata};

/// How a successful run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    /// The requested table does not exist
    TableNotFound,
}

/// Run the parsed command against the configured data source, writing results to `out`
pub fn execute(
    args: &Args,
    config: &DataSourceConfig,
    registry: &DriverRegistry,
    out: &mut dyn Write,
) -> Result<Outcome> {
    let driver = config.driver(registry)?;
    let database_type = args
        .database_type
        .unwrap_or_else(|| config.database_type(&*driver));
    let data_source = config.build(driver);
    tracing::debug!(database_type = %database_type, "data source ready");

    match &args.command {
        Command::Table {
            name,
            shape_only,
            json,
        } => table(&*data_source, database_type, name, *shape_only, *json, out),
        Command::Schema {
            max_connections,
            json,
        } => {
            let max_connections = max_connections
                .map(usize::from)
                .unwrap_or_else(|| config.max_connections());
            schema(&*data_source, database_type, max_connections, *json, out)
        }
    }
}

fn table(
    data_source: &dyn DataSource,
    database_type: DatabaseType,
    name: &str,
    shape_only: bool,
    json: bool,
    out: &mut dyn Write,
) -> Result<Outcome> {
    let lookup = if shape_only {
        TableMetadataLoader::load_without_column_metadata(data_source, name, database_type)
    } else {
        TableMetadataLoader::load(data_source, name, database_type)
    }
    .with_context(|| format!("failed to load metadata for table '{name}'"))?;

    let metadata = lookup.found();
    if json {
        let report = TableReport {
            table: name,
            found: lookup.is_found(),
            metadata,
        };
        serde_json::to_writer_pretty(&mut *out, &report)?;
        writeln!(out)?;
    } else if let Some(metadata) = metadata {
        write!(out, "{}", format_table_metadata(name, metadata))?;
    }

    Ok(match lookup {
        TableLookup::Found(_) => Outcome::Success,
        TableLookup::NotFound => Outcome::TableNotFound,
    })
}

fn schema(
    data_source: &dyn DataSource,
    database_type: DatabaseType,
    max_connections: usize,
    json: bool,
    out: &mut dyn Write,
) -> Result<Outcome> {
    let schema = SchemaMetadataLoader::load(data_source, max_connections, database_type)
        .context("failed to load schema metadata")?;

    if json {
        serde_json::to_writer_pretty(&mut *out, &schema)?;
        writeln!(out)?;
    } else {
        write!(out, "{}", format_schema(&schema))?;
    }
    Ok(Outcome::Success)
}
