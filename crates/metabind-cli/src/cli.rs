//! CLI argument parsing using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use metabind_core::DatabaseType;

/// Metabind - load table and schema metadata from a live database
#[derive(Parser, Debug)]
#[command(name = "metabind")]
#[command(about = "Load table and schema metadata from a live database", long_about = None)]
#[command(version)]
pub struct Args {
    /// Data-source configuration file (TOML)
    #[arg(short, long, value_name = "FILE", env = "METABIND_CONFIG")]
    pub config: PathBuf,

    /// Dialect used for schema resolution, overriding the config file
    /// (e.g. postgresql, mysql, sqlite)
    #[arg(long, value_name = "TYPE")]
    pub database_type: Option<DatabaseType>,

    /// Log filter directives, overriding the config file (RUST_LOG still wins)
    #[arg(long, value_name = "FILTER")]
    pub log_filter: Option<String>,

    /// Write logs as JSON lines
    #[arg(long)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Load the columns and indexes of one table
    Table {
        /// Exact table name
        name: String,

        /// Only check that the table exists
        #[arg(long)]
        shape_only: bool,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Load metadata for every table and view
    Schema {
        /// Connections to use at once (defaults to the pool size, or 1)
        #[arg(long, value_name = "N", value_parser = clap::value_parser!(u16).range(1..))]
        max_connections: Option<u16>,

        /// Print JSON instead of tables
        #[arg(long)]
        json: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_args_are_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_table_command() {
        let args = Args::try_parse_from([
            "metabind",
            "--config",
            "metabind.toml",
            "--database-type",
            "postgres",
            "table",
            "orders",
            "--shape-only",
        ])
        .expect("parse");

        assert_eq!(args.config, PathBuf::from("metabind.toml"));
        assert_eq!(args.database_type, Some(DatabaseType::PostgreSql));
        assert_eq!(
            args.command,
            Command::Table {
                name: "orders".into(),
                shape_only: true,
                json: false,
            }
        );
    }

    #[test]
    fn test_parse_schema_command() {
        let args = Args::try_parse_from([
            "metabind", "-c", "m.toml", "schema", "--max-connections", "3", "--json",
        ])
        .expect("parse");

        assert_eq!(
            args.command,
            Command::Schema {
                max_connections: Some(3),
                json: true,
            }
        );
    }

    #[test]
    fn test_rejects_unknown_database_type() {
        let result = Args::try_parse_from([
            "metabind", "-c", "m.toml", "--database-type", "dbase", "schema",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_zero_connections() {
        let result = Args::try_parse_from([
            "metabind", "-c", "m.toml", "schema", "--max-connections", "0",
        ]);
        assert!(result.is_err());
    }
}
