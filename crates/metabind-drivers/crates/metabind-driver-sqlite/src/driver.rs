//! SQLite driver implementation

use metabind_core::{
    Connection, ConnectionConfig, DatabaseDriver, DatabaseType, MetabindError, Result,
};

use crate::SqliteConnection;

/// SQLite database driver
pub struct SqliteDriver;

impl SqliteDriver {
    /// Create a new SQLite driver instance
    pub fn new() -> Self {
        tracing::debug!("SQLite driver initialized");
        Self
    }

    fn database_path(config: &ConnectionConfig) -> Option<String> {
        config
            .get_string("path")
            .or_else(|| config.get_string("database"))
    }
}

impl Default for SqliteDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl DatabaseDriver for SqliteDriver {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn display_name(&self) -> &'static str {
        "SQLite"
    }

    fn database_type(&self) -> DatabaseType {
        DatabaseType::Sqlite
    }

    #[tracing::instrument(skip(self, config), fields(path = Self::database_path(config).as_deref()))]
    fn connect(&self, config: &ConnectionConfig) -> Result<Box<dyn Connection>> {
        let path = Self::database_path(config).ok_or_else(|| {
            MetabindError::Configuration(
                "SQLite requires 'path' or 'database' parameter. Example: path = \"/path/to/database.db\"".into(),
            )
        })?;

        let conn = SqliteConnection::open(&path).inspect_err(|e| {
            tracing::error!(error = %e, "failed to connect to SQLite database");
        })?;

        tracing::info!(path = %path, "SQLite connection created");
        Ok(Box::new(conn))
    }
}
