//! Data-source configuration files
//!
//! ```toml
//! database_type = "sqlite"
//!
//! [connection]
//! driver = "sqlite"
//! database = "./shop.db"
//!
//! [pool]
//! max_size = 4
//!
//! [logging]
//! filter = "metabind=debug"
//! ```

use std::path::Path;
use std::sync::Arc;

use metabind_core::{ConnectionConfig, DataSource, DatabaseDriver, DatabaseType, MetabindError, Result};
use metabind_drivers::DriverRegistry;
use serde::{Deserialize, Serialize};

use crate::{ConnectionPool, DriverConnectionFactory, DriverDataSource, PoolConfig};

/// Where connections come from and how the tools around them log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DataSourceConfig {
    /// Dialect used for schema resolution; defaults to the driver's own
    #[serde(default)]
    pub database_type: Option<DatabaseType>,
    pub connection: ConnectionConfig,
    /// Pool settings; without them every request opens a fresh connection
    #[serde(default)]
    pub pool: Option<PoolConfig>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Log output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing` filter directives, used when `RUST_LOG` is unset
    pub filter: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            json: false,
        }
    }
}

impl DataSourceConfig {
    /// Read and parse a TOML configuration file
    #[tracing::instrument]
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            MetabindError::Configuration(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml_str(&text)
    }

    /// Parse and validate a TOML configuration
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)
            .map_err(|e| MetabindError::Configuration(format!("Invalid config: {}", e)))?;
        config.validate()?;
        tracing::debug!(
            driver = %config.connection.driver,
            pooled = config.pool.is_some(),
            "data source config loaded"
        );
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.connection.driver.trim().is_empty() {
            return Err(MetabindError::Configuration(
                "connection.driver must be set".into(),
            ));
        }
        if let Some(pool) = &self.pool {
            pool.validate()?;
        }
        Ok(())
    }

    /// Look up the configured driver
    pub fn driver(&self, registry: &DriverRegistry) -> Result<Arc<dyn DatabaseDriver>> {
        registry.get(&self.connection.driver).ok_or_else(|| {
            MetabindError::Driver(format!(
                "Unknown driver: {} (available: {})",
                self.connection.driver,
                registry.list().join(", ")
            ))
        })
    }

    /// Configured dialect, falling back to the driver's
    pub fn database_type(&self, driver: &dyn DatabaseDriver) -> DatabaseType {
        self.database_type.unwrap_or_else(|| driver.database_type())
    }

    /// Most connections a caller should hold at once against this source
    pub fn max_connections(&self) -> usize {
        self.pool.as_ref().map_or(1, PoolConfig::max_size)
    }

    /// Build the data source this configuration describes
    pub fn build(&self, driver: Arc<dyn DatabaseDriver>) -> Box<dyn DataSource> {
        match &self.pool {
            Some(pool) => {
                tracing::info!(driver = driver.name(), max_size = pool.max_size(), "using pooled data source");
                let factory = DriverConnectionFactory::new(driver, self.connection.clone());
                Box::new(ConnectionPool::new(pool.clone(), factory))
            }
            None => {
                tracing::info!(driver = driver.name(), "using unpooled data source");
                Box::new(DriverDataSource::new(driver, self.connection.clone()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_minimal_config() {
        let config = DataSourceConfig::from_toml_str(
            r#"
            [connection]
            driver = "sqlite"
            database = "shop.db"
            "#,
        )
        .expect("parse");

        assert_eq!(config.database_type, None);
        assert_eq!(config.connection.database.as_deref(), Some("shop.db"));
        assert_eq!(config.pool, None);
        assert_eq!(config.logging, LoggingConfig::default());
        assert_eq!(config.max_connections(), 1);
    }

    #[test]
    fn test_full_config() {
        let config = DataSourceConfig::from_toml_str(
            r#"
            database_type = "postgres"

            [connection]
            driver = "sqlite"
            database = "shop.db"

            [connection.params]
            path = "/tmp/shop.db"

            [pool]
            max_size = 4
            acquire_timeout_ms = 500

            [logging]
            filter = "metabind=debug"
            json = true
            "#,
        )
        .expect("parse");

        assert_eq!(config.database_type, Some(DatabaseType::PostgreSql));
        assert_eq!(config.connection.get_string("path").as_deref(), Some("/tmp/shop.db"));
        assert_eq!(config.max_connections(), 4);
        assert_eq!(
            config.pool.as_ref().map(|p| p.acquire_timeout().as_millis()),
            Some(500)
        );
        assert_eq!(config.logging.filter, "metabind=debug");
        assert!(config.logging.json);
    }

    #[test]
    fn test_unknown_database_type_is_rejected() {
        let err = DataSourceConfig::from_toml_str(
            r#"
            database_type = "dbase"
            [connection]
            driver = "sqlite"
            "#,
        )
        .unwrap_err();

        assert!(matches!(err, MetabindError::Configuration(_)));
        assert!(err.to_string().contains("dbase"));
    }

    #[test]
    fn test_missing_driver_is_rejected() {
        let err = DataSourceConfig::from_toml_str("[connection]\ndatabase = \"x.db\"\n").unwrap_err();
        assert!(err.to_string().contains("connection.driver"));
    }

    #[test]
    fn test_zero_pool_size_is_rejected() {
        let err = DataSourceConfig::from_toml_str(
            "[connection]\ndriver = \"sqlite\"\n[pool]\nmax_size = 0\n",
        )
        .unwrap_err();
        assert!(err.to_string().contains("max_size"));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let err = DataSourceConfig::load(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, MetabindError::Configuration(_)));
    }

    #[test]
    fn test_driver_lookup_and_dialect_fallback() {
        let registry = DriverRegistry::with_defaults();
        let config =
            DataSourceConfig::from_toml_str("[connection]\ndriver = \"sqlite\"\n").expect("parse");

        let driver = config.driver(&registry).expect("sqlite driver");
        assert_eq!(config.database_type(&*driver), DatabaseType::Sqlite);

        let unknown =
            DataSourceConfig::from_toml_str("[connection]\ndriver = \"oracle\"\n").expect("parse");
        let err = unknown.driver(&registry).err().expect("unknown driver");
        assert!(matches!(err, MetabindError::Driver(_)));
    }

    #[test]
    fn test_build_from_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let db_path = dir.path().join("shop.db");
        let setup = metabind_driver_sqlite::SqliteConnection::open(db_path.to_str().unwrap())
            .expect("create database");
        setup
            .execute_batch("CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT);")
            .expect("schema");
        setup.close().expect("close");

        let config_path = dir.path().join("metabind.toml");
        std::fs::write(
            &config_path,
            format!(
                "[connection]\ndriver = \"sqlite\"\ndatabase = {:?}\n\n[pool]\nmax_size = 2\n",
                db_path.to_str().unwrap()
            ),
        )
        .expect("write config");

        let config = DataSourceConfig::load(&config_path).expect("load");
        let driver = config.driver(&DriverRegistry::with_defaults()).expect("driver");
        let source = config.build(Arc::clone(&driver));

        let lookup = metabind_core::TableMetadataLoader::load(
            &*source,
            "users",
            config.database_type(&*driver),
        )
        .expect("load");
        let table = lookup.into_option().expect("users should exist");
        assert_eq!(table.column_names().collect::<Vec<_>>(), vec!["id", "name"]);
    }
}
