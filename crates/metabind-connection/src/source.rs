//! Data sources backed directly by a database driver

use std::sync::Arc;

use metabind_core::{
    Connection, ConnectionConfig, DataSource, DatabaseDriver, DatabaseType, Result,
};

use crate::pool::ConnectionFactory;

/// Opens a fresh physical connection for every request
///
/// Releasing a connection closes it.
pub struct DriverDataSource {
    driver: Arc<dyn DatabaseDriver>,
    config: ConnectionConfig,
}

impl DriverDataSource {
    pub fn new(driver: Arc<dyn DatabaseDriver>, config: ConnectionConfig) -> Self {
        Self { driver, config }
    }

    /// Dialect of the underlying driver
    pub fn database_type(&self) -> DatabaseType {
        self.driver.database_type()
    }
}

impl DataSource for DriverDataSource {
    #[tracing::instrument(skip(self), fields(driver = self.driver.name()))]
    fn get_connection(&self) -> Result<Box<dyn Connection + '_>> {
        let connection = self.driver.connect(&self.config).inspect_err(|e| {
            tracing::error!(error = %e, "failed to open connection");
        })?;
        Ok(connection)
    }
}

/// Pool factory that opens connections through a driver
pub struct DriverConnectionFactory {
    driver: Arc<dyn DatabaseDriver>,
    config: ConnectionConfig,
}

impl DriverConnectionFactory {
    pub fn new(driver: Arc<dyn DatabaseDriver>, config: ConnectionConfig) -> Self {
        Self { driver, config }
    }
}

impl ConnectionFactory for DriverConnectionFactory {
    fn create(&self) -> Result<Arc<dyn Connection>> {
        self.driver.connect(&self.config).map(Arc::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ConnectionPool, PoolConfig};
    use metabind_core::{ScopedConnection, TableLookup, TableMetadataLoader};
    use metabind_driver_sqlite::SqliteDriver;

    fn database(dir: &tempfile::TempDir) -> ConnectionConfig {
        let path = dir.path().join("source.db");
        let setup = metabind_driver_sqlite::SqliteConnection::open(path.to_str().unwrap())
            .expect("create database");
        setup
            .execute_batch("CREATE TABLE orders (id INTEGER PRIMARY KEY, total REAL);")
            .expect("schema");
        setup.close().expect("close");
        ConnectionConfig::new("sqlite").with_param("path", path.to_str().unwrap())
    }

    #[test]
    fn test_driver_data_source_opens_and_closes() {
        let dir = tempfile::tempdir().expect("temp dir");
        let source = DriverDataSource::new(Arc::new(SqliteDriver::new()), database(&dir));
        assert_eq!(source.database_type(), DatabaseType::Sqlite);

        let lookup = TableMetadataLoader::load(&source, "orders", source.database_type())
            .expect("load");

        assert!(lookup.is_found());
    }

    #[test]
    fn test_driver_data_source_propagates_connect_errors() {
        let source = DriverDataSource::new(
            Arc::new(SqliteDriver::new()),
            ConnectionConfig::new("sqlite"),
        );

        let result = ScopedConnection::run(&source, |conn| conn.catalog());

        assert!(result.is_err());
    }

    #[test]
    fn test_pool_over_driver_factory() {
        let dir = tempfile::tempdir().expect("temp dir");
        let factory = DriverConnectionFactory::new(Arc::new(SqliteDriver::new()), database(&dir));
        let pool = ConnectionPool::new(PoolConfig::new(2), factory);

        let first = TableMetadataLoader::load(&pool, "orders", DatabaseType::Sqlite).expect("load");
        let second = TableMetadataLoader::load(&pool, "ghost", DatabaseType::Sqlite).expect("load");

        assert!(first.is_found());
        assert_eq!(second, TableLookup::NotFound);
        assert_eq!(pool.stats().total(), 1);
        assert_eq!(pool.stats().idle(), 1);
    }
}
