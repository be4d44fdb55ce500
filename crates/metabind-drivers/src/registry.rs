//! Driver registry for managing available database drivers

use std::collections::HashMap;
use std::sync::Arc;

use metabind_core::{DatabaseDriver, DatabaseType};

/// Registry of available database drivers
pub struct DriverRegistry {
    drivers: HashMap<String, Arc<dyn DatabaseDriver>>,
}

impl DriverRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            drivers: HashMap::new(),
        }
    }

    /// Create a registry with all built-in drivers registered
    pub fn with_defaults() -> Self {
        #[allow(unused_mut)]
        let mut registry = Self::new();

        #[cfg(feature = "sqlite")]
        registry.register(Arc::new(crate::sqlite::SqliteDriver::new()));

        registry
    }

    /// Register a driver, replacing any driver with the same name
    pub fn register(&mut self, driver: Arc<dyn DatabaseDriver>) {
        let name = driver.name().to_string();
        tracing::info!(driver = %name, "registering database driver");
        self.drivers.insert(name, driver);
    }

    /// Get a driver by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn DatabaseDriver>> {
        let driver = self.drivers.get(name).cloned();
        if driver.is_none() {
            tracing::warn!(driver = %name, "driver not found in registry");
        }
        driver
    }

    /// First registered driver speaking the given dialect
    pub fn for_database_type(&self, database_type: DatabaseType) -> Option<Arc<dyn DatabaseDriver>> {
        let mut matching: Vec<_> = self
            .drivers
            .values()
            .filter(|driver| driver.database_type() == database_type)
            .collect();
        matching.sort_by_key(|driver| driver.name());
        matching.first().map(|driver| Arc::clone(driver))
    }

    /// List all registered driver names, sorted
    pub fn list(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.drivers.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Check if a driver is registered
    pub fn has(&self, name: &str) -> bool {
        self.drivers.contains_key(name)
    }
}

impl Default for DriverRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use metabind_core::{Connection, ConnectionConfig, MetabindError, Result};

    struct NullDriver;

    impl DatabaseDriver for NullDriver {
        fn name(&self) -> &'static str {
            "null"
        }

        fn display_name(&self) -> &'static str {
            "Null"
        }

        fn database_type(&self) -> DatabaseType {
            DatabaseType::Sql92
        }

        fn connect(&self, _config: &ConnectionConfig) -> Result<Box<dyn Connection>> {
            Err(MetabindError::NotSupported("null driver".into()))
        }
    }

    #[test]
    fn test_empty_registry() {
        let registry = DriverRegistry::new();
        assert!(registry.list().is_empty());
        assert!(registry.get("sqlite").is_none());
        assert!(registry.for_database_type(DatabaseType::Sqlite).is_none());
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry = DriverRegistry::new();
        registry.register(Arc::new(NullDriver));

        assert!(registry.has("null"));
        assert_eq!(registry.get("null").map(|d| d.display_name()), Some("Null"));
        assert_eq!(
            registry.for_database_type(DatabaseType::Sql92).map(|d| d.name()),
            Some("null")
        );
    }

    #[cfg(feature = "sqlite")]
    #[test]
    fn test_defaults_include_sqlite() {
        let registry = DriverRegistry::with_defaults();
        assert_eq!(registry.list(), vec!["sqlite"]);
        assert_eq!(
            registry.for_database_type(DatabaseType::Sqlite).map(|d| d.name()),
            Some("sqlite")
        );
    }
}
