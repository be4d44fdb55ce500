//! Database driver trait definition

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{Connection, DatabaseType, Result};

/// A database driver that can open connections
pub trait DatabaseDriver: Send + Sync {
    /// Get the driver identifier (e.g., "sqlite")
    fn name(&self) -> &'static str;

    /// Get the display name (e.g., "SQLite")
    fn display_name(&self) -> &'static str;

    /// Dialect spoken by connections from this driver
    fn database_type(&self) -> DatabaseType;

    /// Open a new physical connection
    fn connect(&self, config: &ConnectionConfig) -> Result<Box<dyn Connection>>;

    /// Open a connection, ping it and close it again
    fn test_connection(&self, config: &ConnectionConfig) -> Result<()> {
        let connection = self.connect(config)?;
        let ping = connection.ping();
        connection.close()?;
        ping
    }
}

/// Connection configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    /// Driver ID (e.g., "sqlite")
    pub driver: String,
    /// Host address (empty for file-based databases)
    pub host: String,
    /// Port number (0 for default or file-based)
    pub port: u16,
    /// Database name or file path
    pub database: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Additional connection parameters
    pub params: HashMap<String, String>,
}

impl ConnectionConfig {
    /// Create a new configuration for a driver
    pub fn new(driver: &str) -> Self {
        Self {
            driver: driver.to_string(),
            ..Default::default()
        }
    }

    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    pub fn with_param(mut self, key: &str, value: &str) -> Self {
        self.params.insert(key.to_string(), value.to_string());
        self
    }

    /// Look up a parameter, falling back to the well-known fields
    pub fn get_string(&self, key: &str) -> Option<String> {
        if let Some(value) = self.params.get(key) {
            return Some(value.clone());
        }
        match key {
            "database" => self.database.clone(),
            "host" if !self.host.is_empty() => Some(self.host.clone()),
            "username" | "user" => self.username.clone(),
            "password" => self.password.clone(),
            _ => None,
        }
    }
}
