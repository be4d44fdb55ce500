//! Dialect registry and schema resolution
//!
//! Databases disagree on what addresses a table. MySQL treats the database
//! as the catalog and has no schema, PostgreSQL scopes tables by schema
//! inside a catalog, SQLite has neither in the JDBC sense. Each dialect
//! declares its addressing rule in a [`DialectProfile`]; loaders ask the
//! registry instead of matching on the dialect themselves.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::{Connection, MetabindError, Result};

/// Database dialect identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DatabaseType {
    MySql,
    MariaDb,
    PostgreSql,
    Oracle,
    SqlServer,
    H2,
    Sql92,
    Sqlite,
}

impl DatabaseType {
    pub const ALL: [DatabaseType; 8] = [
        DatabaseType::MySql,
        DatabaseType::MariaDb,
        DatabaseType::PostgreSql,
        DatabaseType::Oracle,
        DatabaseType::SqlServer,
        DatabaseType::H2,
        DatabaseType::Sql92,
        DatabaseType::Sqlite,
    ];

    /// Canonical product name
    pub fn name(&self) -> &'static str {
        match self {
            DatabaseType::MySql => "MySQL",
            DatabaseType::MariaDb => "MariaDB",
            DatabaseType::PostgreSql => "PostgreSQL",
            DatabaseType::Oracle => "Oracle",
            DatabaseType::SqlServer => "SQLServer",
            DatabaseType::H2 => "H2",
            DatabaseType::Sql92 => "SQL92",
            DatabaseType::Sqlite => "SQLite",
        }
    }

    /// Get this dialect's profile from the global registry
    pub fn profile(&self) -> &'static DialectProfile {
        DIALECT_REGISTRY.get(*self)
    }
}

impl fmt::Display for DatabaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DatabaseType {
    type Err = MetabindError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mysql" => Ok(DatabaseType::MySql),
            "mariadb" => Ok(DatabaseType::MariaDb),
            "postgresql" | "postgres" | "pg" => Ok(DatabaseType::PostgreSql),
            "oracle" => Ok(DatabaseType::Oracle),
            "sqlserver" | "mssql" => Ok(DatabaseType::SqlServer),
            "h2" => Ok(DatabaseType::H2),
            "sql92" => Ok(DatabaseType::Sql92),
            "sqlite" | "sqlite3" => Ok(DatabaseType::Sqlite),
            other => Err(MetabindError::Configuration(format!(
                "Unknown database type: {other}"
            ))),
        }
    }
}

impl TryFrom<String> for DatabaseType {
    type Error = MetabindError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<DatabaseType> for String {
    fn from(value: DatabaseType) -> Self {
        value.name().to_string()
    }
}

/// How a dialect fills the schema qualifier of introspection calls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaStrategy {
    /// Ask the live connection for its current schema
    CurrentSchema,
    /// The dialect does not scope tables by schema; address by catalog only
    Absent,
}

/// Addressing and quoting rules of one dialect
#[derive(Debug, Clone)]
pub struct DialectProfile {
    pub database_type: DatabaseType,
    pub schema_strategy: SchemaStrategy,
    /// Opening and closing identifier quote
    pub quote: (char, char),
}

impl DialectProfile {
    pub const fn new(
        database_type: DatabaseType,
        schema_strategy: SchemaStrategy,
        quote: (char, char),
    ) -> Self {
        Self {
            database_type,
            schema_strategy,
            quote,
        }
    }

    /// Quote an identifier, doubling embedded closing quotes
    pub fn quote_identifier(&self, identifier: &str) -> String {
        let (open, close) = self.quote;
        let escaped = identifier.replace(close, &format!("{close}{close}"));
        format!("{open}{escaped}{close}")
    }

    /// Resolve the schema qualifier for introspection calls on `connection`
    pub fn resolve_schema(&self, connection: &dyn Connection) -> Result<Option<String>> {
        match self.schema_strategy {
            SchemaStrategy::CurrentSchema => connection.schema(),
            SchemaStrategy::Absent => Ok(None),
        }
    }
}

/// Registry of dialect profiles keyed by database type
pub struct DialectRegistry {
    profiles: HashMap<DatabaseType, DialectProfile>,
    fallback: DialectProfile,
}

impl DialectRegistry {
    /// Create a registry that answers every lookup with `fallback`
    pub fn new(fallback: DialectProfile) -> Self {
        Self {
            profiles: HashMap::new(),
            fallback,
        }
    }

    /// Register a profile, replacing any previous one for the same type
    pub fn register(&mut self, profile: DialectProfile) {
        self.profiles.insert(profile.database_type, profile);
    }

    /// Get the profile for a database type
    pub fn get(&self, database_type: DatabaseType) -> &DialectProfile {
        self.profiles.get(&database_type).unwrap_or(&self.fallback)
    }

    pub fn database_types(&self) -> impl Iterator<Item = DatabaseType> + '_ {
        self.profiles.keys().copied()
    }
}

impl Default for DialectRegistry {
    fn default() -> Self {
        let mut registry = Self::new(DialectProfile::new(
            DatabaseType::Sql92,
            SchemaStrategy::CurrentSchema,
            ('"', '"'),
        ));
        registry.register(DialectProfile::new(
            DatabaseType::MySql,
            SchemaStrategy::Absent,
            ('`', '`'),
        ));
        registry.register(DialectProfile::new(
            DatabaseType::MariaDb,
            SchemaStrategy::Absent,
            ('`', '`'),
        ));
        registry.register(DialectProfile::new(
            DatabaseType::PostgreSql,
            SchemaStrategy::CurrentSchema,
            ('"', '"'),
        ));
        registry.register(DialectProfile::new(
            DatabaseType::Oracle,
            SchemaStrategy::Absent,
            ('"', '"'),
        ));
        registry.register(DialectProfile::new(
            DatabaseType::SqlServer,
            SchemaStrategy::CurrentSchema,
            ('[', ']'),
        ));
        registry.register(DialectProfile::new(
            DatabaseType::H2,
            SchemaStrategy::CurrentSchema,
            ('"', '"'),
        ));
        registry.register(DialectProfile::new(
            DatabaseType::Sql92,
            SchemaStrategy::CurrentSchema,
            ('"', '"'),
        ));
        registry.register(DialectProfile::new(
            DatabaseType::Sqlite,
            SchemaStrategy::Absent,
            ('"', '"'),
        ));
        registry
    }
}

/// Global dialect registry
pub static DIALECT_REGISTRY: LazyLock<DialectRegistry> = LazyLock::new(DialectRegistry::default);

/// Schema qualifier to use for introspection calls against `connection`
///
/// `None` means the dialect is addressed by catalog only.
pub fn resolve_schema(
    connection: &dyn Connection,
    database_type: DatabaseType,
) -> Result<Option<String>> {
    let schema = database_type.profile().resolve_schema(connection)?;
    tracing::trace!(database_type = %database_type, schema = ?schema, "resolved schema qualifier");
    Ok(schema)
}
