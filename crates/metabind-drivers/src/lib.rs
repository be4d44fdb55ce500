//! Metabind Drivers - Database driver implementations
//!
//! This crate bundles the concrete drivers behind the traits defined in
//! `metabind-core` and a registry to look them up by name.

#[cfg(feature = "sqlite")]
pub use metabind_driver_sqlite as sqlite;

mod registry;

pub use registry::DriverRegistry;

/// Re-export commonly used types from metabind-core
pub use metabind_core::{
    Connection, ConnectionConfig, DatabaseDriver, DatabaseType, MetabindError, Result,
    SchemaIntrospection,
};
