//! Metabind Connection - Data sources, pooling and configuration
//!
//! This crate turns a driver and its connection settings into a
//! [`DataSource`](metabind_core::DataSource) the metadata loaders can draw
//! connections from, either pooled or one fresh connection per request.

mod config;
pub mod pool;
mod source;

pub use config::{DataSourceConfig, LoggingConfig};
pub use pool::{ConnectionFactory, ConnectionPool, PoolConfig, PoolStats, PooledConnection};
pub use source::{DriverConnectionFactory, DriverDataSource};
