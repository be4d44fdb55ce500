//! Connection pooling for database connections
//!
//! This module provides a blocking connection pool with a bounded size,
//! acquire timeouts, idle and lifetime eviction, and statistics tracking.
//!
//! # Example
//!
//! ```ignore
//! use metabind_connection::pool::{ConnectionPool, PoolConfig};
//!
//! let config = PoolConfig::new(4)
//!     .with_acquire_timeout_ms(5000)
//!     .with_idle_timeout_ms(300000);
//!
//! let pool = ConnectionPool::new(config, connection_factory);
//! let conn = pool.get()?;
//! // Use connection...
//! // Connection returned to pool on close or drop
//! ```

mod config;
mod pool;
mod stats;


pub use config::PoolConfig;
pub use pool::{ConnectionFactory, ConnectionPool, PooledConnection};
pub use stats::PoolStats;
