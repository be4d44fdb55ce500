//! Connection traits and scoped connection handling

use std::ops::Deref;

use crate::{Result, SchemaIntrospection};

/// A database connection
///
/// Calls are synchronous and block on the database round-trip.
pub trait Connection: Send + Sync {
    /// Get the driver name (e.g., "sqlite", "postgresql", "mysql")
    fn driver_name(&self) -> &str;

    /// Catalog the connection is currently addressing, if the database has one
    fn catalog(&self) -> Result<Option<String>>;

    /// Schema the connection is currently addressing, if the database has one
    fn schema(&self) -> Result<Option<String>>;

    /// Cheap liveness probe used by pools before handing out an idle connection
    fn ping(&self) -> Result<()> {
        Ok(())
    }

    /// Release the connection
    ///
    /// For a physical connection this closes the session; for a pooled
    /// connection it hands the session back to its pool. Calling it more
    /// than once must be harmless.
    fn close(&self) -> Result<()>;

    /// Check if the connection is closed
    fn is_closed(&self) -> bool;

    /// Get schema introspection interface if supported
    fn as_schema_introspection(&self) -> Option<&dyn SchemaIntrospection> {
        None
    }
}

/// Anything that can hand out live connections
///
/// Implementations must be safe to call from several threads at once when
/// callers load metadata concurrently.
pub trait DataSource: Send + Sync {
    /// Acquire one connection
    fn get_connection(&self) -> Result<Box<dyn Connection + '_>>;
}

impl<T: DataSource + ?Sized> DataSource for std::sync::Arc<T> {
    fn get_connection(&self) -> Result<Box<dyn Connection + '_>> {
        (**self).get_connection()
    }
}

/// A connection that is released exactly once when its scope ends
///
/// Prefer [`ScopedConnection::run`], which surfaces release failures on the
/// success path. Dropping the guard without calling [`ScopedConnection::release`]
/// (early return, panic unwind) still releases the connection and logs any
/// failure.
pub struct ScopedConnection<'a> {
    connection: Option<Box<dyn Connection + 'a>>,
}

impl<'a> ScopedConnection<'a> {
    /// Acquire a connection from the data source
    pub fn acquire<D: DataSource + ?Sized>(data_source: &'a D) -> Result<Self> {
        let connection = data_source.get_connection()?;
        tracing::trace!(driver = connection.driver_name(), "scoped connection acquired");
        Ok(Self {
            connection: Some(connection),
        })
    }

    /// Acquire a connection, run `f` against it and release it on every path
    ///
    /// When `f` fails, its error is returned and a release failure is only
    /// logged. When `f` succeeds, a release failure is returned instead of
    /// the value.
    pub fn run<D, T, F>(data_source: &'a D, f: F) -> Result<T>
    where
        D: DataSource + ?Sized,
        F: FnOnce(&dyn Connection) -> Result<T>,
    {
        let scoped = Self::acquire(data_source)?;
        let outcome = f(&*scoped);
        match outcome {
            Ok(value) => {
                scoped.release()?;
                Ok(value)
            }
            Err(err) => {
                if let Err(release_err) = scoped.release() {
                    tracing::warn!(
                        error = %release_err,
                        "failed to release connection while propagating an earlier error"
                    );
                }
                Err(err)
            }
        }
    }

    /// Release the connection now and report the outcome
    pub fn release(mut self) -> Result<()> {
        match self.connection.take() {
            Some(connection) => connection.close(),
            None => Ok(()),
        }
    }
}

impl<'a> Deref for ScopedConnection<'a> {
    type Target = dyn Connection + 'a;

    fn deref(&self) -> &Self::Target {
        // Only `release` empties the slot and it consumes the guard.
        match self.connection.as_deref() {
            Some(connection) => connection,
            None => unreachable!("scoped connection used after release"),
        }
    }
}

impl Drop for ScopedConnection<'_> {
    fn drop(&mut self) {
        if let Some(connection) = self.connection.take() {
            if let Err(err) = connection.close() {
                tracing::warn!(error = %err, "failed to release scoped connection");
            }
        }
    }
}
