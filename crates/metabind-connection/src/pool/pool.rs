//! Connection pool implementation

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use metabind_core::{Connection, DataSource, MetabindError, Result, SchemaIntrospection};
use parking_lot::{Condvar, Mutex};

use super::config::PoolConfig;
use super::stats::PoolStats;

/// Factory trait for creating new connections
pub trait ConnectionFactory: Send + Sync + 'static {
    /// Create a new connection
    fn create(&self) -> Result<Arc<dyn Connection>>;

    /// Validate that an idle connection is still usable
    ///
    /// Default implementation checks the closed flag and pings.
    fn validate(&self, conn: &dyn Connection) -> bool {
        !conn.is_closed() && conn.ping().is_ok()
    }
}

impl<T: ConnectionFactory> ConnectionFactory for Arc<T> {
    fn create(&self) -> Result<Arc<dyn Connection>> {
        (**self).create()
    }

    fn validate(&self, conn: &dyn Connection) -> bool {
        (**self).validate(conn)
    }
}

/// An idle connection with its lifecycle timestamps
struct IdleConnection {
    connection: Arc<dyn Connection>,
    created_at: Instant,
    last_used_at: Instant,
}

#[derive(Default)]
struct PoolState {
    idle: VecDeque<IdleConnection>,
    /// Borrowed connections plus slots reserved while opening or validating
    active: usize,
    waiting: usize,
}

/// A blocking pool of database connections
///
/// At most `max_size` connections are alive at once. Callers that find the
/// pool exhausted block until a connection is returned or the acquire
/// timeout passes.
pub struct ConnectionPool {
    config: PoolConfig,
    factory: Arc<dyn ConnectionFactory>,
    state: Mutex<PoolState>,
    /// Signalled whenever a slot frees up
    available: Condvar,
}

enum Checkout {
    Idle(IdleConnection),
    Create,
}

impl ConnectionPool {
    /// Create a new connection pool with the given configuration and factory
    pub fn new<F: ConnectionFactory>(config: PoolConfig, factory: F) -> Self {
        Self {
            config,
            factory: Arc::new(factory),
            state: Mutex::new(PoolState::default()),
            available: Condvar::new(),
        }
    }

    /// Get a connection from the pool
    ///
    /// Idle connections are reused first; expired or invalid ones are closed
    /// and skipped. Below `max_size` a new connection is opened. Otherwise the
    /// call blocks until a connection comes back, failing with
    /// [`MetabindError::Timeout`] after the acquire timeout.
    #[tracing::instrument(skip(self), fields(max_size = self.config.max_size()))]
    pub fn get(&self) -> Result<PooledConnection<'_>> {
        let deadline = Instant::now().checked_add(self.config.acquire_timeout());

        loop {
            match self.reserve(deadline)? {
                Checkout::Idle(idle) => {
                    if let Some(reason) = self.eviction_reason(&idle) {
                        tracing::debug!(reason, "discarding pooled connection");
                        self.discard(idle.connection);
                        continue;
                    }
                    tracing::trace!("reusing idle connection");
                    return Ok(PooledConnection::new(self, idle.connection, idle.created_at));
                }
                Checkout::Create => {
                    let connection = self.factory.create().inspect_err(|e| {
                        tracing::warn!(error = %e, "failed to open pooled connection");
                        self.release_slot();
                    })?;
                    tracing::debug!("opened pooled connection");
                    return Ok(PooledConnection::new(self, connection, Instant::now()));
                }
            }
        }
    }

    /// Reserve a slot, waiting for one if the pool is exhausted
    ///
    /// A `None` deadline waits indefinitely.
    fn reserve(&self, deadline: Option<Instant>) -> Result<Checkout> {
        let mut state = self.state.lock();
        state.waiting += 1;

        loop {
            if let Some(idle) = state.idle.pop_front() {
                state.active += 1;
                state.waiting -= 1;
                return Ok(Checkout::Idle(idle));
            }
            if state.idle.len() + state.active < self.config.max_size() {
                state.active += 1;
                state.waiting -= 1;
                return Ok(Checkout::Create);
            }
            let Some(deadline) = deadline else {
                self.available.wait(&mut state);
                continue;
            };
            if self.available.wait_until(&mut state, deadline).timed_out() {
                state.waiting -= 1;
                tracing::warn!(active = state.active, "timed out waiting for a pooled connection");
                return Err(MetabindError::Timeout(format!(
                    "Timed out waiting for connection (timeout: {:?})",
                    self.config.acquire_timeout()
                )));
            }
        }
    }

    fn eviction_reason(&self, idle: &IdleConnection) -> Option<&'static str> {
        if let Some(max_lifetime) = self.config.max_lifetime() {
            if idle.created_at.elapsed() > max_lifetime {
                return Some("max lifetime exceeded");
            }
        }
        if idle.last_used_at.elapsed() > self.config.idle_timeout() {
            return Some("idle timeout exceeded");
        }
        if !self.factory.validate(&*idle.connection) {
            return Some("validation failed");
        }
        None
    }

    /// Close a connection whose slot is reserved and free the slot
    fn discard(&self, connection: Arc<dyn Connection>) {
        if let Err(e) = connection.close() {
            tracing::debug!(error = %e, "failed to close discarded connection");
        }
        self.release_slot();
    }

    fn release_slot(&self) {
        self.state.lock().active -= 1;
        self.available.notify_one();
    }

    /// Return a borrowed connection to the pool
    fn return_connection(&self, connection: Arc<dyn Connection>, created_at: Instant) {
        if connection.is_closed() {
            tracing::debug!("dropping closed connection instead of pooling it");
            self.release_slot();
            return;
        }

        {
            let mut state = self.state.lock();
            state.active -= 1;
            state.idle.push_back(IdleConnection {
                connection,
                created_at,
                last_used_at: Instant::now(),
            });
        }
        self.available.notify_one();
    }

    /// Get current pool statistics
    pub fn stats(&self) -> PoolStats {
        let state = self.state.lock();
        PoolStats::new(
            state.idle.len(),
            state.active,
            state.waiting,
            self.config.max_size(),
        )
    }

    /// Get the pool configuration
    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Close all idle connections in the pool
    pub fn close_idle(&self) {
        let connections: Vec<_> = self.state.lock().idle.drain(..).collect();
        tracing::debug!(count = connections.len(), "closing idle connections");

        for idle in connections {
            if let Err(e) = idle.connection.close() {
                tracing::warn!(error = %e, "failed to close idle connection");
            }
        }
        self.available.notify_all();
    }
}

impl DataSource for ConnectionPool {
    fn get_connection(&self) -> Result<Box<dyn Connection + '_>> {
        Ok(Box::new(self.get()?))
    }
}

/// A connection borrowed from the pool
///
/// `close` hands the connection back to the pool instead of closing it; so
/// does dropping it. After that the handle reports itself closed and every
/// call fails.
pub struct PooledConnection<'a> {
    connection: Arc<dyn Connection>,
    pool: &'a ConnectionPool,
    created_at: Instant,
    returned: AtomicBool,
}

impl<'a> PooledConnection<'a> {
    fn new(pool: &'a ConnectionPool, connection: Arc<dyn Connection>, created_at: Instant) -> Self {
        Self {
            connection,
            pool,
            created_at,
            returned: AtomicBool::new(false),
        }
    }

    fn live(&self) -> Result<&dyn Connection> {
        if self.returned.load(Ordering::SeqCst) {
            return Err(MetabindError::Connection(
                "connection has been returned to the pool".into(),
            ));
        }
        Ok(&*self.connection)
    }

    fn give_back(&self) {
        if !self.returned.swap(true, Ordering::SeqCst) {
            self.pool
                .return_connection(Arc::clone(&self.connection), self.created_at);
        }
    }
}

impl Connection for PooledConnection<'_> {
    fn driver_name(&self) -> &str {
        self.connection.driver_name()
    }

    fn catalog(&self) -> Result<Option<String>> {
        self.live()?.catalog()
    }

    fn schema(&self) -> Result<Option<String>> {
        self.live()?.schema()
    }

    fn ping(&self) -> Result<()> {
        self.live()?.ping()
    }

    fn close(&self) -> Result<()> {
        self.give_back();
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.returned.load(Ordering::SeqCst) || self.connection.is_closed()
    }

    fn as_schema_introspection(&self) -> Option<&dyn SchemaIntrospection> {
        self.live().ok()?.as_schema_introspection()
    }
}

impl Drop for PooledConnection<'_> {
    fn drop(&mut self) {
        self.give_back();
    }
}
