//! SQLite connection implementation

use metabind_core::{Connection, MetabindError, Result, SchemaIntrospection};
use parking_lot::Mutex;
use rusqlite::{Connection as RusqliteConnection, OpenFlags};

/// Catalog SQLite reports for the primary database file
pub(crate) const MAIN_CATALOG: &str = "main";

/// SQLite connection wrapper
pub struct SqliteConnection {
    conn: Mutex<Option<RusqliteConnection>>,
    path: String,
}

impl SqliteConnection {
    /// Open a SQLite database
    pub fn open(path: &str) -> Result<Self> {
        tracing::info!(path = %path, "opening SQLite database");
        let expanded_path = Self::expand_path(path)?;

        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_CREATE
            | OpenFlags::SQLITE_OPEN_URI
            | OpenFlags::SQLITE_OPEN_NO_MUTEX;

        let conn = if path == ":memory:" {
            RusqliteConnection::open_in_memory().map_err(|e| {
                MetabindError::Connection(format!("Failed to open in-memory database: {}", e))
            })?
        } else {
            if !expanded_path.starts_with("file:") {
                let file_path = std::path::Path::new(&expanded_path);
                if let Some(parent) = file_path.parent() {
                    if !parent.exists() {
                        return Err(MetabindError::Connection(format!(
                            "Parent directory does not exist: {}",
                            parent.display()
                        )));
                    }
                }
            }

            RusqliteConnection::open_with_flags(&expanded_path, flags).map_err(|e| {
                MetabindError::Connection(format!(
                    "Failed to open SQLite database at '{}': {}",
                    expanded_path, e
                ))
            })?
        };

        conn.pragma_update(None, "foreign_keys", "ON").map_err(|e| {
            MetabindError::Connection(format!("Failed to enable foreign keys: {}", e))
        })?;

        tracing::debug!(path = %expanded_path, "SQLite database connection established");
        Ok(Self {
            conn: Mutex::new(Some(conn)),
            path: expanded_path,
        })
    }

    /// Expand `~/` and make relative paths absolute
    fn expand_path(path: &str) -> Result<String> {
        if path == ":memory:" || path.starts_with("file:") {
            return Ok(path.to_string());
        }

        let expanded = if let Some(rest) = path.strip_prefix("~/") {
            match std::env::var_os("HOME") {
                Some(home) => std::path::PathBuf::from(home)
                    .join(rest)
                    .to_string_lossy()
                    .to_string(),
                None => {
                    return Err(MetabindError::Configuration(
                        "Unable to determine HOME directory".into(),
                    ));
                }
            }
        } else if path.starts_with('~') {
            return Err(MetabindError::Configuration(
                "User-specific home directories (~user) are not supported".into(),
            ));
        } else {
            path.to_string()
        };

        let path_buf = std::path::PathBuf::from(&expanded);
        if path_buf.is_relative() {
            Ok(std::env::current_dir()?
                .join(path_buf)
                .to_string_lossy()
                .to_string())
        } else {
            Ok(expanded)
        }
    }

    /// Path the connection was opened with, after expansion
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Execute several SQL statements, e.g. a schema script
    pub fn execute_batch(&self, sql: &str) -> Result<()> {
        tracing::debug!("executing SQL batch");
        self.with_connection(|conn| conn.execute_batch(sql))
            .map_err(|e| MetabindError::Query(format!("Failed to execute batch: {}", e)))
    }

    /// Run `f` against the open rusqlite connection
    ///
    /// Fails with a connection error once the connection has been closed.
    pub(crate) fn with_connection<T>(
        &self,
        f: impl FnOnce(&RusqliteConnection) -> rusqlite::Result<T>,
    ) -> Result<T> {
        let guard = self.conn.lock();
        let conn = guard
            .as_ref()
            .ok_or_else(|| MetabindError::Connection("SQLite connection is closed".into()))?;
        f(conn).map_err(|e| MetabindError::Query(e.to_string()))
    }
}

impl Connection for SqliteConnection {
    fn driver_name(&self) -> &str {
        "sqlite"
    }

    fn catalog(&self) -> Result<Option<String>> {
        Ok(Some(MAIN_CATALOG.to_string()))
    }

    fn schema(&self) -> Result<Option<String>> {
        Ok(None)
    }

    fn ping(&self) -> Result<()> {
        self.with_connection(|conn| conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0)))
            .map(|_| ())
    }

    #[tracing::instrument(skip(self), fields(path = %self.path))]
    fn close(&self) -> Result<()> {
        let Some(conn) = self.conn.lock().take() else {
            return Ok(());
        };
        conn.close().map_err(|(_, e)| {
            tracing::error!(error = %e, "failed to close SQLite connection");
            MetabindError::Connection(format!("Failed to close SQLite connection: {}", e))
        })?;
        tracing::debug!("SQLite connection closed");
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.conn.lock().is_none()
    }

    fn as_schema_introspection(&self) -> Option<&dyn SchemaIntrospection> {
        Some(self)
    }
}
