//! SQLite database driver implementation

mod connection;
mod driver;
mod schema;

pub use connection::SqliteConnection;
pub use driver::SqliteDriver;
