//! Error types for metabind

use thiserror::Error;

/// Core error type for metabind operations
///
/// Every failure raised while acquiring a connection, running an
/// introspection call or loading column/index metadata is one of these.
/// A table that does not exist is never an error; loaders report it as
/// an absent result instead.
#[derive(Error, Debug)]
pub enum MetabindError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Query error: {0}")]
    Query(String),

    #[error("Driver error: {0}")]
    Driver(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Not supported: {0}")]
    NotSupported(String),

    #[error("Timeout: {0}")]
    Timeout(String),
}

/// Result type alias for metabind operations
pub type Result<T> = std::result::Result<T, MetabindError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let cases = [
            (MetabindError::Connection("refused".into()), "Connection error: refused"),
            (MetabindError::Query("syntax".into()), "Query error: syntax"),
            (MetabindError::Driver("unknown".into()), "Driver error: unknown"),
            (MetabindError::Configuration("bad".into()), "Configuration error: bad"),
            (MetabindError::NotSupported("introspection".into()), "Not supported: introspection"),
            (MetabindError::Timeout("30s".into()), "Timeout: 30s"),
        ];
        for (error, expected) in cases {
            assert_eq!(error.to_string(), expected);
        }
    }
}
