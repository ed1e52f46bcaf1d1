/// Errors raised while establishing or checking a database connection
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    /// Driver-level failure (bad URL, DNS, auth, server selection)
    #[cfg(feature = "mongodb")]
    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    /// The client was created but the server did not answer
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Health check failed: {0}")]
    HealthCheckFailed(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type alias for database operations
pub type DatabaseResult<T> = Result<T, DatabaseError>;
