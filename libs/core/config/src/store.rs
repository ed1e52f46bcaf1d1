use crate::{env_or_default, ConfigError, FromEnv};
use std::fmt;
use std::str::FromStr;

/// Which document store the service runs against
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StoreBackend {
    #[default]
    MongoDb,
    /// Process-local store, data is lost on restart
    Memory,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "mongodb" | "mongo" => Ok(StoreBackend::MongoDb),
            "memory" | "in-memory" => Ok(StoreBackend::Memory),
            other => Err(format!("unknown store backend '{other}', expected mongodb or memory")),
        }
    }
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreBackend::MongoDb => f.write_str("mongodb"),
            StoreBackend::Memory => f.write_str("memory"),
        }
    }
}

impl FromEnv for StoreBackend {
    /// STORE_BACKEND: `mongodb` (default) or `memory`
    fn from_env() -> Result<Self, ConfigError> {
        env_or_default("STORE_BACKEND", "mongodb")
            .parse()
            .map_err(|details| ConfigError::ParseError {
                key: "STORE_BACKEND".to_string(),
                details,
            })
    }
}
