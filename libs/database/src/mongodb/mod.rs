//! MongoDB connector

mod config;
mod connector;
mod health;

pub use config::{DEFAULT_DATABASE, MongoConfig};
pub use connector::{connect, connect_from_config, connect_from_config_with_retry};
pub use health::ping;

pub use mongodb::{Client, Database};
