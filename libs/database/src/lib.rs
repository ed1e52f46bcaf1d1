//! Connection plumbing for the document database.
//!
//! The menu service keeps its data in MongoDB. This crate owns everything
//! that happens before a query is sent: configuration, connecting with
//! retry and backoff, and liveness pings. Query building lives in
//! `document_store`.
//!
//! # Features
//!
//! - `mongodb` (default) - MongoDB connector
//! - `config` - `core_config::FromEnv` support for [`mongodb::MongoConfig`]
//!
//! # Example
//!
//! ```ignore
//! use database::mongodb::{MongoConfig, connect_from_config_with_retry};
//!
//! let config = MongoConfig::with_database("mongodb://localhost:27017", "menu");
//! let client = connect_from_config_with_retry(&config, None).await?;
//! let db = client.database(config.database());
//! ```

pub mod common;

#[cfg(feature = "mongodb")]
pub mod mongodb;

pub use common::{DatabaseError, DatabaseResult};
