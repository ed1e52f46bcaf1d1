use database::DatabaseError;
use mongodb::bson;
use thiserror::Error;

/// Store-level errors
#[derive(Error, Debug)]
pub enum StoreError {
    /// A write was not acknowledged or the driver rejected it
    #[error("{operation} on '{collection}' failed: {reason}")]
    Persistence {
        operation: &'static str,
        collection: String,
        reason: String,
    },

    /// A write repeated a value of a unique field
    #[error("duplicate value in '{collection}': {reason}")]
    Duplicate { collection: String, reason: String },

    /// A read (count, fetch, lookup) failed
    #[error("query on '{collection}' failed: {reason}")]
    Query { collection: String, reason: String },

    /// A supplied identifier is not a valid ObjectId
    #[error("invalid identifier: {0}")]
    InvalidReference(String),

    #[error("encode error: {0}")]
    Encode(#[from] bson::ser::Error),

    #[error("decode error: {0}")]
    Decode(#[from] bson::de::Error),

    #[error("connection error: {0}")]
    Connection(#[from] DatabaseError),
}

pub type StoreResult<T> = Result<T, StoreError>;

impl StoreError {
    pub(crate) fn persistence(
        operation: &'static str,
        collection: &str,
        reason: impl ToString,
    ) -> Self {
        StoreError::Persistence {
            operation,
            collection: collection.to_string(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn query(collection: &str, reason: impl ToString) -> Self {
        StoreError::Query {
            collection: collection.to_string(),
            reason: reason.to_string(),
        }
    }
}
