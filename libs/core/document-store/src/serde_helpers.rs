//! Identifier helpers.
//!
//! Records are decoded from BSON, where `_id` is a native ObjectId, and
//! encoded to JSON, where clients expect the 24-character hex form.

use mongodb::bson::oid::ObjectId;
use serde::Serializer;

use crate::error::StoreError;

/// Parse a client-supplied hex id
pub fn parse_object_id(raw: &str) -> Result<ObjectId, StoreError> {
    ObjectId::parse_str(raw.trim()).map_err(|_| StoreError::InvalidReference(raw.to_string()))
}

/// `#[serde(serialize_with = "object_id_hex::serialize")]`
pub mod object_id_hex {
    use super::*;

    pub fn serialize<S: Serializer>(id: &ObjectId, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&id.to_hex())
    }
}

/// Same as [`object_id_hex`] for optional references
pub mod option_object_id_hex {
    use super::*;

    pub fn serialize<S: Serializer>(
        id: &Option<ObjectId>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match id {
            Some(id) => serializer.serialize_some(&id.to_hex()),
            None => serializer.serialize_none(),
        }
    }
}
