use document_store::bson::oid::ObjectId;
use document_store::object_id_hex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Shipping carrier as stored in the `carriers` collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Carrier {
    #[serde(rename = "_id", serialize_with = "object_id_hex::serialize")]
    #[schema(value_type = String, example = "65f1c0ffee0ddba11c0ffee1")]
    pub id: ObjectId,
    pub name: String,
    /// Shipping cost per order
    #[serde(default)]
    pub costs: f64,
    /// Present only when listing with `deleted=true`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCarrier {
    #[validate(length(min = 1, message = "name should be at least 1 character"))]
    #[schema(example = "DHL Express")]
    pub name: String,
    #[validate(range(min = 0.0, message = "costs should be >= 0.00"))]
    #[schema(example = 6.9)]
    pub costs: f64,
}

/// Only the fields present are changed
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCarrier {
    #[validate(length(min = 1, message = "name should be at least 1 character"))]
    pub name: Option<String>,
    #[validate(range(min = 0.0, message = "costs should be >= 0.00"))]
    pub costs: Option<f64>,
}
