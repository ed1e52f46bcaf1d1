use document_store::bson::oid::ObjectId;
use document_store::{object_id_hex, option_object_id_hex};
use domain_categories::Category;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Product as stored in the `products` collection, with its category
/// joined in when one exists
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductWithCategory {
    #[serde(rename = "_id", serialize_with = "object_id_hex::serialize")]
    #[schema(value_type = String, example = "65f1c0ffee0ddba11c0ffee2")]
    pub id: ObjectId,
    #[schema(example = "Diavola")]
    pub name: String,
    #[serde(default)]
    #[schema(example = 8.5)]
    pub price: f64,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "option_object_id_hex::serialize"
    )]
    #[schema(value_type = Option<String>, example = "65f1c0ffee0ddba11c0ffee1")]
    pub category_id: Option<ObjectId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "Pomodoro, mozzarella, salame piccante")]
    pub description_short: Option<String>,
    /// Missing when the product has no category or it no longer exists
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    /// Present only when listing with `deleted=true`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProduct {
    #[validate(length(min = 1, message = "name should be at least 1 character"))]
    #[schema(example = "Diavola")]
    pub name: String,
    #[validate(range(min = 0.01, message = "price should be >= 0.01"))]
    #[schema(example = 8.5)]
    pub price: f64,
    /// ObjectId of the category, as hex
    #[schema(example = "65f1c0ffee0ddba11c0ffee1")]
    pub category_id: String,
    pub description_short: Option<String>,
}

/// Only the fields present are changed
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProduct {
    #[validate(length(min = 1, message = "name should be at least 1 character"))]
    pub name: Option<String>,
    #[validate(range(min = 0.01, message = "price should be >= 0.01"))]
    pub price: Option<f64>,
    pub category_id: Option<String>,
    pub description_short: Option<String>,
}

/// Extra listing filters for products
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query, rename_all = "camelCase")]
pub struct ProductScope {
    /// Only products of the category with this slug
    pub category_slug: Option<String>,
}
