use document_store::bson::oid::ObjectId;
use document_store::object_id_hex;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Menu category as stored in the `categories` collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(rename = "_id", serialize_with = "object_id_hex::serialize")]
    #[schema(value_type = String, example = "65f1c0ffee0ddba11c0ffee1")]
    pub id: ObjectId,
    #[schema(example = "Pizze")]
    pub name: String,
    #[serde(default)]
    #[schema(example = "pizze")]
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "/assets/category/65f1c0ffee0ddba11c0ffee1.jpg")]
    pub image_url: Option<String>,
    /// Present only when listing with `deleted=true`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCategory {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
}

/// Renaming always recomputes the slug, so the name is required
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateCategory {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
}

/// Multipart body of create and update, for the OpenAPI document
#[derive(ToSchema)]
pub struct CategoryForm {
    #[schema(example = "Pizze")]
    pub name: String,
    #[schema(value_type = Option<String>, format = Binary)]
    pub image: Option<Vec<u8>>,
}

/// Extra listing filters for categories
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CategoryScope {
    /// Only categories with exactly this slug
    pub slug: Option<String>,
}

/// Image file received with a create or update
#[derive(Debug, Clone)]
pub struct ImageUpload {
    /// Name the client gave the file; only its extension is kept
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// What happened to the image of a category write.
///
/// The image is written after the record, so a failure here leaves the
/// category in place without `imageUrl`.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum ImageOutcome {
    /// No image was sent
    None,
    Stored { url: String },
    Failed { reason: String },
}

/// Result of a category create or update
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CategoryWrite {
    #[serde(serialize_with = "object_id_hex::serialize")]
    #[schema(value_type = String)]
    pub id: ObjectId,
    pub image: ImageOutcome,
}
