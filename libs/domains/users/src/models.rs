use document_store::bson::oid::ObjectId;
use document_store::object_id_hex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// User roles
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

/// User as stored in the `users` collection
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub email: String,
    /// Argon2 PHC string
    #[serde(default)]
    pub password_hash: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub deleted: Option<bool>,
}

/// User as the API returns it; the password hash never leaves the service
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[serde(rename = "_id", serialize_with = "object_id_hex::serialize")]
    #[schema(value_type = String, example = "65f1c0ffee0ddba11c0ffee3")]
    pub id: ObjectId,
    #[schema(example = "mario.rossi@example.com")]
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    /// Present only when listing with `deleted=true`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted: Option<bool>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            role: user.role,
            deleted: user.deleted,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUser {
    #[validate(email(message = "email must be an email"))]
    #[schema(example = "mario.rossi@example.com")]
    pub email: String,
    #[validate(length(min = 8, message = "password should be at least 8 characters"))]
    pub password: String,
    #[validate(must_match(other = "password", message = "passwords do not match"))]
    pub confirm_password: String,
    #[validate(length(min = 1, message = "firstName is required"))]
    #[schema(example = "Mario")]
    pub first_name: String,
    #[validate(length(min = 1, message = "lastName is required"))]
    #[schema(example = "Rossi")]
    pub last_name: String,
}
