use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use document_store::StoreError;
use document_store::bson::oid::ObjectId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("User not found: {0}")]
    NotFound(ObjectId),

    #[error("Email '{0}' is already registered")]
    EmailTaken(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Password hashing failed: {0}")]
    PasswordHash(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type UserResult<T> = Result<T, UserError>;

impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(id) => AppError::NotFound(format!("User {} not found", id)),
            UserError::EmailTaken(email) => {
                AppError::Conflict(format!("Email '{}' is already registered", email))
            }
            UserError::Validation(msg) => AppError::BadRequest(msg),
            UserError::PasswordHash(msg) => {
                tracing::error!("Password hashing failed: {}", msg);
                AppError::InternalServerError("Failed to process password".to_string())
            }
            UserError::Store(err) => err.into(),
        }
    }
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
