use axum::extract::multipart::MultipartError;
use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use document_store::StoreError;
use document_store::bson::oid::ObjectId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CategoryError {
    #[error("Category not found: {0}")]
    NotFound(ObjectId),

    #[error("No category with slug '{0}'")]
    SlugNotFound(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error(transparent)]
    Multipart(#[from] MultipartError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type CategoryResult<T> = Result<T, CategoryError>;

impl From<CategoryError> for AppError {
    fn from(err: CategoryError) -> Self {
        match err {
            CategoryError::NotFound(id) => {
                AppError::NotFound(format!("Category {} not found", id))
            }
            CategoryError::SlugNotFound(slug) => {
                AppError::NotFound(format!("No category with slug '{}'", slug))
            }
            CategoryError::Validation(msg) => AppError::BadRequest(msg),
            CategoryError::Multipart(err) => AppError::Multipart(err),
            CategoryError::Store(err) => err.into(),
        }
    }
}

impl IntoResponse for CategoryError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
