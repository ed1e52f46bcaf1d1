use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use document_store::StoreError;
use document_store::bson::oid::ObjectId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProductError {
    #[error("Product not found: {0}")]
    NotFound(ObjectId),

    /// `categorySlug` named no category
    #[error("No category with slug '{0}'")]
    CategoryNotFound(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type ProductResult<T> = Result<T, ProductError>;

impl From<ProductError> for AppError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::NotFound(id) => AppError::NotFound(format!("Product {} not found", id)),
            ProductError::CategoryNotFound(slug) => {
                AppError::NotFound(format!("No category with slug '{}'", slug))
            }
            ProductError::Validation(msg) => AppError::BadRequest(msg),
            ProductError::Store(err) => err.into(),
        }
    }
}

impl IntoResponse for ProductError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
