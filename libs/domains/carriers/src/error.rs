use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use document_store::StoreError;
use document_store::bson::oid::ObjectId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CarrierError {
    #[error("Carrier not found: {0}")]
    NotFound(ObjectId),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type CarrierResult<T> = Result<T, CarrierError>;

impl From<CarrierError> for AppError {
    fn from(err: CarrierError) -> Self {
        match err {
            CarrierError::NotFound(id) => AppError::NotFound(format!("Carrier {} not found", id)),
            CarrierError::Validation(msg) => AppError::BadRequest(msg),
            CarrierError::Store(err) => err.into(),
        }
    }
}

impl IntoResponse for CarrierError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
