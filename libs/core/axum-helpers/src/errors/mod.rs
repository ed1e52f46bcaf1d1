pub mod codes;
pub mod handlers;
pub mod responses;

pub use codes::ErrorCode;

use axum::{
    Json,
    extract::multipart::MultipartError,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use document_store::StoreError;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use utoipa::ToSchema;
use validator::{ValidationErrors, ValidationErrorsKind};

/// Body of every error response.
///
/// ```json
/// {
///   "code": 1008,
///   "error": "CONFLICT",
///   "message": "User with email mario@example.com already exists"
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Integer error code for logging and monitoring
    pub code: i32,
    /// Machine-readable error identifier
    pub error: String,
    /// Human-readable error message
    pub message: String,
    /// Per-field validation errors, when there are any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ErrorResponse {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code.code(),
            error: code.as_str().to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }
}

/// Application error type that can be converted to HTTP responses.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("JSON parsing error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON extraction error: {0}")]
    JsonExtractorRejection(#[from] JsonRejection),

    #[error("Query string error: {0}")]
    QueryRejection(#[from] QueryRejection),

    #[error("Multipart error: {0}")]
    Multipart(#[from] MultipartError),

    #[error("Validation error: {0}")]
    ValidationError(#[from] ValidationErrors),

    #[error("Invalid ObjectId: {0}")]
    InvalidObjectId(String),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Database unavailable: {0}")]
    DatabaseUnavailable(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Internal Server Error: {0}")]
    InternalServerError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, details, code) = match self {
            AppError::SerdeJson(e) => {
                tracing::error!(
                    error_code = ErrorCode::SerdeJsonError.code(),
                    "JSON parsing error: {:?}",
                    e
                );
                internal(ErrorCode::SerdeJsonError)
            }
            AppError::Io(e) => {
                tracing::error!(error_code = ErrorCode::IoError.code(), "I/O error: {:?}", e);
                internal(ErrorCode::IoError)
            }
            AppError::JsonExtractorRejection(e) => {
                tracing::warn!(
                    error_code = ErrorCode::JsonExtraction.code(),
                    "JSON extraction error: {:?}",
                    e
                );
                (e.status(), e.body_text(), None, ErrorCode::JsonExtraction)
            }
            AppError::QueryRejection(e) => {
                tracing::info!(
                    error_code = ErrorCode::InvalidQuery.code(),
                    "Query string error: {}",
                    e
                );
                (e.status(), e.body_text(), None, ErrorCode::InvalidQuery)
            }
            AppError::Multipart(e) => {
                tracing::info!(
                    error_code = ErrorCode::InvalidMultipart.code(),
                    "Multipart error: {}",
                    e
                );
                (e.status(), e.body_text(), None, ErrorCode::InvalidMultipart)
            }
            AppError::ValidationError(e) => {
                tracing::info!(
                    error_code = ErrorCode::ValidationError.code(),
                    "Validation error: {}",
                    e
                );
                (
                    StatusCode::BAD_REQUEST,
                    ErrorCode::ValidationError.default_message().to_string(),
                    Some(validation_details(&e)),
                    ErrorCode::ValidationError,
                )
            }
            AppError::InvalidObjectId(raw) => {
                tracing::info!(
                    error_code = ErrorCode::InvalidObjectId.code(),
                    "Invalid ObjectId: {}",
                    raw
                );
                (
                    StatusCode::BAD_REQUEST,
                    format!("Invalid ObjectId: {raw}"),
                    None,
                    ErrorCode::InvalidObjectId,
                )
            }
            AppError::BadRequest(msg) => {
                tracing::info!("Bad request: {}", msg);
                (StatusCode::BAD_REQUEST, msg, None, ErrorCode::BadRequest)
            }
            AppError::NotFound(msg) => {
                tracing::info!(
                    error_code = ErrorCode::NotFound.code(),
                    "Not found: {}",
                    msg
                );
                (StatusCode::NOT_FOUND, msg, None, ErrorCode::NotFound)
            }
            AppError::Conflict(msg) => {
                tracing::info!("Conflict: {}", msg);
                (StatusCode::CONFLICT, msg, None, ErrorCode::Conflict)
            }
            AppError::Database(msg) => {
                tracing::error!(
                    error_code = ErrorCode::DatabaseError.code(),
                    "Database error: {}",
                    msg
                );
                internal(ErrorCode::DatabaseError)
            }
            AppError::DatabaseUnavailable(msg) => {
                tracing::error!(
                    error_code = ErrorCode::DatabaseUnavailable.code(),
                    "Database unavailable: {}",
                    msg
                );
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    ErrorCode::DatabaseUnavailable.default_message().to_string(),
                    None,
                    ErrorCode::DatabaseUnavailable,
                )
            }
            AppError::Decode(msg) => {
                tracing::error!(
                    error_code = ErrorCode::DatabaseDecode.code(),
                    "Decode error: {}",
                    msg
                );
                internal(ErrorCode::DatabaseDecode)
            }
            AppError::InternalServerError(msg) => {
                tracing::error!(
                    error_code = ErrorCode::InternalError.code(),
                    "Internal server error: {}",
                    msg
                );
                internal(ErrorCode::InternalError)
            }
        };

        let mut body = ErrorResponse::new(code, message);
        body.details = details;

        (status, Json(body)).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::InvalidReference(raw) => AppError::InvalidObjectId(raw),
            StoreError::Connection(e) => AppError::DatabaseUnavailable(e.to_string()),
            StoreError::Decode(e) => AppError::Decode(e.to_string()),
            StoreError::Duplicate { collection, reason } => {
                tracing::info!(%collection, %reason, "Duplicate value rejected");
                AppError::Conflict(ErrorCode::Conflict.default_message().to_string())
            }
            other => AppError::Database(other.to_string()),
        }
    }
}

/// Server-side failures never leak their cause to the client
fn internal(code: ErrorCode) -> (StatusCode, String, Option<Value>, ErrorCode) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        code.default_message().to_string(),
        None,
        code,
    )
}

/// Field name to list of `{code, message, params}`, nested for structs
pub fn validation_details(errors: &ValidationErrors) -> Value {
    let details = errors
        .errors()
        .iter()
        .map(|(field, kind)| {
            let value = match kind {
                ValidationErrorsKind::Field(errors) => errors
                    .iter()
                    .map(|err| {
                        serde_json::json!({
                            "code": err.code,
                            "message": err.message,
                            "params": err.params,
                        })
                    })
                    .collect(),
                ValidationErrorsKind::Struct(nested) => validation_details(nested),
                ValidationErrorsKind::List(items) => Value::Object(
                    items
                        .iter()
                        .map(|(index, nested)| (index.to_string(), validation_details(nested)))
                        .collect(),
                ),
            };
            (wire_name(field), value)
        })
        .collect::<serde_json::Map<_, _>>();

    Value::Object(details)
}

/// Request bodies and query strings are camelCase, so `per_page` is
/// reported as `perPage`
fn wire_name(field: &str) -> String {
    let mut name = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' && !name.is_empty() {
            upper = true;
        } else if upper {
            name.push(c.to_ascii_uppercase());
            upper = false;
        } else {
            name.push(c);
        }
    }
    name
}
