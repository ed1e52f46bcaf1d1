//! JSON extractor with automatic validation using the validator crate.

use crate::errors::AppError;
use axum::{
    extract::{FromRequest, Json, Request},
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use validator::Validate;

/// JSON body that has passed its `Validate` rules.
///
/// Malformed JSON and failed rules both answer 400; the latter lists the
/// offending fields under `details`.
///
/// ```ignore
/// #[derive(Deserialize, Validate)]
/// struct CreateCarrier {
///     #[validate(length(min = 1))]
///     name: String,
///     #[validate(range(min = 0.0))]
///     costs: f64,
/// }
///
/// async fn create(ValidatedJson(input): ValidatedJson<CreateCarrier>) -> String {
///     input.name
/// }
/// ```
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::from(e).into_response())?;

        data.validate()
            .map_err(|e| AppError::from(e).into_response())?;

        Ok(ValidatedJson(data))
    }
}
