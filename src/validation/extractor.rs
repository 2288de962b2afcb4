use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
};
use serde::Deserialize;
use validator::Validate;

use super::format_validation_errors;
use crate::error::WeirError;

fn validation_failed(errors: validator::ValidationErrors) -> WeirError {
    WeirError::bad_request(format!(
        "Validation failed: {}",
        format_validation_errors(&errors)
    ))
}

/// Wrapper for a validated JSON request body
///
/// Deserializes the body and rejects with a 400 when either the JSON or the
/// validation rules fail.
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: for<'de> Deserialize<'de> + Validate + Send,
    S: Send + Sync,
{
    type Rejection = WeirError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| WeirError::bad_request(format!("Invalid JSON: {}", e)))?;

        value.validate().map_err(validation_failed)?;

        Ok(ValidatedJson(value))
    }
}

/// Wrapper for validated query parameters
pub struct ValidatedQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: for<'de> Deserialize<'de> + Validate + Send,
    S: Send + Sync,
{
    type Rejection = WeirError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let query_string = parts.uri.query().unwrap_or("");
        let value: T = serde_urlencoded::from_str(query_string)
            .map_err(|e| WeirError::bad_request(format!("Invalid query parameters: {}", e)))?;

        value.validate().map_err(validation_failed)?;

        Ok(ValidatedQuery(value))
    }
}

/// Wrapper for validated path parameters
pub struct ValidatedPath<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidatedPath<T>
where
    T: for<'de> Deserialize<'de> + Validate + Send,
    S: Send + Sync,
{
    type Rejection = WeirError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| WeirError::bad_request(format!("Invalid path parameters: {}", e)))?;

        value.validate().map_err(validation_failed)?;

        Ok(ValidatedPath(value))
    }
}
