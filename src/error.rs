use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::response::MessageResponse;

/// The main error type for Weir utilities
#[derive(Debug, thiserror::Error)]
pub enum WeirError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Too many requests: {0}")]
    TooManyRequests(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl WeirError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn store_unavailable(msg: impl Into<String>) -> Self {
        Self::StoreUnavailable(msg.into())
    }

    pub fn too_many_requests(msg: impl Into<String>) -> Self {
        Self::TooManyRequests(msg.into())
    }

    fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Internal(_) | Self::Anyhow(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::TooManyRequests(_) => StatusCode::TOO_MANY_REQUESTS,
        }
    }

    /// Returns a message safe to expose in client responses.
    ///
    /// Client errors (4xx) carry their full message. Server errors (5xx)
    /// collapse to a generic message; the details stay in server logs.
    fn safe_message(&self) -> String {
        match self {
            Self::NotFound(msg) => format!("Not found: {}", msg),
            Self::BadRequest(msg) => format!("Bad request: {}", msg),
            Self::Unauthorized(msg) => format!("Unauthorized: {}", msg),
            Self::TooManyRequests(msg) => format!("Too many requests: {}", msg),

            Self::Internal(_) | Self::Anyhow(_) => "Internal server error".to_string(),
            Self::StoreUnavailable(_) => "Service unavailable".to_string(),
        }
    }
}

impl IntoResponse for WeirError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Full error detail is logged server-side only
        tracing::error!(status = status.as_u16(), error = %self, "Request failed");

        (status, Json(MessageResponse::new(self.safe_message()))).into_response()
    }
}

/// Result type alias for Weir handlers
pub type Result<T> = std::result::Result<T, WeirError>;

/// Pick the first concrete error response from a list of candidates, or fall
/// back to a generic 500 when none of them fired.
///
/// Useful at the tail of a handler that probes several failure conditions,
/// each yielding `Some(response)` when it applies.
pub fn default_error_response<I>(candidates: I) -> Response
where
    I: IntoIterator<Item = Option<Response>>,
{
    candidates.into_iter().flatten().next().unwrap_or_else(|| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(MessageResponse::new("Unexpected Error")),
        )
            .into_response()
    })
}

// Common error type conversions

impl From<serde_json::Error> for WeirError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_data() || err.is_syntax() || err.is_eof() {
            WeirError::BadRequest(format!("JSON error: {}", err))
        } else {
            // IO errors are internal
            WeirError::Internal(format!("JSON serialization error: {}", err))
        }
    }
}

impl From<redis::RedisError> for WeirError {
    fn from(err: redis::RedisError) -> Self {
        WeirError::StoreUnavailable(format!("Redis error: {}", err))
    }
}

impl From<validator::ValidationErrors> for WeirError {
    fn from(err: validator::ValidationErrors) -> Self {
        WeirError::BadRequest(format!(
            "Validation failed: {}",
            crate::validation::format_validation_errors(&err)
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_error() {
        let err = WeirError::not_found("User not found");
        assert!(matches!(err, WeirError::NotFound(_)));
        assert_eq!(err.to_string(), "Not found: User not found");
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_bad_request_error() {
        let err = WeirError::bad_request("Invalid input");
        assert_eq!(err.to_string(), "Bad request: Invalid input");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_too_many_requests_error() {
        let err = WeirError::too_many_requests("Quota exhausted");
        assert_eq!(err.status_code(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[test]
    fn test_store_unavailable_error() {
        let err = WeirError::store_unavailable("connection refused");
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_anyhow_error() {
        let anyhow_err = anyhow::anyhow!("Something unexpected");
        let err: WeirError = anyhow_err.into();
        assert!(matches!(err, WeirError::Anyhow(_)));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_from_serde_json_syntax_error() {
        let result: std::result::Result<serde_json::Value, _> =
            serde_json::from_str("{ invalid json }");
        let err: WeirError = result.unwrap_err().into();

        assert!(matches!(err, WeirError::BadRequest(_)));
        assert!(err.to_string().contains("JSON error"));
    }

    #[test]
    fn test_safe_message_client_errors_exposed() {
        assert_eq!(
            WeirError::bad_request("Invalid email").safe_message(),
            "Bad request: Invalid email"
        );
        assert_eq!(
            WeirError::too_many_requests("Rate limit").safe_message(),
            "Too many requests: Rate limit"
        );
    }

    #[test]
    fn test_safe_message_server_errors_hidden() {
        assert_eq!(
            WeirError::internal("Connection to db-prod-01:5432 failed").safe_message(),
            "Internal server error"
        );
        assert_eq!(
            WeirError::store_unavailable("Redis at cache.internal:6379 unreachable")
                .safe_message(),
            "Service unavailable"
        );
    }

    #[tokio::test]
    async fn test_into_response_bad_request() {
        let err = WeirError::bad_request("Invalid");
        let response = err.into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_into_response_hides_internal_details() {
        let err = WeirError::internal("Sensitive: db password is 'secret123'");
        let response = err.into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(json["message"], "Internal server error");
        assert!(!json["message"].as_str().unwrap().contains("secret123"));
    }

    #[tokio::test]
    async fn test_default_error_response_picks_first_error() {
        let candidates = vec![
            None,
            Some(WeirError::not_found("thing").into_response()),
            Some(WeirError::internal("later").into_response()),
        ];

        let response = default_error_response(candidates);
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_default_error_response_falls_back_to_generic() {
        let response = default_error_response(vec![None, None]);
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["message"], "Unexpected Error");
    }
}
