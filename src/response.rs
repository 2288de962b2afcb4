//! Standardized JSON responses.
//!
//! Provides the [`MessageResponse`] payload shared by error responses and
//! OpenAPI components, and a [`ResponseFactory`] carrying per-application
//! defaults for status codes, error wrapping, and redirects.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::{Deserialize, Serialize};

/// A single-field `{"message": ...}` payload.
///
/// This is the shape of every normalized error body the crate produces, and
/// the schema referenced by the OpenAPI error components.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Factory for JSON responses with configurable defaults
///
/// # Example
///
/// ```rust,no_run
/// use axum::http::StatusCode;
/// use weir::ResponseFactory;
///
/// let responses = ResponseFactory::builder()
///     .default_error_status(StatusCode::UNPROCESSABLE_ENTITY)
///     .build();
///
/// let ok = responses.json_ok(serde_json::json!({"id": 7}), None);
/// let err = responses.json_error("missing field", None); // 422 {"message": "missing field"}
/// ```
#[derive(Debug, Clone)]
pub struct ResponseFactory {
    /// Status used by `json_ok` when the caller passes none
    pub default_ok_status: StatusCode,
    /// Status used by `json_error` when the caller passes none
    pub default_error_status: StatusCode,
    /// Wrap bare error strings into a `{"message": ...}` body
    pub wrap_error_message: bool,
    /// Target of `default_redirect`
    pub redirect_url: String,
}

impl Default for ResponseFactory {
    fn default() -> Self {
        Self {
            default_ok_status: StatusCode::OK,
            default_error_status: StatusCode::INTERNAL_SERVER_ERROR,
            wrap_error_message: true,
            redirect_url: "./".to_string(),
        }
    }
}

impl ResponseFactory {
    pub fn builder() -> ResponseFactoryBuilder {
        ResponseFactoryBuilder::new()
    }

    /// Respond with `data` as JSON, using the default OK status unless overridden.
    pub fn json_ok<T: Serialize>(&self, data: T, status: Option<StatusCode>) -> Response {
        (status.unwrap_or(self.default_ok_status), Json(data)).into_response()
    }

    /// Respond with an error message, using the default error status unless
    /// overridden.
    ///
    /// When `wrap_error_message` is set the string becomes a
    /// `{"message": ...}` body; otherwise it is serialized bare.
    pub fn json_error(&self, message: impl Into<String>, status: Option<StatusCode>) -> Response {
        let status = status.unwrap_or(self.default_error_status);
        let message = message.into();

        if self.wrap_error_message {
            (status, Json(MessageResponse::new(message))).into_response()
        } else {
            (status, Json(message)).into_response()
        }
    }

    /// Respond with a structured error body, bypassing message wrapping.
    pub fn json_error_body<T: Serialize>(&self, body: T, status: Option<StatusCode>) -> Response {
        (status.unwrap_or(self.default_error_status), Json(body)).into_response()
    }

    /// Temporary redirect to the factory's configured URL.
    pub fn default_redirect(&self) -> Response {
        Redirect::temporary(&self.redirect_url).into_response()
    }

    /// Redirect to `url`. Pass a status for permanent or see-other redirects;
    /// defaults to 307 temporary.
    pub fn redirect_to(&self, url: &str, status: Option<StatusCode>) -> Response {
        match status {
            Some(StatusCode::MOVED_PERMANENTLY) | Some(StatusCode::PERMANENT_REDIRECT) => {
                Redirect::permanent(url).into_response()
            }
            Some(StatusCode::SEE_OTHER) => Redirect::to(url).into_response(),
            _ => Redirect::temporary(url).into_response(),
        }
    }
}

/// Builder for ResponseFactory
#[must_use = "builder does nothing until you call build()"]
pub struct ResponseFactoryBuilder {
    factory: ResponseFactory,
}

impl ResponseFactoryBuilder {
    pub fn new() -> Self {
        Self {
            factory: ResponseFactory::default(),
        }
    }

    pub fn default_ok_status(mut self, status: StatusCode) -> Self {
        self.factory.default_ok_status = status;
        self
    }

    pub fn default_error_status(mut self, status: StatusCode) -> Self {
        self.factory.default_error_status = status;
        self
    }

    pub fn wrap_error_message(mut self, wrap: bool) -> Self {
        self.factory.wrap_error_message = wrap;
        self
    }

    pub fn redirect_url(mut self, url: impl Into<String>) -> Self {
        self.factory.redirect_url = url.into();
        self
    }

    pub fn build(self) -> ResponseFactory {
        self.factory
    }
}

impl Default for ResponseFactoryBuilder {
    fn default() -> Self {
        Self::new()
    }
}
