//! Request validation support.
//!
//! Type-safe extractors that deserialize a request part and run
//! `validator::Validate` before the handler sees the value. Covers JSON
//! bodies, query strings, and path parameters.
//!
//! # Example
//!
//! ```rust,no_run
//! use serde::Deserialize;
//! use validator::Validate;
//! use weir::validation::ValidatedJson;
//!
//! #[derive(Deserialize, Validate)]
//! struct CreateLicenseRequest {
//!     #[validate(email)]
//!     owner_email: String,
//!     #[validate(length(min = 1))]
//!     product: String,
//! }
//!
//! async fn create_license(
//!     ValidatedJson(req): ValidatedJson<CreateLicenseRequest>,
//! ) -> weir::Result<axum::Json<serde_json::Value>> {
//!     // req is guaranteed to be valid
//!     Ok(axum::Json(serde_json::json!({"status": "ok"})))
//! }
//! ```

mod extractor;

pub use extractor::{ValidatedJson, ValidatedPath, ValidatedQuery};
pub use validator;

/// Flatten `ValidationErrors` into a `field: reason, field: reason` line.
pub(crate) fn format_validation_errors(errors: &validator::ValidationErrors) -> String {
    let messages: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| {
                let msg = error
                    .message
                    .as_ref()
                    .map(|m| m.as_ref())
                    .unwrap_or_else(|| error.code.as_ref());
                format!("{}: {}", field, msg)
            })
        })
        .collect();

    messages.join(", ")
}
