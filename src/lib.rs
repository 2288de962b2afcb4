//! Weir - HTTP server utilities for Axum
//!
//! A small collection of helpers for building JSON APIs: a Redis-backed
//! fixed-window rate limiter, request-validation extractors, a uniform JSON
//! response factory, OpenAPI document bootstrap with Swagger UI, and
//! error-normalization helpers.
//!
//! # Features
//!
//! - **Rate limiting**: fixed-window counting against a shared store, with
//!   `X-RateLimit-*` reporting and opt-in enforcement
//! - **Validation**: `ValidatedJson`/`ValidatedQuery`/`ValidatedPath`
//!   extractors backed by the `validator` crate
//! - **Responses**: a factory with per-application status and wrapping
//!   defaults
//! - **OpenAPI**: document metadata and Swagger UI serving via utoipa
//! - **Errors**: one normalized `{"message": ...}` shape for every failure
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use weir::{RateLimitConfig, RateLimitLayer, RedisStore};
//!
//! #[tokio::main]
//! async fn main() -> weir::Result<()> {
//!     weir::init_tracing();
//!
//!     let store = Arc::new(RedisStore::connect("redis://127.0.0.1/").await?);
//!     let config = RateLimitConfig::builder()
//!         .window_seconds(60)
//!         .max_requests(100)
//!         .build()?;
//!
//!     let app: axum::Router = axum::Router::new()
//!         .merge(weir::openapi::bootstrap(&weir::OpenApiConfig::default()))
//!         .layer(RateLimitLayer::new(store, config)?);
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();
//!     axum::serve(listener, app).await.unwrap();
//!     Ok(())
//! }
//! ```

mod error;
pub mod openapi;
pub mod ratelimit;
pub mod response;
pub mod store;
mod utils;
pub mod validation;

// Re-exports for public API
pub use error::{Result, WeirError, default_error_response};
pub use openapi::{OpenApiConfig, OpenApiConfigBuilder, ServerEntry};
pub use ratelimit::{RateLimitConfig, RateLimitConfigBuilder, RateLimitLayer, remaining_quota};
pub use response::{MessageResponse, ResponseFactory, ResponseFactoryBuilder};
pub use store::{CounterStore, MemoryStore, RedisStore, WindowHit};
pub use validation::{ValidatedJson, ValidatedPath, ValidatedQuery};

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing/logging with sensible defaults
///
/// Call this early in your application, before serving requests.
///
/// # Environment Variables
///
/// - `RUST_LOG`: Set log level (e.g., "info", "debug", "weir=debug")
/// - `WEIR_LOG_JSON`: Set to "true" for JSON formatted logs
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let json_logs = std::env::var("WEIR_LOG_JSON")
        .map(|v| v.parse::<bool>().unwrap_or(false))
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}
