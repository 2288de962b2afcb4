//! Fixed-window rate limiting middleware.
//!
//! Counts requests per client address in a shared counter store and
//! reports the remaining quota through `X-RateLimit-*` headers. Blocking
//! is an opt-in (`enforce`); the default mode only observes.

mod config;
mod layer;

pub use config::{RateLimitConfig, RateLimitConfigBuilder};
pub use layer::{RateLimitLayer, RateLimitService, remaining_quota};
