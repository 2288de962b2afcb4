//! Fixed-window rate limiting layer backed by a shared counter store.
//!
//! Each request is counted against a per-client key in the store; the store
//! is the only coordination point, so any number of processes sharing it
//! enforce one combined window. The client identity is a validated IPv4
//! literal from the `x-forwarded-for` header; put this layer behind a proxy
//! that overwrites that header, or the address is attacker-controlled.

use axum::{
    Json,
    extract::Request,
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use std::{net::Ipv4Addr, sync::Arc};
use tower::{Layer, Service};

use super::config::RateLimitConfig;
use crate::response::MessageResponse;
use crate::store::CounterStore;

/// Trusted forwarded-address header. The whole first value is validated as a
/// single IPv4 literal; comma-joined proxy chains are rejected, not split.
const FORWARDED_FOR: HeaderName = HeaderName::from_static("x-forwarded-for");

const RATELIMIT_LIMIT: HeaderName = HeaderName::from_static("x-ratelimit-limit");
const RATELIMIT_REMAINING: HeaderName = HeaderName::from_static("x-ratelimit-remaining");
const RATELIMIT_RESET: HeaderName = HeaderName::from_static("x-ratelimit-reset");

/// Requests remaining in the window: `max_requests - count`, floored at zero.
///
/// Pure derivation, no store access. This is what `X-RateLimit-Remaining`
/// reports; in observe-only mode it is informational and never enforced.
pub fn remaining_quota(max_requests: u32, count: u64) -> u64 {
    u64::from(max_requests).saturating_sub(count)
}

/// Rejection for a missing or malformed client address
#[derive(Debug)]
struct InvalidClientAddr;

impl IntoResponse for InvalidClientAddr {
    fn into_response(self) -> Response {
        (
            StatusCode::BAD_REQUEST,
            Json(MessageResponse::new("Invalid IP address.")),
        )
            .into_response()
    }
}

/// Rejection for an exhausted window, used only when `enforce` is on
struct QuotaExceeded {
    retry_after_seconds: i64,
}

impl IntoResponse for QuotaExceeded {
    fn into_response(self) -> Response {
        let retry_after = self.retry_after_seconds.max(1);
        (
            StatusCode::TOO_MANY_REQUESTS,
            [(header::RETRY_AFTER, retry_after.to_string())],
            Json(MessageResponse::new(format!(
                "Rate limit exceeded. Please retry in {} seconds.",
                retry_after
            ))),
        )
            .into_response()
    }
}

/// Shared limiter state: the injected store handle plus the immutable config
#[derive(Clone)]
struct RateLimitState {
    store: Arc<dyn CounterStore>,
    config: Arc<RateLimitConfig>,
}

/// Tower layer for fixed-window rate limiting
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use weir::{RateLimitConfig, RateLimitLayer, RedisStore};
///
/// # async fn build() -> weir::Result<axum::Router> {
/// let store = Arc::new(RedisStore::connect("redis://127.0.0.1/").await?);
/// let config = RateLimitConfig::builder()
///     .window_seconds(60)
///     .max_requests(100)
///     .build()?;
///
/// let app = axum::Router::new()
///     .layer(RateLimitLayer::new(store, config)?);
/// # Ok(app)
/// # }
/// ```
#[derive(Clone)]
pub struct RateLimitLayer {
    state: RateLimitState,
}

impl RateLimitLayer {
    /// Build a layer from an injected store handle and a validated config.
    pub fn new(
        store: Arc<dyn CounterStore>,
        config: RateLimitConfig,
    ) -> crate::error::Result<Self> {
        config.validate()?;

        Ok(Self {
            state: RateLimitState {
                store,
                config: Arc::new(config),
            },
        })
    }
}

impl<S> Layer<S> for RateLimitLayer {
    type Service = RateLimitService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RateLimitService {
            inner,
            state: self.state.clone(),
        }
    }
}

/// Tower service for fixed-window rate limiting
#[derive(Clone)]
pub struct RateLimitService<S> {
    inner: S,
    state: RateLimitState,
}

impl<S> Service<Request> for RateLimitService<S>
where
    S: Service<Request> + Clone + Send + Sync + 'static,
    S::Response: IntoResponse,
    S::Future: Send + 'static,
{
    type Response = Response;
    type Error = S::Error;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request) -> Self::Future {
        let state = self.state.clone();
        let mut svc = self.inner.clone();

        Box::pin(async move {
            // Fail closed: no valid identity, no counting, no downstream call
            let client = match client_addr(req.headers()) {
                Ok(addr) => addr,
                Err(rejection) => return Ok(rejection.into_response()),
            };

            let config = &state.config;
            let key = format!("{}:{}", config.key_prefix, client);

            let hit = match state.store.hit(&key, config.window_seconds()).await {
                Ok(hit) => hit,
                // Store failures are not handled here; render them through
                // the crate's error normalizer (503 for the client)
                Err(err) => return Ok(err.into_response()),
            };

            tracing::debug!(%client, count = hit.count, ttl = hit.ttl_seconds, "counted request");

            let quota = config.header_content.then(|| QuotaHeaders {
                limit: config.max_requests,
                remaining: remaining_quota(config.max_requests, hit.count),
                reset_epoch_ms: chrono::Utc::now().timestamp_millis() + hit.ttl_seconds * 1000,
            });

            if config.enforce && hit.count > u64::from(config.max_requests) {
                let mut response = QuotaExceeded {
                    retry_after_seconds: hit.ttl_seconds,
                }
                .into_response();
                if let Some(quota) = quota {
                    quota.apply(response.headers_mut());
                }
                return Ok(response);
            }

            let mut response = svc.call(req).await?.into_response();
            if let Some(quota) = quota {
                quota.apply(response.headers_mut());
            }

            Ok(response)
        })
    }
}

/// The three informational response headers
struct QuotaHeaders {
    limit: u32,
    remaining: u64,
    reset_epoch_ms: i64,
}

impl QuotaHeaders {
    fn apply(&self, headers: &mut HeaderMap) {
        headers.insert(RATELIMIT_LIMIT, HeaderValue::from(self.limit));
        headers.insert(RATELIMIT_REMAINING, HeaderValue::from(self.remaining));
        headers.insert(RATELIMIT_RESET, HeaderValue::from(self.reset_epoch_ms));
    }
}

/// Extract the client address from the forwarded-address header and validate
/// it as a well-formed IPv4 literal.
fn client_addr(headers: &HeaderMap) -> Result<Ipv4Addr, InvalidClientAddr> {
    let raw = headers
        .get(FORWARDED_FOR)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    match raw.parse::<Ipv4Addr>() {
        Ok(addr) => Ok(addr),
        Err(_) => {
            tracing::warn!(raw, "rejected request with malformed forwarded address");
            Err(InvalidClientAddr)
        }
    }
}
