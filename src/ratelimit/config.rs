use serde::{Deserialize, Serialize};

use crate::error::{Result, WeirError};
use crate::utils::get_env_with_prefix;

/// Fixed-window rate limit configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RateLimitConfig {
    /// Window length in milliseconds. The counter's expiry is armed in whole
    /// seconds (`window_ms / 1000`), so values below 1000 are rejected.
    #[serde(default = "default_window_ms")]
    pub window_ms: u64,

    /// Maximum number of requests allowed per window
    #[serde(default = "default_max_requests")]
    pub max_requests: u32,

    /// Attach `X-RateLimit-Limit`, `X-RateLimit-Remaining`, and
    /// `X-RateLimit-Reset` headers to responses
    #[serde(default = "default_header_content")]
    pub header_content: bool,

    /// Prefix for counter keys in the shared store. The full key is
    /// `{key_prefix}:{client address}`.
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,

    /// Reject requests once the window's count exceeds `max_requests`.
    ///
    /// Off by default: the limiter then runs in observe-only mode, computing
    /// and reporting quota headers without ever short-circuiting a request.
    /// Enable this to turn the ceiling into a hard 429 with a `Retry-After`
    /// header.
    #[serde(default)]
    pub enforce: bool,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window_ms: default_window_ms(),
            max_requests: default_max_requests(),
            header_content: default_header_content(),
            key_prefix: default_key_prefix(),
            enforce: false,
        }
    }
}

impl RateLimitConfig {
    /// Create a new RateLimitConfig builder
    pub fn builder() -> RateLimitConfigBuilder {
        RateLimitConfigBuilder::new()
    }

    /// Load rate limit configuration from environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(window_ms) = get_env_with_prefix("RATE_LIMIT_WINDOW_MS") {
            if let Ok(val) = window_ms.parse() {
                config.window_ms = val;
            }
        }

        if let Some(max_requests) = get_env_with_prefix("RATE_LIMIT_MAX_REQUESTS") {
            if let Ok(val) = max_requests.parse() {
                config.max_requests = val;
            }
        }

        if let Some(header_content) = get_env_with_prefix("RATE_LIMIT_HEADERS") {
            config.header_content = header_content.parse().unwrap_or(true);
        }

        if let Some(prefix) = get_env_with_prefix("RATE_LIMIT_KEY_PREFIX") {
            config.key_prefix = prefix;
        }

        if let Some(enforce) = get_env_with_prefix("RATE_LIMIT_ENFORCE") {
            config.enforce = enforce.parse().unwrap_or(false);
        }

        config
    }

    /// Window length in whole seconds, as armed on the store key.
    pub fn window_seconds(&self) -> u64 {
        self.window_ms / 1000
    }

    /// Reject non-positive or sub-second settings.
    pub fn validate(&self) -> Result<()> {
        if self.max_requests == 0 {
            return Err(WeirError::bad_request(
                "Rate limit max_requests must be greater than 0",
            ));
        }

        if self.window_ms < 1000 {
            return Err(WeirError::bad_request(
                "Rate limit window_ms must be at least 1000 (expiry resolution is whole seconds)",
            ));
        }

        if self.key_prefix.is_empty() {
            return Err(WeirError::bad_request(
                "Rate limit key_prefix must not be empty",
            ));
        }

        Ok(())
    }
}

/// Builder for RateLimitConfig
#[must_use = "builder does nothing until you call build()"]
pub struct RateLimitConfigBuilder {
    config: RateLimitConfig,
}

impl RateLimitConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: RateLimitConfig::default(),
        }
    }

    pub fn window_ms(mut self, window_ms: u64) -> Self {
        self.config.window_ms = window_ms;
        self
    }

    pub fn window_seconds(mut self, seconds: u64) -> Self {
        self.config.window_ms = seconds * 1000;
        self
    }

    pub fn max_requests(mut self, max: u32) -> Self {
        self.config.max_requests = max;
        self
    }

    pub fn header_content(mut self, enabled: bool) -> Self {
        self.config.header_content = enabled;
        self
    }

    pub fn key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.key_prefix = prefix.into();
        self
    }

    /// See [`RateLimitConfig::enforce`] for the observe-only default.
    pub fn enforce(mut self, enforce: bool) -> Self {
        self.config.enforce = enforce;
        self
    }

    pub fn build(self) -> Result<RateLimitConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for RateLimitConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn default_window_ms() -> u64 {
    60_000
}

fn default_max_requests() -> u32 {
    100
}

fn default_header_content() -> bool {
    true
}

fn default_key_prefix() -> String {
    "ratelimit".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RateLimitConfig::default();
        assert_eq!(config.window_ms, 60_000);
        assert_eq!(config.max_requests, 100);
        assert!(config.header_content);
        assert_eq!(config.key_prefix, "ratelimit");
        assert!(!config.enforce);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_window_seconds_floors() {
        let config = RateLimitConfig {
            window_ms: 1999,
            ..RateLimitConfig::default()
        };
        assert_eq!(config.window_seconds(), 1);
    }

    #[test]
    fn test_builder() {
        let config = RateLimitConfig::builder()
            .window_ms(30_000)
            .max_requests(5)
            .header_content(false)
            .key_prefix("rl")
            .build()
            .unwrap();

        assert_eq!(config.window_ms, 30_000);
        assert_eq!(config.max_requests, 5);
        assert!(!config.header_content);
        assert_eq!(config.key_prefix, "rl");
    }

    #[test]
    fn test_builder_window_seconds_convenience() {
        let config = RateLimitConfig::builder()
            .window_seconds(120)
            .build()
            .unwrap();
        assert_eq!(config.window_ms, 120_000);
    }

    #[test]
    fn test_rejects_zero_max_requests() {
        let result = RateLimitConfig::builder().max_requests(0).build();
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_sub_second_window() {
        let result = RateLimitConfig::builder().window_ms(500).build();
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_empty_prefix() {
        let result = RateLimitConfig::builder().key_prefix("").build();
        assert!(result.is_err());
    }

    #[test]
    fn test_enforce_defaults_off() {
        // Observe-only is the documented default; blocking is opt-in
        let config = RateLimitConfig::builder().build().unwrap();
        assert!(!config.enforce);
    }

    #[test]
    fn test_from_env() {
        std::env::set_var("WEIR_RATE_LIMIT_WINDOW_MS", "5000");
        std::env::set_var("WEIR_RATE_LIMIT_MAX_REQUESTS", "7");
        std::env::set_var("WEIR_RATE_LIMIT_KEY_PREFIX", "edge");

        let config = RateLimitConfig::from_env();
        assert_eq!(config.window_ms, 5000);
        assert_eq!(config.max_requests, 7);
        assert_eq!(config.key_prefix, "edge");

        std::env::remove_var("WEIR_RATE_LIMIT_WINDOW_MS");
        std::env::remove_var("WEIR_RATE_LIMIT_MAX_REQUESTS");
        std::env::remove_var("WEIR_RATE_LIMIT_KEY_PREFIX");
    }
}
