//! Shared counter store for rate limiting.
//!
//! The store is the single point of serialization across concurrent
//! requests: increments must be atomic and strictly serialized per key so
//! that exactly one caller observes the absent-to-one transition of a
//! window's counter.

mod memory;
mod redis;

pub use self::memory::MemoryStore;
pub use self::redis::RedisStore;

use crate::error::Result;
use async_trait::async_trait;

/// Outcome of counting one request against a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowHit {
    /// Post-increment counter value. `1` means this hit opened the window.
    pub count: u64,
    /// Seconds until the window's counter expires. Follows Redis TTL
    /// conventions: `-1` when the key has no expiry, `-2` when it is gone.
    pub ttl_seconds: i64,
}

/// A key-value counter store with atomic increment and per-key expiry.
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Atomically increment the counter at `key`, creating it at 1 if
    /// absent, and return the post-increment value.
    async fn increment(&self, key: &str) -> Result<u64>;

    /// Arm the expiry countdown on `key`.
    async fn set_expiry(&self, key: &str, seconds: u64) -> Result<()>;

    /// Remaining time-to-live of `key` in seconds (`-1` no expiry, `-2` missing).
    async fn time_to_live(&self, key: &str) -> Result<i64>;

    /// Count one hit against `key` within a fixed window of `window_seconds`.
    ///
    /// The default implementation issues three round-trips: increment, arm
    /// the expiry when this increment created the entry, read back the TTL.
    /// If the caller crashes between the first two steps the key is left
    /// without an expiry and lives until something else removes it. Backends
    /// that can fold the sequence into one atomic operation should override
    /// this method.
    async fn hit(&self, key: &str, window_seconds: u64) -> Result<WindowHit> {
        let count = self.increment(key).await?;
        if count == 1 {
            self.set_expiry(key, window_seconds).await?;
        }
        let ttl_seconds = self.time_to_live(key).await?;

        Ok(WindowHit { count, ttl_seconds })
    }
}
