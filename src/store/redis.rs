//! Redis-backed counter store.

use async_trait::async_trait;
use redis::aio::ConnectionManager;

use super::{CounterStore, WindowHit};
use crate::error::{Result, WeirError};

/// Server-side script folding increment, conditional expiry arming, and TTL
/// readback into one atomic operation. Redis runs scripts without
/// interleaving other commands, so two concurrent openers of the same window
/// can never both observe count 1 or double-arm the expiry.
const HIT_SCRIPT: &str = r#"
local count = redis.call('INCR', KEYS[1])
if count == 1 then
    redis.call('EXPIRE', KEYS[1], ARGV[1])
end
local ttl = redis.call('TTL', KEYS[1])
return {count, ttl}
"#;

/// Counter store backed by a shared Redis connection.
///
/// Holds a [`ConnectionManager`]: one multiplexed connection established at
/// startup, cloned cheaply per operation, reconnecting on failure. The
/// handle is passed in explicitly; there is no process-global registry to
/// forget to initialize.
#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
}

impl RedisStore {
    /// Wrap an already-initialized connection handle.
    pub fn new(conn: ConnectionManager) -> Self {
        Self { conn }
    }

    /// Connect to Redis at `url` and build the shared handle.
    pub async fn connect(url: &str) -> Result<Self> {
        let client = redis::Client::open(url)
            .map_err(|e| WeirError::store_unavailable(format!("invalid Redis URL: {}", e)))?;

        let conn = ConnectionManager::new(client).await?;

        Ok(Self { conn })
    }
}

#[async_trait]
impl CounterStore for RedisStore {
    async fn increment(&self, key: &str) -> Result<u64> {
        let mut conn = self.conn.clone();
        let count = redis::cmd("INCR")
            .arg(key)
            .query_async::<u64>(&mut conn)
            .await?;

        Ok(count)
    }

    async fn set_expiry(&self, key: &str, seconds: u64) -> Result<()> {
        let mut conn = self.conn.clone();
        redis::cmd("EXPIRE")
            .arg(key)
            .arg(seconds)
            .query_async::<()>(&mut conn)
            .await?;

        Ok(())
    }

    async fn time_to_live(&self, key: &str) -> Result<i64> {
        let mut conn = self.conn.clone();
        let ttl = redis::cmd("TTL")
            .arg(key)
            .query_async::<i64>(&mut conn)
            .await?;

        Ok(ttl)
    }

    /// Single round-trip, atomic on the server side.
    async fn hit(&self, key: &str, window_seconds: u64) -> Result<WindowHit> {
        let mut conn = self.conn.clone();
        let (count, ttl_seconds): (u64, i64) = redis::Script::new(HIT_SCRIPT)
            .key(key)
            .arg(window_seconds)
            .invoke_async(&mut conn)
            .await?;

        Ok(WindowHit { count, ttl_seconds })
    }
}
