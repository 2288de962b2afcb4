//! In-memory counter store.
//!
//! Mirrors the Redis counter semantics closely enough for tests and
//! single-process deployments: incrementing an absent key creates it at 1
//! with no expiry, expiry is armed separately, and an expired key behaves
//! exactly like an absent one.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;

use super::CounterStore;
use crate::error::Result;

struct Entry {
    count: u64,
    expires_at: Option<Instant>,
}

impl Entry {
    fn expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

/// Mutex-guarded counter map with `Instant`-based expiry.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Entry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current counter value for `key`, if the entry exists and has not
    /// expired. Intended for inspection in tests.
    pub fn count(&self, key: &str) -> Option<u64> {
        let now = Instant::now();
        let entries = self.entries.lock();
        entries
            .get(key)
            .filter(|entry| !entry.expired(now))
            .map(|entry| entry.count)
    }

    /// Number of live entries. Intended for inspection in tests.
    pub fn len(&self) -> usize {
        let now = Instant::now();
        let entries = self.entries.lock();
        entries.values().filter(|entry| !entry.expired(now)).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl CounterStore for MemoryStore {
    async fn increment(&self, key: &str) -> Result<u64> {
        let now = Instant::now();
        let mut entries = self.entries.lock();

        let entry = entries.entry(key.to_string()).or_insert(Entry {
            count: 0,
            expires_at: None,
        });
        if entry.expired(now) {
            entry.count = 0;
            entry.expires_at = None;
        }
        entry.count += 1;

        Ok(entry.count)
    }

    async fn set_expiry(&self, key: &str, seconds: u64) -> Result<()> {
        let now = Instant::now();
        let mut entries = self.entries.lock();

        if let Some(entry) = entries.get_mut(key) {
            if !entry.expired(now) {
                entry.expires_at = Some(now + Duration::from_secs(seconds));
            }
        }

        Ok(())
    }

    async fn time_to_live(&self, key: &str) -> Result<i64> {
        let now = Instant::now();
        let entries = self.entries.lock();

        let ttl = match entries.get(key) {
            None => -2,
            Some(entry) if entry.expired(now) => -2,
            Some(Entry { expires_at: None, .. }) => -1,
            Some(Entry {
                expires_at: Some(at),
                ..
            }) => {
                // Round up, matching the whole-second resolution of Redis TTL
                at.duration_since(now).as_secs_f64().ceil() as i64
            }
        };

        Ok(ttl)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::CounterStore;

    #[tokio::test]
    async fn test_counts_are_sequential() {
        let store = MemoryStore::new();

        for expected in 1..=5u64 {
            let hit = store.hit("k", 60).await.unwrap();
            assert_eq!(hit.count, expected);
        }
    }

    #[tokio::test]
    async fn test_first_hit_arms_expiry() {
        let store = MemoryStore::new();

        let hit = store.hit("k", 60).await.unwrap();
        assert_eq!(hit.count, 1);
        assert_eq!(hit.ttl_seconds, 60);
    }

    #[tokio::test]
    async fn test_increment_alone_leaves_no_expiry() {
        let store = MemoryStore::new();

        store.increment("k").await.unwrap();
        assert_eq!(store.time_to_live("k").await.unwrap(), -1);
    }

    #[tokio::test]
    async fn test_missing_key_ttl() {
        let store = MemoryStore::new();
        assert_eq!(store.time_to_live("nope").await.unwrap(), -2);
    }

    #[tokio::test]
    async fn test_later_hits_do_not_rearm_expiry() {
        let store = MemoryStore::new();

        store.increment("k").await.unwrap();
        store.set_expiry("k", 2).await.unwrap();

        tokio::time::sleep(Duration::from_millis(1100)).await;

        let hit = store.hit("k", 2).await.unwrap();
        assert_eq!(hit.count, 2);
        // Countdown kept running; a re-arm would have reset it to 2
        assert!(hit.ttl_seconds <= 1, "expiry was reset: {}", hit.ttl_seconds);
    }

    #[tokio::test]
    async fn test_expired_key_starts_a_fresh_window() {
        let store = MemoryStore::new();

        let first = store.hit("k", 1).await.unwrap();
        assert_eq!(first.count, 1);

        tokio::time::sleep(Duration::from_millis(1100)).await;

        let again = store.hit("k", 1).await.unwrap();
        assert_eq!(again.count, 1);
        assert_eq!(again.ttl_seconds, 1);
    }

    #[tokio::test]
    async fn test_keys_are_isolated() {
        let store = MemoryStore::new();

        store.hit("a", 60).await.unwrap();
        store.hit("a", 60).await.unwrap();
        let b = store.hit("b", 60).await.unwrap();

        assert_eq!(b.count, 1);
        assert_eq!(store.count("a"), Some(2));
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_concurrent_increments_observe_every_value_once() {
        use std::collections::HashSet;
        use std::sync::Arc;

        let store = Arc::new(MemoryStore::new());
        let mut handles = vec![];

        for _ in 0..8 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                let mut seen = vec![];
                for _ in 0..50 {
                    seen.push(store.increment("shared").await.unwrap());
                }
                seen
            }));
        }

        let mut all = HashSet::new();
        for handle in handles {
            for count in handle.await.unwrap() {
                assert!(all.insert(count), "count {} observed twice", count);
            }
        }

        assert_eq!(all.len(), 400);
        assert_eq!(store.count("shared"), Some(400));
    }
}
