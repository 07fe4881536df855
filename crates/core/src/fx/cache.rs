//! In-process TTL cache for resolved rates.
//!
//! Implements [`RateCacheTrait`] over a `DashMap` with per-entry deadlines.
//! The wider system substitutes its Redis client behind the same trait;
//! this implementation exists for default wiring and tests. Expired entries
//! are dropped lazily on read, so the map never grows beyond the working
//! set of currency pairs.

use dashmap::DashMap;
use std::time::{Duration, Instant};

use super::fx_traits::RateCacheTrait;

struct CacheEntry {
    value: String,
    expires_at: Instant,
}

#[derive(Default)]
pub struct InMemoryRateCache {
    entries: DashMap<String, CacheEntry>,
}

impl InMemoryRateCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live (possibly expired, not yet evicted) entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl RateCacheTrait for InMemoryRateCache {
    fn get(&self, key: &str) -> Option<String> {
        let expired = match self.entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => {
                return Some(entry.value.clone());
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            self.entries.remove(key);
        }
        None
    }

    fn set(&self, key: &str, value: &str, ttl: Duration) {
        self.entries.insert(
            key.to_string(),
            CacheEntry {
                value: value.to_string(),
                expires_at: Instant::now() + ttl,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_then_get_round_trips() {
        let cache = InMemoryRateCache::new();
        cache.set("rate:USD-EUR", "0.92", Duration::from_secs(60));
        assert_eq!(cache.get("rate:USD-EUR"), Some("0.92".to_string()));
    }

    #[test]
    fn missing_key_is_none() {
        let cache = InMemoryRateCache::new();
        assert_eq!(cache.get("rate:USD-EUR"), None);
    }

    #[test]
    fn expired_entry_is_evicted_on_read() {
        let cache = InMemoryRateCache::new();
        cache.set("rate:USD-EUR", "0.92", Duration::ZERO);
        assert_eq!(cache.get("rate:USD-EUR"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn overwrite_refreshes_value_and_deadline() {
        let cache = InMemoryRateCache::new();
        cache.set("rate:USD-EUR", "0.92", Duration::ZERO);
        cache.set("rate:USD-EUR", "0.93", Duration::from_secs(60));
        assert_eq!(cache.get("rate:USD-EUR"), Some("0.93".to_string()));
    }
}
