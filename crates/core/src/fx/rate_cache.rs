use chrono::{DateTime, Utc};
use dashmap::DashMap;
use log::debug;

use super::fx_model::{CachedRate, RateKey};
use super::fx_traits::RateCacheTrait;
use crate::constants::RATE_CACHE_TTL;

/// In-process rate cache with per-shard locking.
pub struct InMemoryRateCache {
    entries: DashMap<RateKey, CachedRate>,
    ttl: chrono::Duration,
}

impl InMemoryRateCache {
    pub fn new() -> Self {
        Self::with_ttl(RATE_CACHE_TTL)
    }

    pub fn with_ttl(ttl: std::time::Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl: chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::minutes(5)),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }
}

impl Default for InMemoryRateCache {
    fn default() -> Self {
        Self::new()
    }
}

impl RateCacheTrait for InMemoryRateCache {
    fn get(&self, key: &RateKey) -> Option<CachedRate> {
        self.entries.get(key).map(|entry| *entry.value())
    }

    fn put(&self, key: RateKey, rate: CachedRate) {
        debug!("Caching rate {} = {}", key, rate.rate);
        self.entries.insert(key, rate);
    }

    fn is_stale(&self, entry: &CachedRate, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(entry.captured_at) > self.ttl
    }
}
