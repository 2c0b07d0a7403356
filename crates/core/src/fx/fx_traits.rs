use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::fx_model::{CachedRate, RateKey};
use crate::errors::Result;

/// Short-lived store of captured rates.
///
/// Reads and writes for different pairs must not block each other.
pub trait RateCacheTrait: Send + Sync {
    fn get(&self, key: &RateKey) -> Option<CachedRate>;

    fn put(&self, key: RateKey, rate: CachedRate);

    /// True when `entry` is too old to be served as a fresh rate at `now`.
    fn is_stale(&self, entry: &CachedRate, now: DateTime<Utc>) -> bool;
}

/// Upstream source of conversion rates.
#[async_trait]
pub trait RateSourceTrait: Send + Sync {
    /// Rate for converting one unit of `from` into `to`, or `None` on a miss.
    async fn fetch_rate(&self, from: &str, to: &str) -> Result<Option<Decimal>>;
}
