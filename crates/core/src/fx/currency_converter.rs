//! Currency conversion through the rate cache.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use log::{debug, warn};
use rust_decimal::Decimal;

use super::fx_errors::FxError;
use super::fx_model::{CachedRate, RateKey};
use super::fx_traits::{RateCacheTrait, RateSourceTrait};
use crate::constants::{DEFAULT_FX_TIMEOUT, MONEY_DECIMAL_PRECISION, RATE_DECIMAL_PRECISION};
use crate::errors::Result;
use crate::utils::decimal_utils::round_half_up;

/// Resolves conversion rates, caching them for a short freshness window.
///
/// Lookup order for a pair `FROM:TO`:
/// 1. identical codes resolve to 1 without any lookup
/// 2. a fresh `FROM:TO` cache entry
/// 3. the rate source, whose answer is cached
/// 4. `1 / rate` of a cached `TO:FROM` entry, fresh or stale
pub struct CurrencyConverter {
    cache: Arc<dyn RateCacheTrait>,
    source: Arc<dyn RateSourceTrait>,
    fetch_timeout: Duration,
}

impl CurrencyConverter {
    pub fn new(cache: Arc<dyn RateCacheTrait>, source: Arc<dyn RateSourceTrait>) -> Self {
        Self {
            cache,
            source,
            fetch_timeout: DEFAULT_FX_TIMEOUT,
        }
    }

    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    /// Rate for converting one unit of `from` into `to`.
    pub async fn get_rate(&self, from: &str, to: &str) -> Result<Decimal> {
        self.get_rate_at(from, to, Utc::now()).await
    }

    /// Same as [`get_rate`](Self::get_rate) with an explicit clock.
    pub async fn get_rate_at(&self, from: &str, to: &str, now: DateTime<Utc>) -> Result<Decimal> {
        let key = RateKey::new(from, to)?;
        if key.is_identity() {
            return Ok(Decimal::ONE);
        }

        if let Some(entry) = self.cache.get(&key) {
            if !self.cache.is_stale(&entry, now) {
                return Ok(entry.rate);
            }
            debug!("Cached rate {} is stale, refetching", key);
        }

        match self.fetch(&key, now).await {
            Some(rate) => Ok(rate),
            None => self.reverse_fallback(&key),
        }
    }

    async fn fetch(&self, key: &RateKey, now: DateTime<Utc>) -> Option<Decimal> {
        let lookup = self.source.fetch_rate(&key.from, &key.to);
        let rate = match tokio::time::timeout(self.fetch_timeout, lookup).await {
            Ok(Ok(Some(rate))) => rate,
            Ok(Ok(None)) => {
                warn!("Rate source has no rate for {}", key);
                return None;
            }
            Ok(Err(e)) => {
                warn!("Failed to fetch rate {}: {}", key, e);
                return None;
            }
            Err(_) => {
                warn!("Rate lookup {} timed out after {:?}", key, self.fetch_timeout);
                return None;
            }
        };

        match CachedRate::new(rate, now) {
            Ok(entry) => {
                self.cache.put(key.clone(), entry);
                Some(rate)
            }
            Err(e) => {
                warn!("Discarding rate for {}: {}", key, e);
                None
            }
        }
    }

    fn reverse_fallback(&self, key: &RateKey) -> Result<Decimal> {
        let reverse = key.reversed();
        match self.cache.get(&reverse) {
            Some(entry) if entry.rate > Decimal::ZERO => {
                debug!("Serving {} from reverse entry {}", key, reverse);
                Ok(round_half_up(
                    Decimal::ONE / entry.rate,
                    RATE_DECIMAL_PRECISION,
                ))
            }
            _ => Err(FxError::RateNotFound {
                from: key.from.clone(),
                to: key.to.clone(),
            }
            .into()),
        }
    }

    /// Converts `amount` from one currency to another.
    ///
    /// Fails open: when no rate can be resolved the amount is returned
    /// unconverted.
    pub async fn convert(&self, amount: Decimal, from: &str, to: &str) -> Decimal {
        self.convert_at(amount, from, to, Utc::now()).await
    }

    /// Same as [`convert`](Self::convert) with an explicit clock.
    pub async fn convert_at(
        &self,
        amount: Decimal,
        from: &str,
        to: &str,
        now: DateTime<Utc>,
    ) -> Decimal {
        if from.trim().eq_ignore_ascii_case(to.trim()) {
            return amount;
        }
        match self.get_rate_at(from, to, now).await {
            Ok(rate) => round_half_up(amount * rate, MONEY_DECIMAL_PRECISION),
            Err(e) => {
                warn!(
                    "Converting {} {} to {} failed ({}); using unconverted amount",
                    amount, from, to, e
                );
                amount
            }
        }
    }
}
