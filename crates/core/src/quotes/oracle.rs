//! Quote source contract.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::warn;

use super::model::{DividendInfo, EarningsInfo, Quote};
use crate::errors::Result;

/// Point-in-time market facts for a symbol.
///
/// `Ok(None)` is a miss: the source answered but has nothing for the
/// symbol. `Err` means the source could not be asked.
#[async_trait]
pub trait QuoteOracleTrait: Send + Sync {
    async fn get_quote(&self, symbol: &str) -> Result<Option<Quote>>;

    async fn get_earnings(&self, symbol: &str) -> Result<Option<EarningsInfo>>;

    async fn get_dividends(&self, symbol: &str) -> Result<Option<DividendInfo>>;
}

/// Bounds every lookup of the wrapped oracle by `timeout`.
///
/// A lookup that exceeds the bound is reported as a miss, so a slow
/// upstream delays a caller by at most `timeout`.
pub struct TimeoutQuoteOracle {
    inner: Arc<dyn QuoteOracleTrait>,
    timeout: Duration,
}

impl TimeoutQuoteOracle {
    pub fn new(inner: Arc<dyn QuoteOracleTrait>, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    async fn bounded<T, F>(&self, what: &str, symbol: &str, lookup: F) -> Result<Option<T>>
    where
        F: std::future::Future<Output = Result<Option<T>>> + Send,
    {
        match tokio::time::timeout(self.timeout, lookup).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    "{} lookup for {} timed out after {:?}; treating as a miss",
                    what, symbol, self.timeout
                );
                Ok(None)
            }
        }
    }
}

#[async_trait]
impl QuoteOracleTrait for TimeoutQuoteOracle {
    async fn get_quote(&self, symbol: &str) -> Result<Option<Quote>> {
        self.bounded("Quote", symbol, self.inner.get_quote(symbol))
            .await
    }

    async fn get_earnings(&self, symbol: &str) -> Result<Option<EarningsInfo>> {
        self.bounded("Earnings", symbol, self.inner.get_earnings(symbol))
            .await
    }

    async fn get_dividends(&self, symbol: &str) -> Result<Option<DividendInfo>> {
        self.bounded("Dividend", symbol, self.inner.get_dividends(symbol))
            .await
    }
}
