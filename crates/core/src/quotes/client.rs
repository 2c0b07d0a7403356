//! Adapter from the market-data crate to the core quote and rate contracts.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use log::{debug, warn};
use rust_decimal::Decimal;

use tradedesk_market_data::{MarketDataError, MarketDataProvider};

use super::model::{DividendInfo, EarningsInfo, Quote};
use super::oracle::QuoteOracleTrait;
use crate::errors::Result;
use crate::fx::RateSourceTrait;

/// Serves quotes, calendars and FX rates from a [`MarketDataProvider`].
///
/// Upstream timeouts are reported as misses; other upstream failures are
/// returned as `Error::MarketData`.
#[derive(Clone)]
pub struct MarketDataQuoteOracle {
    provider: Arc<dyn MarketDataProvider>,
}

impl MarketDataQuoteOracle {
    pub fn new(provider: Arc<dyn MarketDataProvider>) -> Self {
        Self { provider }
    }
}

fn timeout_as_miss<T>(
    what: &str,
    result: std::result::Result<Option<T>, MarketDataError>,
) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(value),
        Err(MarketDataError::Timeout { endpoint }) => {
            warn!("{} request to {} timed out; treating as a miss", what, endpoint);
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

#[async_trait]
impl QuoteOracleTrait for MarketDataQuoteOracle {
    async fn get_quote(&self, symbol: &str) -> Result<Option<Quote>> {
        let quote = timeout_as_miss("Quote", self.provider.get_quote(symbol).await)?;
        Ok(quote.map(|q| {
            let name = q.display_name().to_string();
            Quote {
                symbol: if q.symbol.is_empty() {
                    symbol.to_string()
                } else {
                    q.symbol
                },
                name,
                price: q.price,
                change: q.change,
                change_percent: q.change_percent,
                currency: q.currency,
                fetched_at: Utc::now(),
            }
        }))
    }

    async fn get_earnings(&self, symbol: &str) -> Result<Option<EarningsInfo>> {
        let calendar = timeout_as_miss("Earnings", self.provider.get_earnings(symbol).await)?;
        Ok(calendar
            .and_then(|c| c.next_earnings_date)
            .map(|date| EarningsInfo {
                symbol: symbol.to_string(),
                next_earnings_date: date,
            }))
    }

    async fn get_dividends(&self, symbol: &str) -> Result<Option<DividendInfo>> {
        let calendar = timeout_as_miss("Dividend", self.provider.get_dividends(symbol).await)?;
        let Some(next) = calendar.and_then(|c| c.next_dividend) else {
            return Ok(None);
        };
        let Some(payment_date) = next.payment_date else {
            debug!("Dividend for {} has no payment date yet", symbol);
            return Ok(None);
        };
        Ok(Some(DividendInfo {
            symbol: symbol.to_string(),
            payment_date,
            amount: next.amount,
        }))
    }
}

#[async_trait]
impl RateSourceTrait for MarketDataQuoteOracle {
    async fn fetch_rate(&self, from: &str, to: &str) -> Result<Option<Decimal>> {
        let quote = timeout_as_miss("Rate", self.provider.get_exchange_rate(from, to).await)?;
        Ok(quote.map(|q| q.rate).filter(|rate| *rate > Decimal::ZERO))
    }
}
