//! Quote domain models.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Latest price of a symbol as reported by the quote source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub symbol: String,
    /// Instrument display name; falls back to the symbol.
    pub name: String,
    pub price: Decimal,
    pub change: Decimal,
    pub change_percent: Decimal,
    pub currency: String,
    pub fetched_at: DateTime<Utc>,
}

impl Quote {
    pub fn new(symbol: impl Into<String>, price: Decimal, currency: impl Into<String>) -> Self {
        let symbol = symbol.into();
        Self {
            name: symbol.clone(),
            symbol,
            price,
            change: Decimal::ZERO,
            change_percent: Decimal::ZERO,
            currency: currency.into(),
            fetched_at: Utc::now(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

/// Next scheduled earnings announcement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EarningsInfo {
    pub symbol: String,
    pub next_earnings_date: NaiveDate,
}

/// Next scheduled dividend payment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DividendInfo {
    pub symbol: String,
    pub payment_date: NaiveDate,
    pub amount: Decimal,
}
