use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::accounts::TradingMode;
use crate::errors::{Error, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeSide {
    Buy,
    Sell,
}

impl TradeSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeSide::Buy => "BUY",
            TradeSide::Sell => "SELL",
        }
    }
}

impl fmt::Display for TradeSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TradeSide {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "BUY" => Ok(TradeSide::Buy),
            "SELL" => Ok(TradeSide::Sell),
            other => Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Unknown trade side '{}'",
                other
            )))),
        }
    }
}

/// Immutable record of an executed order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub account_id: String,
    pub symbol: String,
    pub name: String,
    pub side: TradeSide,
    pub quantity: i64,
    pub price_per_share: Decimal,
    pub total_amount: Decimal,
    pub currency: String,
    pub mode: TradingMode,
    pub executed_at: DateTime<Utc>,
}

/// Outcome of a successful order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeResult {
    /// Balance of the partition the order acted on, after the order.
    pub new_balance: Decimal,
    pub transaction: Transaction,
    pub message: String,
}

impl TradeResult {
    pub(crate) fn new(new_balance: Decimal, transaction: Transaction) -> Self {
        let verb = match transaction.side {
            TradeSide::Buy => "purchased",
            TradeSide::Sell => "sold",
        };
        let suffix = if transaction.mode.is_paper() {
            " (Paper Trade)"
        } else {
            ""
        };
        let message = format!(
            "Successfully {} {} shares of {}{}",
            verb, transaction.quantity, transaction.name, suffix
        );
        Self {
            new_balance,
            transaction,
            message,
        }
    }
}
