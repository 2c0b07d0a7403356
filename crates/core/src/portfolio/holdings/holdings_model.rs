use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::accounts::TradingMode;

/// An open position, unique per `(account_id, symbol, mode)`.
///
/// A row only exists while `quantity >= 1`; closing a position deletes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
    pub id: String,
    pub account_id: String,
    pub symbol: String,
    pub name: String,
    pub quantity: i64,
    /// Weighted-average purchase price, four decimal places.
    pub average_cost: Decimal,
    pub currency: String,
    pub mode: TradingMode,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Holding {
    pub fn total_cost_basis(&self) -> Decimal {
        self.average_cost * Decimal::from(self.quantity)
    }

    pub fn key(&self) -> (&str, &str, TradingMode) {
        (&self.account_id, &self.symbol, self.mode)
    }
}

/// A holding priced at the latest quote. Amounts use display precision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldingValuation {
    pub id: String,
    pub symbol: String,
    pub name: String,
    pub quantity: i64,
    pub average_cost: Decimal,
    pub current_price: Decimal,
    pub current_value: Decimal,
    pub total_cost_basis: Decimal,
    pub profit_loss: Decimal,
    pub profit_loss_percent: Decimal,
    pub currency: String,
    /// False when no quote could be obtained and the holding was valued at 0.
    pub priced: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationEntry {
    pub symbol: String,
    pub name: String,
    pub value: Decimal,
    pub percentage: Decimal,
}

/// Totals for one `(account, mode)` partition in the account's preferred currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSummary {
    pub account_id: String,
    pub mode: TradingMode,
    pub currency: String,
    pub total_value: Decimal,
    pub total_cost_basis: Decimal,
    pub total_profit_loss: Decimal,
    pub total_profit_loss_percent: Decimal,
    pub cash_balance: Decimal,
    pub holdings_count: usize,
    pub allocations: Vec<AllocationEntry>,
}
