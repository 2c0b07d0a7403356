use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::accounts::TradingMode;

/// Valuation of one `(account_id, snapshot_date, mode)` partition.
///
/// Amounts are stored rounded half-up to four places. A later write for the
/// same key replaces the amounts instead of adding to them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSnapshot {
    pub id: String,
    pub account_id: String,
    pub snapshot_date: NaiveDate,
    pub mode: TradingMode,
    pub total_value: Decimal,
    pub total_cost_basis: Decimal,
    pub cash_balance: Decimal,
    pub holdings_count: usize,
    pub calculated_at: DateTime<Utc>,
}

impl PortfolioSnapshot {
    pub fn key(&self) -> (&str, NaiveDate, TradingMode) {
        (&self.account_id, self.snapshot_date, self.mode)
    }

    pub fn unrealized_gain(&self) -> Decimal {
        self.total_value - self.total_cost_basis
    }
}

/// Outcome of one nightly batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NightlyBatchSummary {
    pub accounts_processed: usize,
    pub snapshots_written: usize,
    pub failed_accounts: Vec<String>,
}
