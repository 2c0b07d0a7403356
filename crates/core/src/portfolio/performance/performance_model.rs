use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::accounts::TradingMode;

/// One day of the performance series. Returns are percentages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceDataPoint {
    pub date: NaiveDate,
    pub portfolio_value: Decimal,
    /// Change against the previous point; 0 for the first point.
    pub daily_return: Decimal,
    /// Change against the first point of the series.
    pub cumulative_return: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceHistory {
    pub account_id: String,
    pub mode: TradingMode,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub points: Vec<PerformanceDataPoint>,
}

impl PerformanceHistory {
    /// Cumulative return of the last point, if any.
    pub fn total_return(&self) -> Option<Decimal> {
        self.points.last().map(|p| p.cumulative_return)
    }
}
