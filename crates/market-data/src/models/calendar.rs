use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Earnings calendar entry for a symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EarningsCalendar {
    #[serde(default)]
    pub next_earnings_date: Option<NaiveDate>,
}

/// Dividend calendar for a symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DividendCalendar {
    #[serde(default)]
    pub next_dividend: Option<NextDividend>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NextDividend {
    #[serde(default)]
    pub payment_date: Option<NaiveDate>,
    #[serde(default)]
    pub amount: Decimal,
}
