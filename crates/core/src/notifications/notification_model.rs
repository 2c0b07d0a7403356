use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::alerts::AlertKind;

/// Kind-specific content of a notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationPayload {
    #[serde(rename_all = "camelCase")]
    PriceAlert {
        kind: AlertKind,
        /// For `PERCENT_CHANGE` this is the threshold percentage.
        target_price: Decimal,
        current_price: Decimal,
    },
    #[serde(rename_all = "camelCase")]
    EarningsReminder {
        earnings_date: NaiveDate,
        days_notice: i64,
    },
    #[serde(rename_all = "camelCase")]
    DividendPayment {
        amount: Decimal,
        payment_date: NaiveDate,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRequest {
    pub account_id: String,
    /// Push token of the account's device.
    pub device_token: String,
    pub alert_id: String,
    pub symbol: String,
    /// Instrument display name, or the symbol when unknown.
    pub name: String,
    pub payload: NotificationPayload,
}

impl NotificationRequest {
    pub fn title(&self) -> String {
        match &self.payload {
            NotificationPayload::PriceAlert { .. } => format!("Price Alert: {}", self.symbol),
            NotificationPayload::EarningsReminder { .. } => {
                format!("Earnings Reminder: {}", self.symbol)
            }
            NotificationPayload::DividendPayment { .. } => {
                format!("Dividend Payment: {}", self.symbol)
            }
        }
    }

    pub fn body(&self) -> String {
        match &self.payload {
            NotificationPayload::PriceAlert {
                kind,
                target_price,
                current_price,
            } => match kind {
                AlertKind::Above => format!(
                    "{} rose to {} (target: above {})",
                    self.name,
                    current_price.round_dp(2),
                    target_price.round_dp(2)
                ),
                AlertKind::Below => format!(
                    "{} fell to {} (target: below {})",
                    self.name,
                    current_price.round_dp(2),
                    target_price.round_dp(2)
                ),
                _ => format!(
                    "{} moved more than {}% (now {})",
                    self.name,
                    target_price.normalize(),
                    current_price.round_dp(2)
                ),
            },
            NotificationPayload::EarningsReminder {
                earnings_date,
                days_notice,
            } => format!(
                "{} reports earnings on {} ({} day(s) notice)",
                self.name,
                earnings_date.format("%Y-%m-%d"),
                days_notice
            ),
            NotificationPayload::DividendPayment {
                amount,
                payment_date,
            } => format!(
                "{} pays a dividend of {} per share on {}",
                self.name,
                amount.normalize(),
                payment_date.format("%Y-%m-%d")
            ),
        }
    }
}
