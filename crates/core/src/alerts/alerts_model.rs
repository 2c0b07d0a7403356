use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::alerts_errors::AlertError;
use crate::constants::{DEFAULT_DAYS_NOTICE, MAX_DAYS_NOTICE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertKind {
    Above,
    Below,
    PercentChange,
    EarningsReminder,
    DividendPayment,
}

impl AlertKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertKind::Above => "ABOVE",
            AlertKind::Below => "BELOW",
            AlertKind::PercentChange => "PERCENT_CHANGE",
            AlertKind::EarningsReminder => "EARNINGS_REMINDER",
            AlertKind::DividendPayment => "DIVIDEND_PAYMENT",
        }
    }

    /// True for the kinds evaluated against the latest quote.
    pub fn is_price_based(&self) -> bool {
        matches!(
            self,
            AlertKind::Above | AlertKind::Below | AlertKind::PercentChange
        )
    }
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlertKind {
    type Err = AlertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ABOVE" => Ok(AlertKind::Above),
            "BELOW" => Ok(AlertKind::Below),
            "PERCENT_CHANGE" => Ok(AlertKind::PercentChange),
            "EARNINGS_REMINDER" => Ok(AlertKind::EarningsReminder),
            "DIVIDEND_PAYMENT" => Ok(AlertKind::DividendPayment),
            _ => Err(AlertError::InvalidAlert(
                "Invalid alert type. Must be ABOVE, BELOW, PERCENT_CHANGE, EARNINGS_REMINDER, or DIVIDEND_PAYMENT"
                    .to_string(),
            )),
        }
    }
}

/// Trigger condition of an alert. Each kind carries only its own fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertCondition {
    /// Triggers when the price reaches or exceeds `target_price`.
    #[serde(rename_all = "camelCase")]
    Above { target_price: Decimal },

    /// Triggers when the price reaches or falls below `target_price`.
    #[serde(rename_all = "camelCase")]
    Below { target_price: Decimal },

    /// Triggers when the price moved at least `threshold_percent` percent
    /// away from `reference_price`, in either direction.
    ///
    /// On the wire the threshold travels in the `targetPrice` field shared
    /// with the price kinds; it is a percentage, not a price. An alert
    /// without a reference price never triggers.
    #[serde(rename_all = "camelCase")]
    PercentChange {
        #[serde(rename = "targetPrice")]
        threshold_percent: Decimal,
        reference_price: Option<Decimal>,
    },

    /// Triggers `days_notice` days (default 1) before the next earnings date.
    #[serde(rename_all = "camelCase")]
    EarningsReminder { days_notice: Option<i64> },

    /// Triggers `days_notice` days (default 1) before the next dividend payment.
    #[serde(rename_all = "camelCase")]
    DividendPayment { days_notice: Option<i64> },
}

impl AlertCondition {
    pub fn kind(&self) -> AlertKind {
        match self {
            AlertCondition::Above { .. } => AlertKind::Above,
            AlertCondition::Below { .. } => AlertKind::Below,
            AlertCondition::PercentChange { .. } => AlertKind::PercentChange,
            AlertCondition::EarningsReminder { .. } => AlertKind::EarningsReminder,
            AlertCondition::DividendPayment { .. } => AlertKind::DividendPayment,
        }
    }

    /// Value of the shared `targetPrice` field: the price for ABOVE/BELOW,
    /// the percentage threshold for PERCENT_CHANGE, nothing for reminders.
    pub fn target_price(&self) -> Option<Decimal> {
        match self {
            AlertCondition::Above { target_price } | AlertCondition::Below { target_price } => {
                Some(*target_price)
            }
            AlertCondition::PercentChange {
                threshold_percent, ..
            } => Some(*threshold_percent),
            AlertCondition::EarningsReminder { .. } | AlertCondition::DividendPayment { .. } => {
                None
            }
        }
    }

    pub fn reference_price(&self) -> Option<Decimal> {
        match self {
            AlertCondition::PercentChange {
                reference_price, ..
            } => *reference_price,
            _ => None,
        }
    }

    /// Days of notice for reminder kinds, with the default applied.
    pub fn days_notice(&self) -> Option<i64> {
        match self {
            AlertCondition::EarningsReminder { days_notice }
            | AlertCondition::DividendPayment { days_notice } => {
                Some(days_notice.unwrap_or(DEFAULT_DAYS_NOTICE))
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: String,
    pub account_id: String,
    pub symbol: String,
    pub name: String,
    pub condition: AlertCondition,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub triggered_at: Option<DateTime<Utc>>,
}

impl Alert {
    pub fn kind(&self) -> AlertKind {
        self.condition.kind()
    }

    pub fn is_triggered(&self) -> bool {
        !self.is_active && self.triggered_at.is_some()
    }
}

/// Alert creation request in the flat shape clients send.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAlert {
    pub symbol: String,
    pub name: Option<String>,
    #[serde(rename = "alertType")]
    pub kind: AlertKind,
    pub target_price: Option<Decimal>,
    pub reference_price: Option<Decimal>,
    pub days_notice: Option<i64>,
}

impl NewAlert {
    pub fn new(symbol: impl Into<String>, kind: AlertKind) -> Self {
        Self {
            symbol: symbol.into(),
            name: None,
            kind,
            target_price: None,
            reference_price: None,
            days_notice: None,
        }
    }

    pub fn with_target_price(mut self, target_price: Decimal) -> Self {
        self.target_price = Some(target_price);
        self
    }

    pub fn with_reference_price(mut self, reference_price: Decimal) -> Self {
        self.reference_price = Some(reference_price);
        self
    }

    pub fn with_days_notice(mut self, days_notice: i64) -> Self {
        self.days_notice = Some(days_notice);
        self
    }

    /// Validates the request and builds the typed condition.
    pub fn condition(&self) -> Result<AlertCondition, AlertError> {
        let positive = |field: &str, value: Option<Decimal>| match value {
            Some(v) if v > Decimal::ZERO => Ok(v),
            _ => Err(AlertError::InvalidAlert(format!(
                "{} must be greater than 0 for {} alerts",
                field, self.kind
            ))),
        };
        if let Some(days) = self.days_notice {
            if days < 0 {
                return Err(AlertError::InvalidAlert(
                    "daysNotice cannot be negative".to_string(),
                ));
            }
            if days > MAX_DAYS_NOTICE {
                return Err(AlertError::InvalidAlert(format!(
                    "daysNotice cannot exceed {}",
                    MAX_DAYS_NOTICE
                )));
            }
        }

        Ok(match self.kind {
            AlertKind::Above => AlertCondition::Above {
                target_price: positive("targetPrice", self.target_price)?,
            },
            AlertKind::Below => AlertCondition::Below {
                target_price: positive("targetPrice", self.target_price)?,
            },
            AlertKind::PercentChange => AlertCondition::PercentChange {
                threshold_percent: positive("targetPrice", self.target_price)?,
                reference_price: Some(positive("referencePrice", self.reference_price)?),
            },
            AlertKind::EarningsReminder => AlertCondition::EarningsReminder {
                days_notice: self.days_notice,
            },
            AlertKind::DividendPayment => AlertCondition::DividendPayment {
                days_notice: self.days_notice,
            },
        })
    }
}
