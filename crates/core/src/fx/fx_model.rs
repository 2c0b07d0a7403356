use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::FxError;

/// Directed currency pair, rendered as `FROM:TO`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RateKey {
    pub from: String,
    pub to: String,
}

impl RateKey {
    /// Builds a key from two currency codes, upper-casing both.
    pub fn new(from: &str, to: &str) -> Result<Self, FxError> {
        Ok(Self {
            from: normalize_code(from)?,
            to: normalize_code(to)?,
        })
    }

    /// The opposite direction of this pair.
    pub fn reversed(&self) -> Self {
        Self {
            from: self.to.clone(),
            to: self.from.clone(),
        }
    }

    pub fn is_identity(&self) -> bool {
        self.from == self.to
    }
}

impl fmt::Display for RateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.from, self.to)
    }
}

/// A rate as captured from the rate source.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedRate {
    pub rate: Decimal,
    pub captured_at: DateTime<Utc>,
}

impl CachedRate {
    pub fn new(rate: Decimal, captured_at: DateTime<Utc>) -> Result<Self, FxError> {
        if rate <= Decimal::ZERO {
            return Err(FxError::InvalidRate(rate.to_string()));
        }
        Ok(Self { rate, captured_at })
    }
}

fn normalize_code(code: &str) -> Result<String, FxError> {
    let trimmed = code.trim();
    if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(FxError::InvalidCurrencyCode(code.to_string()));
    }
    Ok(trimmed.to_ascii_uppercase())
}
