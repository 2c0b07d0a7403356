//! Account domain models.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_CURRENCY, DEFAULT_PAPER_BALANCE};
use crate::{errors::ValidationError, Error, Result};

/// Ledger partition an order, holding, transaction or snapshot belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradingMode {
    /// Real money
    #[default]
    Real,
    /// Simulated money
    Paper,
}

impl TradingMode {
    pub const ALL: [TradingMode; 2] = [TradingMode::Real, TradingMode::Paper];

    pub fn as_str(&self) -> &'static str {
        match self {
            TradingMode::Real => "REAL",
            TradingMode::Paper => "PAPER",
        }
    }

    pub fn is_paper(&self) -> bool {
        matches!(self, TradingMode::Paper)
    }
}

impl std::fmt::Display for TradingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TradingMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "REAL" => Ok(TradingMode::Real),
            "PAPER" => Ok(TradingMode::Paper),
            other => Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Unknown trading mode '{}'",
                other
            )))),
        }
    }
}

/// Domain model representing a trading account.
///
/// Holds two independent cash balances. `trading_mode` selects which one
/// (and which holdings partition) new orders act on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    pub name: String,
    pub real_balance: Decimal,
    pub paper_balance: Decimal,
    pub trading_mode: TradingMode,
    pub preferred_currency: String,
    /// Push token used by notification delivery.
    pub notification_token: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Cash balance of the given partition.
    pub fn balance_for(&self, mode: TradingMode) -> Decimal {
        match mode {
            TradingMode::Real => self.real_balance,
            TradingMode::Paper => self.paper_balance,
        }
    }

    /// Replaces the cash balance of the given partition.
    pub fn set_balance_for(&mut self, mode: TradingMode, balance: Decimal) {
        match mode {
            TradingMode::Real => self.real_balance = balance,
            TradingMode::Paper => self.paper_balance = balance,
        }
    }

    /// Cash balance of the partition new orders act on.
    pub fn active_balance(&self) -> Decimal {
        self.balance_for(self.trading_mode)
    }
}

/// Input model for creating a new account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAccount {
    pub id: Option<String>,
    pub name: String,
    pub real_balance: Option<Decimal>,
    pub paper_balance: Option<Decimal>,
    pub trading_mode: Option<TradingMode>,
    pub preferred_currency: Option<String>,
}

impl NewAccount {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            real_balance: None,
            paper_balance: None,
            trading_mode: None,
            preferred_currency: None,
        }
    }

    /// Validates the new account data.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "name".to_string(),
            )));
        }
        for (field, balance) in [
            ("realBalance", self.real_balance),
            ("paperBalance", self.paper_balance),
        ] {
            if balance.is_some_and(|b| b < Decimal::ZERO) {
                return Err(Error::Validation(ValidationError::InvalidInput(format!(
                    "{} cannot be negative",
                    field
                ))));
            }
        }
        if let Some(currency) = &self.preferred_currency {
            normalize_currency_code(currency)?;
        }
        Ok(())
    }

    /// Builds the account with defaults applied.
    pub fn into_account(self, now: DateTime<Utc>) -> Result<Account> {
        self.validate()?;
        let paper_default = Decimal::from_str(DEFAULT_PAPER_BALANCE)?;
        let preferred_currency = match &self.preferred_currency {
            Some(code) => normalize_currency_code(code)?,
            None => DEFAULT_CURRENCY.to_string(),
        };

        Ok(Account {
            id: self
                .id
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            name: self.name.trim().to_string(),
            real_balance: self.real_balance.unwrap_or(Decimal::ZERO),
            paper_balance: self.paper_balance.unwrap_or(paper_default),
            trading_mode: self.trading_mode.unwrap_or_default(),
            preferred_currency,
            notification_token: None,
            created_at: now,
            updated_at: now,
        })
    }
}

/// Profile edits an account owner may make. Balances are not editable here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountUpdate {
    pub id: String,
    pub name: Option<String>,
    pub trading_mode: Option<TradingMode>,
    pub preferred_currency: Option<String>,
    pub notification_token: Option<Option<String>>,
}

impl AccountUpdate {
    /// Applies the edit to `account`.
    pub fn apply(&self, account: &mut Account, now: DateTime<Utc>) -> Result<()> {
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(Error::Validation(ValidationError::MissingField(
                    "name".to_string(),
                )));
            }
            account.name = name.trim().to_string();
        }
        if let Some(mode) = self.trading_mode {
            account.trading_mode = mode;
        }
        if let Some(currency) = &self.preferred_currency {
            account.preferred_currency = normalize_currency_code(currency)?;
        }
        if let Some(token) = &self.notification_token {
            account.notification_token = token.clone().filter(|t| !t.trim().is_empty());
        }
        account.updated_at = now;
        Ok(())
    }
}

/// Upper-cases a three-letter alphabetic currency code.
pub(crate) fn normalize_currency_code(code: &str) -> Result<String> {
    let trimmed = code.trim();
    if trimmed.len() != 3 || !trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(Error::Validation(ValidationError::InvalidInput(format!(
            "Invalid currency code: {}",
            code
        ))));
    }
    Ok(trimmed.to_ascii_uppercase())
}
