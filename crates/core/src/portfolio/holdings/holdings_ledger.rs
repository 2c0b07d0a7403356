//! Pure position arithmetic. Callers persist the returned rows.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::holdings_model::Holding;
use crate::accounts::TradingMode;
use crate::constants::MONEY_DECIMAL_PRECISION;
use crate::errors::Result;
use crate::trading::TradingError;
use crate::utils::decimal_utils::round_half_up;

/// Builds the row for a first purchase of a symbol in a partition.
#[allow(clippy::too_many_arguments)]
pub fn open_position(
    account_id: &str,
    symbol: &str,
    name: &str,
    quantity: i64,
    price: Decimal,
    currency: &str,
    mode: TradingMode,
    now: DateTime<Utc>,
) -> Result<Holding> {
    if quantity < 1 {
        return Err(TradingError::InvalidOrder("Quantity must be at least 1".to_string()).into());
    }
    Ok(Holding {
        id: uuid::Uuid::new_v4().to_string(),
        account_id: account_id.to_string(),
        symbol: symbol.to_string(),
        name: name.to_string(),
        quantity,
        average_cost: round_half_up(price, MONEY_DECIMAL_PRECISION),
        currency: currency.to_string(),
        mode,
        created_at: now,
        updated_at: now,
    })
}

/// Adds `quantity` shares bought for `total_cost` to an open position.
///
/// `average_cost = (average_cost * quantity + total_cost) / (quantity + bought)`,
/// rounded half-up to four places.
pub fn apply_buy(
    holding: &Holding,
    quantity: i64,
    total_cost: Decimal,
    now: DateTime<Utc>,
) -> Result<Holding> {
    if quantity < 1 {
        return Err(TradingError::InvalidOrder("Quantity must be at least 1".to_string()).into());
    }
    let new_quantity = holding.quantity.checked_add(quantity).ok_or_else(|| {
        TradingError::InvalidOrder(format!(
            "Position in {} would exceed the maximum share count",
            holding.symbol
        ))
    })?;

    let combined_cost = holding.total_cost_basis() + total_cost;
    let average_cost = round_half_up(
        combined_cost / Decimal::from(new_quantity),
        MONEY_DECIMAL_PRECISION,
    );

    Ok(Holding {
        quantity: new_quantity,
        average_cost,
        updated_at: now,
        ..holding.clone()
    })
}

/// Removes `quantity` shares from a position.
///
/// Returns `None` when the position is closed. The average cost of a
/// remaining position is left unchanged.
pub fn apply_sell(holding: &Holding, quantity: i64, now: DateTime<Utc>) -> Result<Option<Holding>> {
    if quantity < 1 {
        return Err(TradingError::InvalidOrder("Quantity must be at least 1".to_string()).into());
    }
    if holding.quantity < quantity {
        return Err(TradingError::InsufficientShares {
            owned: holding.quantity,
            requested: quantity,
        }
        .into());
    }

    let remaining = holding.quantity - quantity;
    if remaining == 0 {
        return Ok(None);
    }
    Ok(Some(Holding {
        quantity: remaining,
        updated_at: now,
        ..holding.clone()
    }))
}
