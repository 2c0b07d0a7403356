//! Trigger predicates. Data fetching happens in the service.

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use rust_decimal::Decimal;

use super::alerts_model::AlertCondition;
use crate::utils::decimal_utils::round_half_up;
use crate::utils::time_utils::start_of_day;

/// `|current - reference| / reference * 100`, with the ratio rounded
/// half-up to four places. `None` for a non-positive reference or when the
/// move does not fit in a `Decimal`.
pub fn percent_move(current_price: Decimal, reference_price: Decimal) -> Option<Decimal> {
    if reference_price <= Decimal::ZERO {
        return None;
    }
    let ratio = current_price
        .checked_sub(reference_price)?
        .abs()
        .checked_div(reference_price)?;
    round_half_up(ratio, 4).checked_mul(Decimal::ONE_HUNDRED)
}

/// Whether a price-based condition holds at `current_price`.
///
/// Reminder conditions never hold here; see [`reminder_due`].
pub fn price_condition_met(condition: &AlertCondition, current_price: Decimal) -> bool {
    match condition {
        AlertCondition::Above { target_price } => current_price >= *target_price,
        AlertCondition::Below { target_price } => current_price <= *target_price,
        AlertCondition::PercentChange {
            threshold_percent,
            reference_price,
        } => reference_price
            .and_then(|reference| percent_move(current_price, reference))
            .is_some_and(|moved| moved >= *threshold_percent),
        AlertCondition::EarningsReminder { .. } | AlertCondition::DividendPayment { .. } => false,
    }
}

/// `now + days_notice >= event_date at 00:00 UTC`. A notice window past the
/// representable range covers every date.
pub fn reminder_due(event_date: NaiveDate, days_notice: i64, now: DateTime<Utc>) -> bool {
    let horizon = TimeDelta::try_days(days_notice.max(0))
        .and_then(|notice| now.checked_add_signed(notice))
        .unwrap_or(DateTime::<Utc>::MAX_UTC);
    horizon >= start_of_day(event_date)
}
