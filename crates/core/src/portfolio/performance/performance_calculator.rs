use rust_decimal::Decimal;

use super::performance_model::PerformanceDataPoint;
use crate::constants::DISPLAY_DECIMAL_PRECISION;
use crate::portfolio::snapshot::PortfolioSnapshot;
use crate::utils::decimal_utils::{percent_change, round_half_up};

/// Derives daily and cumulative returns from a date-ordered snapshot series.
///
/// Each return is `(value - base) / base` rounded half-up to four places,
/// times 100, rounded to two. A non-positive base gives 0.
pub fn calculate_performance_history(snapshots: &[PortfolioSnapshot]) -> Vec<PerformanceDataPoint> {
    let Some(first) = snapshots.first() else {
        return Vec::new();
    };
    let first_value = first.total_value;
    let mut previous_value: Option<Decimal> = None;

    snapshots
        .iter()
        .map(|snapshot| {
            let value = snapshot.total_value;
            let daily_return = previous_value
                .map(|prev| percent_change(value - prev, prev))
                .unwrap_or(Decimal::ZERO);
            let cumulative_return = percent_change(value - first_value, first_value);
            previous_value = Some(value);

            PerformanceDataPoint {
                date: snapshot.snapshot_date,
                portfolio_value: round_half_up(value, DISPLAY_DECIMAL_PRECISION),
                daily_return: round_half_up(daily_return, DISPLAY_DECIMAL_PRECISION),
                cumulative_return: round_half_up(cumulative_return, DISPLAY_DECIMAL_PRECISION),
            }
        })
        .collect()
}
