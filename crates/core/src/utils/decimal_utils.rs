use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds half-up (away from zero on a tie) to `dp` decimal places.
pub fn round_half_up(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// `numerator / denominator * 100`, with the quotient rounded half-up to
/// four places before scaling. Returns zero for a non-positive denominator.
pub fn percent_change(numerator: Decimal, denominator: Decimal) -> Decimal {
    if denominator <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    round_half_up(numerator / denominator, 4) * Decimal::ONE_HUNDRED
}
