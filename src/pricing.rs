//! Booking cost calculation
use super::types::{Date, Money};

/// Number of billable days in `start..=end`. Both endpoints count, so a
/// single-day booking is one day. Inverted ranges yield zero or less.
pub fn duration_days(start: Date, end: Date) -> i64 {
    end.days_since(start) + 1
}

/// Total price for the inclusive range at `price_per_day`.
///
/// `start <= end` is the caller's precondition; an inverted range is priced
/// at zero rather than producing a negative amount. No rounding happens here.
/// `None` when the total does not fit in a `Decimal`.
pub fn compute_total_cost(start: Date, end: Date, price_per_day: Money) -> Option<Money> {
    let days = duration_days(start, end).max(0);
    price_per_day.checked_times(days)
}
