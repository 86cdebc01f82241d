use rust_decimal::prelude::*;
use rust_decimal::Decimal;

/// Number of decimal places congestion rates are rounded to.
pub const RATE_SCALE: u32 = 2;

/// `pending / (pending + resolved) * 100`, rounded half-to-even to two places.
///
/// A zero denominator yields zero rather than a fault.
pub fn congestion_rate(pending: u64, resolved: u64) -> Decimal {
    if pending == 0 && resolved == 0 {
        return Decimal::ZERO;
    }

    let pending = Decimal::from(pending);
    let ratio = pending * Decimal::ONE_HUNDRED / (pending + Decimal::from(resolved));
    ratio.round_dp_with_strategy(RATE_SCALE, RoundingStrategy::MidpointNearestEven)
}
