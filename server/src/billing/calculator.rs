//! Timesheet billing arithmetic using rust_decimal for precision
//!
//! All figures are computed as `Decimal`, then converted to `f64` at
//! the storage boundary (the store round-trips plain floats, not
//! decimal strings). The client and interpreter sides are priced
//! independently, each against its own rate card.

use crate::db::models::{Rate, RateType};
use rust_decimal::prelude::*;

/// Rounding for monetary amounts (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

const MILLIS_PER_HOUR: i64 = 3_600_000;
const MINUTES_PER_HOUR: i64 = 60;

/// Convert f64 to Decimal for calculation
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// The effective pricing inputs for one side of a job
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateCard {
    pub amount_per_unit: Decimal,
    pub minimum_units: Decimal,
}

/// Fallback used when no rate record exists for a (side, service) key.
/// The two sides fall back independently.
pub fn fallback_rate(rate_type: RateType) -> RateCard {
    match rate_type {
        RateType::Client => RateCard {
            amount_per_unit: Decimal::from(40),
            minimum_units: Decimal::ONE,
        },
        RateType::Interpreter => RateCard {
            amount_per_unit: Decimal::from(25),
            minimum_units: Decimal::ONE,
        },
    }
}

/// Resolve a looked-up rate, or the side's fallback
pub fn rate_card(rate_type: RateType, rate: Option<&Rate>) -> RateCard {
    match rate {
        Some(r) => RateCard {
            amount_per_unit: to_decimal(r.amount_per_unit),
            minimum_units: to_decimal(r.minimum_units),
        },
        None => fallback_rate(rate_type),
    }
}

/// Worked hours: wall-clock span minus break, clamped at zero
pub fn duration_hours(actual_start: i64, actual_end: i64, break_minutes: i64) -> Decimal {
    let span = Decimal::from(actual_end - actual_start) / Decimal::from(MILLIS_PER_HOUR);
    let brk = Decimal::from(break_minutes) / Decimal::from(MINUTES_PER_HOUR);
    (span - brk).max(Decimal::ZERO)
}

/// Billable units: worked hours, floored at the rate's minimum
pub fn billable_units(duration_hours: Decimal, card: &RateCard) -> Decimal {
    duration_hours.max(card.minimum_units)
}

/// Units priced at the card rate, rounded to money
pub fn amount(units: Decimal, card: &RateCard) -> Decimal {
    (units * card.amount_per_unit)
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// One side's frozen figures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SideFigures {
    pub units: Decimal,
    pub amount: Decimal,
}

/// Price one side of a timesheet
pub fn price_side(
    rate_type: RateType,
    rate: Option<&Rate>,
    actual_start: i64,
    actual_end: i64,
    break_minutes: i64,
) -> SideFigures {
    let card = rate_card(rate_type, rate);
    let hours = duration_hours(actual_start, actual_end, break_minutes);
    let units = billable_units(hours, &card);
    SideFigures {
        units,
        amount: amount(units, &card),
    }
}
