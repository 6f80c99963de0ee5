use super::calculator::*;
use crate::db::models::{Rate, RateType, ServiceType};
use rust_decimal::Decimal;

const HOUR: i64 = 3_600_000;

fn rate(rate_type: RateType, amount: f64, minimum: f64) -> Rate {
    Rate {
        id: None,
        rate_type,
        service_type: ServiceType::Onsite,
        amount_per_unit: amount,
        minimum_units: minimum,
    }
}

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

#[test]
fn test_to_decimal_avoids_float_noise() {
    // Classic floating point problem: 0.1 + 0.2 != 0.3
    let sum = to_decimal(0.1) + to_decimal(0.2);
    assert_eq!(to_f64(sum), 0.3);
}

#[test]
fn test_to_f64_rounds_to_money() {
    assert_eq!(to_f64(dec("49.995")), 50.0);
    assert_eq!(to_f64(dec("49.994")), 49.99);
}

#[test]
fn test_duration_subtracts_break() {
    // 3h wall clock, 30min break => 2.5h
    assert_eq!(duration_hours(0, 3 * HOUR, 30), dec("2.5"));
}

#[test]
fn test_duration_clamps_at_zero() {
    // break longer than the session
    assert_eq!(duration_hours(0, HOUR, 90), Decimal::ZERO);
}

#[test]
fn test_units_floored_at_minimum() {
    let card = RateCard {
        amount_per_unit: dec("50"),
        minimum_units: dec("2"),
    };
    // 30 minutes worked, 2-unit floor
    assert_eq!(billable_units(dec("0.5"), &card), dec("2"));
}

#[test]
fn test_units_at_minimum_unchanged() {
    let card = RateCard {
        amount_per_unit: dec("50"),
        minimum_units: dec("2"),
    };
    assert_eq!(billable_units(dec("2"), &card), dec("2"));
}

#[test]
fn test_units_above_minimum_pass_through() {
    let card = RateCard {
        amount_per_unit: dec("50"),
        minimum_units: dec("2"),
    };
    assert_eq!(billable_units(dec("3.25"), &card), dec("3.25"));
}

#[test]
fn test_amount_rounds_half_up() {
    let card = RateCard {
        amount_per_unit: dec("33.33"),
        minimum_units: Decimal::ONE,
    };
    // 1.5 * 33.33 = 49.995 -> 50.00
    assert_eq!(amount(dec("1.5"), &card), dec("50.00"));
}

#[test]
fn test_fallback_cards_are_asymmetric() {
    let client = fallback_rate(RateType::Client);
    let interpreter = fallback_rate(RateType::Interpreter);
    assert_eq!(client.amount_per_unit, dec("40"));
    assert_eq!(interpreter.amount_per_unit, dec("25"));
    assert_eq!(client.minimum_units, Decimal::ONE);
    assert_eq!(interpreter.minimum_units, Decimal::ONE);
}

#[test]
fn test_sides_fall_back_independently() {
    // Client rate exists, interpreter rate missing: only the
    // interpreter side uses its fallback.
    let client_rate = rate(RateType::Client, 60.0, 1.0);

    let client = price_side(RateType::Client, Some(&client_rate), 0, 2 * HOUR, 0);
    let interpreter = price_side(RateType::Interpreter, None, 0, 2 * HOUR, 0);

    assert_eq!(client.amount, dec("120.00"));
    assert_eq!(interpreter.amount, dec("50.00"));
}

#[test]
fn test_price_side_short_job_bills_minimum() {
    // 30-minute job with no break against the client fallback (40, 1):
    // units floor to 1, amount 40.00
    let side = price_side(RateType::Client, None, 0, HOUR / 2, 0);
    assert_eq!(side.units, Decimal::ONE);
    assert_eq!(side.amount, dec("40.00"));
}

#[test]
fn test_price_side_long_job_bills_actual_hours() {
    // 2h30 with 30min break => 2h against (40, 1)
    let side = price_side(RateType::Client, None, 0, 2 * HOUR + HOUR / 2, 30);
    assert_eq!(side.units, dec("2"));
    assert_eq!(side.amount, dec("80.00"));
}

#[test]
fn test_rate_card_prefers_stored_rate() {
    let stored = rate(RateType::Interpreter, 32.5, 1.5);
    let card = rate_card(RateType::Interpreter, Some(&stored));
    assert_eq!(card.amount_per_unit, dec("32.5"));
    assert_eq!(card.minimum_units, dec("1.5"));
}
