//! Amount comparison and display helpers

use bigdecimal::{BigDecimal, RoundingMode, Zero};
use std::str::FromStr;

/// Number of decimal places of the smallest currency unit
pub const CURRENCY_SCALE: i64 = 2;

/// Round to whole cents, half away from zero
pub fn round_to_cents(amount: &BigDecimal) -> BigDecimal {
    amount.with_scale_round(CURRENCY_SCALE, RoundingMode::HalfUp)
}

/// Compare two amounts at cent precision
pub fn amounts_equal(a: &BigDecimal, b: &BigDecimal) -> bool {
    round_to_cents(a) == round_to_cents(b)
}

/// Half of the smallest currency unit (0.005)
pub fn zero_tolerance() -> BigDecimal {
    BigDecimal::new(5.into(), CURRENCY_SCALE + 1)
}

/// Whether the amount is below half a cent in absolute value
pub fn is_effectively_zero(amount: &BigDecimal) -> bool {
    amount.abs() < zero_tolerance()
}

/// Amount rounded to cents for display; near-zero noise becomes exactly `0.00`
pub fn display_amount(amount: &BigDecimal) -> BigDecimal {
    if is_effectively_zero(amount) {
        BigDecimal::zero().with_scale(CURRENCY_SCALE)
    } else {
        round_to_cents(amount)
    }
}

/// Plain textual rendering without trailing zeros (`100.00` -> `100`, `-12.50` -> `-12.5`)
pub fn plain_amount(amount: &BigDecimal) -> String {
    if amount.is_zero() {
        return "0".to_string();
    }
    amount.normalized().to_plain_string()
}

/// Parse a ledger amount cell.
///
/// Whitespace anywhere in the cell (thousands separators, including non-breaking
/// spaces) is removed and a decimal comma is read as a decimal point. Returns `None`
/// for empty or non-numeric content.
pub fn parse_amount(raw: &str) -> Option<BigDecimal> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    if !cleaned
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+'))
    {
        return None;
    }
    BigDecimal::from_str(&cleaned).ok()
}
