//! Currency rounding and display for single-currency money values.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Every amount is a `rust_decimal::Decimal`; intermediate results keep full
//! precision and are rounded exactly once, right before they are stored or shown.

use rust_decimal::{Decimal, RoundingStrategy};

/// Number of fractional digits money is persisted with.
pub const CURRENCY_SCALE: u32 = 2;

/// Rounds an amount to two decimal places, half away from zero.
///
/// This is the only rounding applied to a value about to be persisted or
/// displayed.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use weft_shared::types::round_currency;
///
/// assert_eq!(round_currency(dec!(123.456)), dec!(123.46));
/// assert_eq!(round_currency(dec!(0.125)), dec!(0.13));
/// ```
#[must_use]
pub fn round_currency(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(CURRENCY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Formats an amount for display with the given currency symbol.
///
/// The amount is rounded with [`round_currency`], always shows two decimals and
/// groups the integer part the Indian way (`1,00,000.00`).
#[must_use]
pub fn format_currency(amount: Decimal, symbol: &str) -> String {
    let rounded = round_currency(amount);
    let sign = if rounded < Decimal::ZERO { "-" } else { "" };

    let mut magnitude = rounded.abs();
    magnitude.rescale(CURRENCY_SCALE);
    let text = magnitude.to_string();
    let (integer, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    format!("{sign}{symbol}{}.{fraction}", group_indian(integer))
}

/// Inserts separators: the last three digits, then groups of two.
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups = Vec::new();
    let mut rest = head;
    while rest.len() > 2 {
        let (h, t) = rest.split_at(rest.len() - 2);
        groups.push(t);
        rest = h;
    }
    groups.push(rest);
    groups.reverse();

    format!("{},{tail}", groups.join(","))
}
