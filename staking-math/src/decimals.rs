//! Fixed-point conversions.
//!
//! On-chain amounts are integers scaled by `10^decimals`. The dashboard only
//! ever needs floating-point approximations of them for display, plus exact
//! string conversions for user input and truncated USD figures.

use crate::error::{MathError, Result};

/// Convert a fixed-point integer to the equivalent floating-point number.
///
/// ```text
/// value / 10^decimals
/// ```
///
/// No rounding beyond native `f64` division is applied.
pub fn to_number(value: u128, decimals: u8) -> f64 {
    value as f64 / 10f64.powi(i32::from(decimals))
}

/// `10^decimals` as a `u128`, or `None` when it does not fit.
pub fn scale(decimals: u8) -> Option<u128> {
    10u128.checked_pow(u32::from(decimals))
}

/// Parse a decimal string (`"1"`, `"0.25"`, `"1500.5"`) into a fixed-point
/// integer with `decimals` fractional digits.
pub fn parse_units(input: &str, decimals: u8) -> Result<u128> {
    let invalid = |reason: &str| MathError::InvalidAmount {
        input: input.to_string(),
        reason: reason.to_string(),
    };

    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(invalid("empty"));
    }

    let (whole, fraction) = match trimmed.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (trimmed, ""),
    };
    if whole.is_empty() && fraction.is_empty() {
        return Err(invalid("no digits"));
    }
    if !whole.chars().chain(fraction.chars()).all(|c| c.is_ascii_digit()) {
        return Err(invalid("expected only digits and a single '.'"));
    }
    if fraction.len() > usize::from(decimals) {
        return Err(invalid("too many decimal places"));
    }

    let unit = scale(decimals).ok_or(MathError::Overflow)?;
    let whole_value = if whole.is_empty() {
        0
    } else {
        whole.parse::<u128>().map_err(|_| MathError::Overflow)?
    };

    let padding = usize::from(decimals).saturating_sub(fraction.len());
    let fraction_value = if fraction.is_empty() {
        0
    } else {
        let digits = format!("{fraction}{}", "0".repeat(padding));
        digits.parse::<u128>().map_err(|_| MathError::Overflow)?
    };

    whole_value
        .checked_mul(unit)
        .and_then(|v| v.checked_add(fraction_value))
        .ok_or(MathError::Overflow)
}

/// Render a fixed-point integer as a decimal string, trimming trailing
/// fractional zeros (`1_500_000_000` at 9 decimals is `"1.5"`).
pub fn format_units(value: u128, decimals: u8) -> String {
    format_digits(&value.to_string(), decimals)
}

/// Same as [`format_units`] for an arbitrary-length string of base-10 digits.
pub(crate) fn format_digits(digits: &str, decimals: u8) -> String {
    let decimals = usize::from(decimals);
    if decimals == 0 {
        return digits.to_string();
    }

    let padded = if digits.len() <= decimals {
        format!("{}{digits}", "0".repeat(decimals.saturating_add(1).saturating_sub(digits.len())))
    } else {
        digits.to_string()
    };

    let split = padded.len().saturating_sub(decimals);
    let (whole, fraction) = padded.split_at(split);
    let fraction = fraction.trim_end_matches('0');
    if fraction.is_empty() {
        whole.to_string()
    } else {
        format!("{whole}.{fraction}")
    }
}
