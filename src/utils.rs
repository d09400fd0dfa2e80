//! Miscellaneous helper utilities: logging setup and decimal-string handling.

use bigdecimal::{BigDecimal, RoundingMode};
use num_bigint::BigInt;
use num_traits::{Signed, Zero};
use regex::Regex;
use std::str::FromStr;
use std::sync::LazyLock;
use tracing_subscriber::{EnvFilter, fmt};

/// Non-negative decimal: digits with an optional fractional part, or a bare
/// fractional part such as ".5".
static DECIMAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+\.?\d*|\.\d+)$").expect("static regex"));

/// Initialize `tracing` subscriber with env-based filter.
///
/// If `RUST_LOG` is not set, defaults to `info` level.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();
}

/// Returns true for non-empty, non-negative decimal strings ("10", "0.5", ".5", "3.").
pub fn is_decimal_str(text: &str) -> bool {
    DECIMAL_RE.is_match(text)
}

/// Normalizes user amount input. Empty stays empty, a leading "." gets a "0"
/// prefix, anything that is not a non-negative decimal (whitespace included)
/// yields `None`.
pub fn normalize_amount_input(text: &str) -> Option<String> {
    if text.is_empty() {
        return Some(String::new());
    }
    if !is_decimal_str(text) {
        return None;
    }
    if text.starts_with('.') {
        Some(format!("0{text}"))
    } else {
        Some(text.to_string())
    }
}

/// Number of digits after the decimal point.
pub fn fraction_digits(text: &str) -> usize {
    text.split_once('.').map(|(_, frac)| frac.len()).unwrap_or(0)
}

/// Parses a decimal string, treating empty input as zero.
pub fn parse_amount(text: &str) -> Option<BigDecimal> {
    if text.is_empty() {
        return Some(BigDecimal::zero());
    }
    BigDecimal::from_str(text).ok()
}

/// Truncates `value` to `decimals` fractional digits (rounds toward zero).
pub fn floor_to_precision(value: &BigDecimal, decimals: u32) -> BigDecimal {
    value.with_scale_round(decimals as i64, RoundingMode::Down)
}

/// Converts a display amount into the currency's minimal units, truncating any
/// excess precision.
pub fn to_base_units(value: &BigDecimal, decimals: u32) -> BigInt {
    let factor = BigDecimal::new(BigInt::from(1), -(decimals as i64));
    let (units, _) = (value * factor)
        .with_scale_round(0, RoundingMode::Down)
        .into_bigint_and_exponent();
    units
}

/// Fixed-point rendering with exactly `decimals` fractional digits, never in
/// exponent notation.
pub fn to_plain_string(value: &BigDecimal, decimals: u32) -> String {
    let (units, _) = value
        .with_scale_round(decimals as i64, RoundingMode::Down)
        .into_bigint_and_exponent();
    let sign = if units.is_negative() { "-" } else { "" };
    let mut digits = units.abs().to_string();
    let scale = decimals as usize;
    if scale == 0 {
        return format!("{sign}{digits}");
    }
    if digits.len() <= scale {
        digits = format!("{}{}", "0".repeat(scale + 1 - digits.len()), digits);
    }
    let (int_part, frac_part) = digits.split_at(digits.len() - scale);
    format!("{sign}{int_part}.{frac_part}")
}

/// Display rendering: at most `max_decimals` fractional digits, trailing zeros trimmed.
pub fn format_amount(value: &BigDecimal, max_decimals: u32) -> String {
    let plain = to_plain_string(value, max_decimals);
    if plain.contains('.') {
        plain
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    } else {
        plain
    }
}

/// Renders a ratio (e.g. 0.005) as a percentage string (e.g. "0.5%").
pub fn format_percent(ratio: &BigDecimal, max_decimals: u32) -> String {
    format!("{}%", format_amount(&(ratio * BigDecimal::from(100)), max_decimals))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    #[test]
    fn decimal_pattern() {
        for ok in ["0", "10", "0.5", ".5", "3.", "001.100"] {
            assert!(is_decimal_str(ok), "{ok} should be accepted");
        }
        for bad in ["", "-1", "1e5", "abc", "1.2.3", " 1", "1,5", "."] {
            assert!(!is_decimal_str(bad), "{bad} should be rejected");
        }
    }

    #[test]
    fn normalizes_leading_dot_and_empty() {
        assert_eq!(normalize_amount_input(".25").as_deref(), Some("0.25"));
        assert_eq!(normalize_amount_input("").as_deref(), Some(""));
        assert_eq!(normalize_amount_input("12a"), None);
        for padded in [" 1", "1 ", " ", "\t2"] {
            assert_eq!(normalize_amount_input(padded), None, "{padded:?} should be rejected");
        }
        assert_eq!(parse_amount(" 1"), None);
    }

    #[test]
    fn floor_truncates_instead_of_rounding() {
        assert_eq!(floor_to_precision(&dec("1.2345679"), 6), dec("1.234567"));
        assert_eq!(floor_to_precision(&dec("0.9999999"), 0), dec("0"));
    }

    #[test]
    fn base_units() {
        assert_eq!(to_base_units(&dec("10"), 6), BigInt::from(10_000_000));
        assert_eq!(to_base_units(&dec("9.8505"), 6), BigInt::from(9_850_500));
        assert_eq!(to_base_units(&dec("0.0000001"), 6), BigInt::from(0));
    }

    #[test]
    fn plain_and_display_formatting() {
        assert_eq!(to_plain_string(&dec("0.000001"), 6), "0.000001");
        assert_eq!(to_plain_string(&dec("12"), 2), "12.00");
        assert_eq!(format_amount(&dec("9.950000"), 6), "9.95");
        assert_eq!(format_amount(&dec("100"), 6), "100");
        assert_eq!(format_amount(&dec("1.23456789"), 3), "1.234");
        assert_eq!(format_percent(&dec("0.005"), 2), "0.5%");
    }
}
