//! Number parsing and display for form fields and results.
//!
//! Display is fixed to a single locale (es-CO) and currency (COP): digits are
//! grouped in thousands with `.`, amounts carry no decimals, and the currency
//! symbol is followed by a no-break space. Parsing never fails; anything that
//! is not a number degrades to zero.

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

use crate::types::Rate;

pub const LOCALE: &str = "es-CO";
pub const CURRENCY_CODE: &str = "COP";

const CURRENCY_SYMBOL: &str = "$";
const GROUP_SEPARATOR: char = '.';
const SYMBOL_SPACING: char = '\u{a0}';

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Keep only the ASCII digits of `text` and read them as an integer.
///
/// Empty input maps to 0. Values past `u64::MAX` saturate.
pub fn parse_digits(text: &str) -> u64 {
    text.chars()
        .filter_map(|c| c.to_digit(10))
        .fold(0u64, |acc, d| acc.saturating_mul(10).saturating_add(u64::from(d)))
}

/// Read the longest numeric prefix of `text` (after leading whitespace).
///
/// Accepts an optional sign, integer digits, a `.` fraction and an exponent,
/// so `"10abc"` reads as 10 and `"2.5e1"` as 25. Returns `None` when no digit
/// is found or the value does not fit a decimal.
pub fn parse_leading_number(text: &str) -> Option<Decimal> {
    let s = text.trim_start();
    let bytes = s.as_bytes();
    let digits_from = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut pos = 0;
    let negative = match bytes.first() {
        Some(b'-') => {
            pos = 1;
            true
        }
        Some(b'+') => {
            pos = 1;
            false
        }
        _ => false,
    };

    let int_end = digits_from(pos);
    let int_part = &s[pos..int_end];
    let mut frac_part = "";
    let mut end = int_end;
    if bytes.get(int_end) == Some(&b'.') {
        let frac_end = digits_from(int_end + 1);
        frac_part = &s[int_end + 1..frac_end];
        end = frac_end;
    }
    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }

    let mut exponent = "";
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut j = end + 1;
        if matches!(bytes.get(j), Some(b'+' | b'-')) {
            j += 1;
        }
        let exp_end = digits_from(j);
        if exp_end > j {
            exponent = &s[end + 1..exp_end];
        }
    }

    let mut literal = String::with_capacity(end + 2);
    if negative {
        literal.push('-');
    }
    literal.push_str(if int_part.is_empty() { "0" } else { int_part });
    if !frac_part.is_empty() {
        literal.push('.');
        literal.push_str(frac_part);
    }

    if exponent.is_empty() {
        Decimal::from_str(&literal).ok()
    } else {
        literal.push('e');
        literal.push_str(exponent);
        Decimal::from_scientific(&literal).ok()
    }
}

/// [`parse_leading_number`] with the missing case mapped to zero.
pub fn parse_number_or_zero(text: &str) -> Decimal {
    parse_leading_number(text).unwrap_or(Decimal::ZERO)
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

fn group_digits(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(GROUP_SEPARATOR);
        }
        out.push(c);
    }
    out
}

/// Round to whole units, half away from zero.
pub fn round_units(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Digits grouped by thousands, no symbol: `1234567` → `"1.234.567"`.
pub fn format_thousands(value: u64) -> String {
    group_digits(&value.to_string())
}

/// Whole-unit currency string: `1331000.4` → `"$ 1.331.000"`.
///
/// A value that rounds to zero is shown unsigned.
pub fn format_currency(value: Decimal) -> String {
    let rounded = round_units(value);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let units = rounded.abs().trunc().to_string();
    format!(
        "{sign}{CURRENCY_SYMBOL}{SYMBOL_SPACING}{}",
        group_digits(&units)
    )
}

/// Currency string that always shows its sign, as used for differences.
pub fn format_currency_delta(value: Decimal) -> String {
    let formatted = format_currency(value);
    if formatted.starts_with('-') {
        formatted
    } else {
        format!("+{formatted}")
    }
}

/// What a numeric input field shows for its raw text: empty for zero so a
/// cleared field stays blank, otherwise the grouped digits.
pub fn format_for_input(raw: &str) -> String {
    match parse_digits(raw) {
        0 => String::new(),
        n => format_thousands(n),
    }
}

/// Fractional rate as a percentage with four decimals: `0.1` → `"10.0000%"`.
pub fn format_rate_percent(rate: Rate) -> String {
    let pct = (rate * dec!(100)).round_dp_with_strategy(4, RoundingStrategy::MidpointAwayFromZero);
    format!("{pct:.4}%")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_digits_strips_separators() {
        assert_eq!(parse_digits("1.000.000"), 1_000_000);
        assert_eq!(parse_digits("$ 2.500"), 2_500);
        assert_eq!(parse_digits("abc"), 0);
        assert_eq!(parse_digits(""), 0);
    }

    #[test]
    fn test_parse_digits_saturates() {
        assert_eq!(parse_digits("99999999999999999999999"), u64::MAX);
    }

    #[test]
    fn test_parse_leading_number_prefix() {
        assert_eq!(parse_leading_number("10"), Some(dec!(10)));
        assert_eq!(parse_leading_number("  7.5%"), Some(dec!(7.5)));
        assert_eq!(parse_leading_number("10abc"), Some(dec!(10)));
        assert_eq!(parse_leading_number(".5"), Some(dec!(0.5)));
        assert_eq!(parse_leading_number("-3"), Some(dec!(-3)));
        assert_eq!(parse_leading_number("2.5e1"), Some(dec!(25)));
        assert_eq!(parse_leading_number("4e"), Some(dec!(4)));
    }

    #[test]
    fn test_parse_leading_number_rejects_non_numeric() {
        assert_eq!(parse_leading_number(""), None);
        assert_eq!(parse_leading_number("abc"), None);
        assert_eq!(parse_leading_number("."), None);
        assert_eq!(parse_leading_number("-"), None);
        assert_eq!(parse_number_or_zero("n/a"), Decimal::ZERO);
    }

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(1_000), "1.000");
        assert_eq!(format_thousands(1_331_000), "1.331.000");
        assert_eq!(format_thousands(12_345_678), "12.345.678");
    }

    #[test]
    fn test_format_currency_rounds_to_units() {
        assert_eq!(format_currency(dec!(1331000)), "$\u{a0}1.331.000");
        assert_eq!(format_currency(dec!(1051052.5)), "$\u{a0}1.051.053");
        assert_eq!(format_currency(dec!(0.4)), "$\u{a0}0");
        assert_eq!(format_currency(dec!(-0.4)), "$\u{a0}0");
        assert_eq!(format_currency(dec!(-2500)), "-$\u{a0}2.500");
    }

    #[test]
    fn test_format_currency_delta() {
        assert_eq!(format_currency_delta(dec!(31000)), "+$\u{a0}31.000");
        assert_eq!(format_currency_delta(Decimal::ZERO), "+$\u{a0}0");
        assert_eq!(format_currency_delta(dec!(-5)), "-$\u{a0}5");
    }

    #[test]
    fn test_format_for_input_blank_on_zero() {
        assert_eq!(format_for_input("0"), "");
        assert_eq!(format_for_input(""), "");
        assert_eq!(format_for_input("000"), "");
        assert_eq!(format_for_input("1000000"), "1.000.000");
    }

    #[test]
    fn test_thousands_round_trip() {
        for x in [0u64, 7, 1_000, 65_536, 1_000_000, 987_654_321_012, u64::MAX] {
            assert_eq!(parse_digits(&format_thousands(x)), x);
        }
    }

    #[test]
    fn test_format_rate_percent() {
        assert_eq!(format_rate_percent(dec!(0.1)), "10.0000%");
        assert_eq!(format_rate_percent(dec!(0.1) / dec!(12)), "0.8333%");
        assert_eq!(format_rate_percent(Decimal::ZERO), "0.0000%");
    }
}
