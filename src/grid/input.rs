//! Locale-tolerant numeric input.
//!
//! Operators type prices the Argentine way (`1.234,56`) as often as the
//! plain way (`1234.56`). A lone comma is always the decimal separator.
//! When both separators appear, the last one is the decimal separator and
//! the other groups thousands. Several copies of a single separator mean
//! thousands grouping.

use crate::error::InputError;

/// Characters accepted while typing into a numeric field.
#[must_use]
pub const fn accepts_char(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '.' | ',' | '-' | '$' | '%' | ' ')
}

/// Parse a decimal number typed by a person.
///
/// `$`, `%` and whitespace are ignored.
pub fn parse_decimal(input: &str) -> Result<f64, InputError> {
    let cleaned: String = input
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '$' | '%'))
        .collect();
    if cleaned.is_empty() {
        return Err(InputError::Empty);
    }

    let not_a_number = || InputError::NotANumber(input.trim().to_string());

    let (negative, body) = match cleaned.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, cleaned.strip_prefix('+').unwrap_or(&cleaned)),
    };
    if body.is_empty() || !body.chars().all(|c| c.is_ascii_digit() || c == '.' || c == ',') {
        return Err(not_a_number());
    }

    let normalized = normalize_separators(body);
    let value: f64 = normalized.parse().map_err(|_| not_a_number())?;
    if !value.is_finite() {
        return Err(not_a_number());
    }
    Ok(if negative { -value } else { value })
}

/// Rewrite `body` so that `.` is the only (optional) decimal separator.
fn normalize_separators(body: &str) -> String {
    let dots = body.matches('.').count();
    let commas = body.matches(',').count();

    match (dots, commas) {
        (0, 0) => body.to_string(),
        (_, 0) if dots > 1 => body.replace('.', ""),
        (_, 0) => body.to_string(),
        (0, 1) => body.replace(',', "."),
        (0, _) => body.replace(',', ""),
        _ => {
            let last_dot = body.rfind('.').unwrap_or(0);
            let last_comma = body.rfind(',').unwrap_or(0);
            if last_comma > last_dot {
                body.replace('.', "").replace(',', ".")
            } else {
                body.replace(',', "")
            }
        }
    }
}

/// Parse a price. Negative values are rejected.
pub fn parse_price(input: &str) -> Result<f64, InputError> {
    let value = parse_decimal(input)?;
    if value < 0.0 {
        return Err(InputError::Negative(value));
    }
    Ok(value)
}

/// Format a value for seeding an input: at most two decimals, no trailing zeros.
#[must_use]
pub fn format_decimal(value: f64) -> String {
    let s = format!("{value:.2}");
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_and_comma_decimals() {
        assert_eq!(parse_decimal("1234.56"), Ok(1234.56));
        assert_eq!(parse_decimal("1234,56"), Ok(1234.56));
        assert_eq!(parse_decimal("3,8"), Ok(3.8));
        assert_eq!(parse_decimal("  42 "), Ok(42.0));
    }

    #[test]
    fn test_thousands_grouping() {
        assert_eq!(parse_decimal("1.234.567,89"), Ok(1_234_567.89));
        assert_eq!(parse_decimal("1,234,567.89"), Ok(1_234_567.89));
        assert_eq!(parse_decimal("1.234.567"), Ok(1_234_567.0));
        assert_eq!(parse_decimal("1,234,567"), Ok(1_234_567.0));
    }

    #[test]
    fn test_currency_and_percent_signs_ignored() {
        assert_eq!(parse_decimal("$ 150.000,50"), Ok(150_000.5));
        assert_eq!(parse_decimal("6%"), Ok(6.0));
    }

    #[test]
    fn test_rejects_garbage() {
        assert_eq!(parse_decimal(""), Err(InputError::Empty));
        assert_eq!(parse_decimal(" $ "), Err(InputError::Empty));
        assert!(matches!(parse_decimal("abc"), Err(InputError::NotANumber(_))));
        assert!(matches!(parse_decimal("1.2,3.4"), Err(InputError::NotANumber(_))));
        assert!(matches!(parse_decimal("-"), Err(InputError::NotANumber(_))));
        assert!(matches!(parse_decimal("."), Err(InputError::NotANumber(_))));
    }

    #[test]
    fn test_negative_prices_rejected() {
        assert_eq!(parse_decimal("-5"), Ok(-5.0));
        assert_eq!(parse_price("-5"), Err(InputError::Negative(-5.0)));
        assert_eq!(parse_price("0"), Ok(0.0));
    }

    #[test]
    fn test_format_decimal() {
        assert_eq!(format_decimal(1234.5), "1234.5");
        assert_eq!(format_decimal(100.0), "100");
        assert_eq!(format_decimal(3.8), "3.8");
        assert_eq!(format_decimal(0.125), "0.13");
    }
}
