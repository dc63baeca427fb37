//! Amount parsing for statement transactions.
//!
//! Transaction records keep amounts verbatim; these helpers exist for
//! numeric consumers (totals, summaries) that want real arithmetic.

use rust_decimal::Decimal;
use std::str::FromStr;

/// Parse a statement amount token into a decimal.
///
/// Tolerates Indian digit grouping (1,23,456.78) as well as western
/// grouping and plain numbers; sign is kept.
pub fn parse_amount(s: &str) -> Option<Decimal> {
    let trimmed = s.trim();
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let cleaned: String = unsigned.chars().filter(|c| *c != ',').collect();
    Decimal::from_str(&cleaned).ok()
}

/// Format an amount with Indian digit grouping (last three digits, then
/// pairs) and two decimal places.
pub fn format_amount(amount: Decimal) -> String {
    let rendered = format!("{:.2}", amount);
    let (sign, digits) = match rendered.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", rendered.as_str()),
    };
    let (int_part, dec_part) = digits.split_once('.').unwrap_or((digits, "00"));

    let chars: Vec<char> = int_part.chars().collect();
    let mut grouped = String::new();
    for (i, c) in chars.iter().enumerate() {
        let remaining = chars.len() - i;
        if i > 0 && (remaining == 3 || (remaining > 3 && (remaining - 3) % 2 == 0)) {
            grouped.push(',');
        }
        grouped.push(*c);
    }

    format!("{}{}.{}", sign, grouped, dec_part)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount_groupings() {
        assert_eq!(parse_amount("500.00"), Some(Decimal::from_str("500.00").unwrap()));
        assert_eq!(
            parse_amount("50,000.00"),
            Some(Decimal::from_str("50000.00").unwrap())
        );
        assert_eq!(
            parse_amount("1,23,456.78"),
            Some(Decimal::from_str("123456.78").unwrap())
        );
    }

    #[test]
    fn test_parse_amount_signs() {
        assert_eq!(parse_amount("-2,000.00"), Some(Decimal::from_str("-2000.00").unwrap()));
        assert_eq!(parse_amount("+750"), Some(Decimal::from_str("750").unwrap()));
    }

    #[test]
    fn test_parse_amount_rejects_garbage() {
        assert_eq!(parse_amount("12..3"), None);
        assert_eq!(parse_amount("AMOUNT"), None);
        assert_eq!(parse_amount(""), None);
    }

    #[test]
    fn test_format_amount_indian_grouping() {
        assert_eq!(format_amount(Decimal::from_str("123456.78").unwrap()), "1,23,456.78");
        assert_eq!(format_amount(Decimal::from_str("1234.5").unwrap()), "1,234.50");
        assert_eq!(format_amount(Decimal::from_str("500").unwrap()), "500.00");
        assert_eq!(format_amount(Decimal::from_str("-50000").unwrap()), "-50,000.00");
    }
}
