//! Money formatting for audit trail entries and notification messages.
//!
//! Amounts are stored as `i64` minor currency units (halalas for SAR) and
//! only ever formatted for display, never parsed back.

/// Format a minor-unit amount as `"SAR 1,234.56"`.
pub fn format_currency(amount_minor: i64, currency: &str) -> String {
    let sign = if amount_minor < 0 { "-" } else { "" };
    let abs = amount_minor.unsigned_abs();
    let major = abs / 100;
    let cents = abs % 100;

    let digits = major.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    format!("{currency} {sign}{grouped}.{cents:02}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_groups_thousands() {
        assert_eq!(format_currency(123_456, "SAR"), "SAR 1,234.56");
        assert_eq!(format_currency(100_000_000, "SAR"), "SAR 1,000,000.00");
    }

    #[test]
    fn test_format_small_amounts() {
        assert_eq!(format_currency(5, "SAR"), "SAR 0.05");
        assert_eq!(format_currency(0, "SAR"), "SAR 0.00");
        assert_eq!(format_currency(99, "SAR"), "SAR 0.99");
    }

    #[test]
    fn test_format_negative() {
        assert_eq!(format_currency(-123_456, "SAR"), "SAR -1,234.56");
    }
}
