use iso_currency::Currency;
use num_format::{Locale, ToFormattedString as _};
use unicode_width::UnicodeWidthChar as _;

/// Yen amount with en-locale thousands separators and the currency symbol
/// (1,000 ¥).
pub(crate) fn format_yen(amount: f64) -> String {
    format!("{} {}", format_yen_digits(amount), Currency::JPY.symbol())
}

/// Yen amount with thousands separators and no symbol (12,345), as used in
/// notification texts that append `円` themselves. A non-zero fraction is
/// kept, up to three digits (1,234.5).
pub(crate) fn format_yen_digits(amount: f64) -> String {
    let rounded = (amount.abs() * 1000.0).round() / 1000.0;
    let sign = if amount < 0.0 && rounded != 0.0 { "-" } else { "" };
    let integer = (rounded.trunc() as i64).to_formatted_string(&Locale::en);
    let fraction = format!("{:.3}", rounded.fract());
    let fraction = fraction
        .trim_start_matches('0')
        .trim_end_matches('0')
        .trim_end_matches('.');
    format!("{sign}{integer}{fraction}")
}

/// Pads or truncates to exactly `width` terminal columns. Double-width
/// characters count as two; one that would overflow is dropped.
pub(crate) fn fit(s: &str, width: usize) -> String {
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push_str(&" ".repeat(width - used));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yen_amounts() {
        assert!(format_yen(1234567.0).starts_with("1,234,567 "));
        assert_eq!(format_yen_digits(12345.0), "12,345");
        assert_eq!(format_yen_digits(-500.0), "-500");
    }

    #[test]
    fn yen_digits_keep_non_zero_fraction() {
        assert_eq!(format_yen_digits(1234.5), "1,234.5");
        assert_eq!(format_yen_digits(1000.25), "1,000.25");
        assert_eq!(format_yen_digits(-0.5), "-0.5");
        assert_eq!(format_yen_digits(99.0), "99");
    }

    #[test]
    fn fit_pads_and_truncates() {
        assert_eq!(fit("ab", 4), "ab  ");
        assert_eq!(fit("abcdef", 4), "abcd");
    }

    #[test]
    fn fit_counts_double_width_characters() {
        assert_eq!(fit("東京駅", 4), "東京");
        assert_eq!(fit("東京駅", 5), "東京 ");
        assert_eq!(fit("東京", 6), "東京  ");
    }
}
