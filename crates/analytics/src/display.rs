//! Formatting applied at the presentation boundary.
//!
//! NaN always renders as `NaN`; degenerate metrics are shown, never hidden.

const NAN_LABEL: &str = "NaN";

/// `1234567` -> `1,234,567`
pub fn format_count(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Currency in millions with two decimals, e.g. `$1.23M`.
pub fn format_millions(value: f64) -> String {
    if value.is_nan() {
        return NAN_LABEL.to_string();
    }
    format!("${:.2}M", value / 1e6)
}

/// Currency with two decimals, e.g. `$12.34`.
pub fn format_currency(value: f64) -> String {
    if value.is_nan() {
        return NAN_LABEL.to_string();
    }
    format!("${value:.2}")
}

/// A share or ratio with two decimals.
pub fn format_ratio(value: f64) -> String {
    if value.is_nan() {
        return NAN_LABEL.to_string();
    }
    format!("{value:.2}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_groups_thousands() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1_000), "1,000");
        assert_eq!(format_count(1_234_567), "1,234,567");
    }

    #[test]
    fn currency_formats() {
        assert_eq!(format_millions(2_345_678.0), "$2.35M");
        assert_eq!(format_millions(0.0), "$0.00M");
        assert_eq!(format_currency(41.5), "$41.50");
        assert_eq!(format_ratio(0.756), "0.76");
    }

    #[test]
    fn nan_is_rendered_explicitly() {
        assert_eq!(format_millions(f64::NAN), "NaN");
        assert_eq!(format_currency(f64::NAN), "NaN");
        assert_eq!(format_ratio(f64::NAN), "NaN");
    }
}
