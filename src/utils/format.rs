/// Whole-dollar US currency: `$1,234,567`. Rounds half away from zero.
pub fn format_currency(value: f64) -> String {
    let rounded = value.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{}${}", sign, grouped)
}

/// Fixed-point text with `decimals` places. Ties round away from zero
/// (`2.125` -> `2.13`); plain `{:.2}` would round them to even.
pub fn format_fixed(value: f64, decimals: usize) -> String {
    let factor = 10f64.powi(decimals as i32);
    let scaled = (value * factor).round() / factor;
    let rounded = if scaled.is_finite() { scaled } else { value };
    format!("{:.*}", decimals, rounded)
}

/// Ratio rendered as a percentage with one decimal, e.g. `0.0244` -> `2.4`.
pub fn format_percent(ratio: f64) -> String {
    format_fixed(ratio * 100.0, 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_currency_grouping() {
        assert_eq!(format_currency(0.0), "$0");
        assert_eq!(format_currency(999.0), "$999");
        assert_eq!(format_currency(1_000.0), "$1,000");
        assert_eq!(format_currency(102_500.0), "$102,500");
        assert_eq!(format_currency(1_234_567.0), "$1,234,567");
    }

    #[test]
    fn test_format_currency_rounding() {
        assert_eq!(format_currency(10_250.4), "$10,250");
        assert_eq!(format_currency(10_250.5), "$10,251");
        assert_eq!(format_currency(999.6), "$1,000");
        assert_eq!(format_currency(-1_500.0), "-$1,500");
    }

    #[test]
    fn test_format_fixed_rounds_ties_up() {
        assert_eq!(format_fixed(2.125, 2), "2.13");
        assert_eq!(format_fixed(0.25, 1), "0.3");
        assert_eq!(format_fixed(-2.125, 2), "-2.13");
        // 1.005 is stored just below the tie
        assert_eq!(format_fixed(1.005, 2), "1.00");
        assert_eq!(format_fixed(10.0, 2), "10.00");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(0.024390243902439025), "2.4");
        assert_eq!(format_percent(0.0), "0.0");
        assert_eq!(format_percent(0.5), "50.0");
        assert_eq!(format_percent(0.0125), "1.3");
    }
}
