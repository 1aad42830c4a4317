/// Parse a user-typed amount the lenient way form inputs are read: leading
/// whitespace is ignored, the longest numeric prefix wins, and anything that
/// does not yield a finite number becomes `0.0`.
pub fn parse_amount(raw: &str) -> f64 {
    let trimmed = raw.trim();
    let numeric_len = trimmed
        .find(|c: char| !(c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E')))
        .unwrap_or(trimmed.len());
    let candidate = &trimmed[..numeric_len];

    (1..=candidate.len())
        .rev()
        .find_map(|end| candidate[..end].parse::<f64>().ok())
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
}

/// Format an amount with thousands separators and at most three decimals,
/// e.g. `1234.5` -> `1,234.5`.
pub fn format_amount(value: f64) -> String {
    let fixed = format!("{:.3}", value.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let fraction = fraction.trim_end_matches('0');

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let negative = value < 0.0 && (whole != "0" || !fraction.is_empty());
    let sign = if negative { "-" } else { "" };

    if fraction.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{fraction}")
    }
}

/// Amount in riel as shown on the form and the exported document
pub fn format_khr(value: f64) -> String {
    format!("{} KHR", format_amount(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_and_padded_numbers() {
        assert_eq!(parse_amount("10.5"), 10.5);
        assert_eq!(parse_amount("  2 "), 2.0);
        assert_eq!(parse_amount(".25"), 0.25);
        assert_eq!(parse_amount("-3"), -3.0);
    }

    #[test]
    fn keeps_the_numeric_prefix() {
        assert_eq!(parse_amount("12abc"), 12.0);
        assert_eq!(parse_amount("1.5.6"), 1.5);
        assert_eq!(parse_amount("3e2 riel"), 300.0);
    }

    #[test]
    fn garbage_becomes_zero() {
        assert_eq!(parse_amount(""), 0.0);
        assert_eq!(parse_amount("abc"), 0.0);
        assert_eq!(parse_amount("-"), 0.0);
        assert_eq!(parse_amount("inf"), 0.0);
        assert_eq!(parse_amount("NaN"), 0.0);
        assert_eq!(parse_amount("1e999"), 0.0);
    }

    #[test]
    fn formats_with_grouping() {
        assert_eq!(format_amount(0.0), "0");
        assert_eq!(format_amount(26.0), "26");
        assert_eq!(format_amount(1234.5), "1,234.5");
        assert_eq!(format_amount(1_000_000.0), "1,000,000");
        assert_eq!(format_amount(0.1 + 0.2), "0.3");
        assert_eq!(format_amount(-9876.125), "-9,876.125");
        assert_eq!(format_khr(21.0), "21 KHR");
    }
}
