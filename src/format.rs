//! Amount formatting for previews and form input.

/// Formats an amount with comma thousands separators: `1,234,567`, `-4,375`.
pub fn group_thousands(amount: i64) -> String {
    let grouped = group_digits(&amount.unsigned_abs().to_string());
    if amount < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// Won display text, e.g. `₩43,749`.
pub fn won(amount: i64) -> String {
    format!("₩{}", group_thousands(amount))
}

/// Normalizes what a user typed into the amount field: keeps the digits only
/// and regroups them (`"abc1234def"` becomes `"1,234"`).
pub fn format_amount_input(raw: &str) -> String {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    group_digits(&digits)
}

/// Reads a comma-grouped amount back. Leading digits are parsed and anything
/// after them is ignored; input with no leading number parses as 0.
pub fn parse_amount(formatted: &str) -> i64 {
    let cleaned = formatted.replace(',', "");
    let cleaned = cleaned.trim_start();

    let (sign, rest) = match cleaned.as_bytes().first() {
        Some(b'-') => (-1, &cleaned[1..]),
        Some(b'+') => (1, &cleaned[1..]),
        _ => (1, cleaned),
    };
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());

    rest[..end].parse::<i64>().map_or(0, |value| sign * value)
}

fn group_digits(digits: &str) -> String {
    let len = digits.len();
    let mut grouped = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, "0")]
    #[case(100, "100")]
    #[case(1_000, "1,000")]
    #[case(43_749, "43,749")]
    #[case(1_000_000, "1,000,000")]
    #[case(1_234_567, "1,234,567")]
    #[case(-4_375, "-4,375")]
    #[case(i64::MIN, "-9,223,372,036,854,775,808")]
    fn test_group_thousands(#[case] amount: i64, #[case] expected: &str) {
        assert_eq!(group_thousands(amount), expected);
    }

    #[test]
    fn test_won() {
        assert_eq!(won(173_958), "₩173,958");
    }

    #[rstest]
    #[case("1000000", "1,000,000")]
    #[case("100", "100")]
    #[case("1234567", "1,234,567")]
    #[case("abc1234def", "1,234")]
    #[case("", "")]
    fn test_format_amount_input(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(format_amount_input(raw), expected);
    }

    #[rstest]
    #[case("1,000,000", 1_000_000)]
    #[case("100", 100)]
    #[case("", 0)]
    #[case("abc", 0)]
    #[case("12abc", 12)]
    #[case(" -4,375", -4_375)]
    fn test_parse_amount(#[case] formatted: &str, #[case] expected: i64) {
        assert_eq!(parse_amount(formatted), expected);
    }
}
