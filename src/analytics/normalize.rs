use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

const QUOTE_SUFFIXES: &[&str] = &["USDT", "USDC", "BUSD", "PERP"];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%d.%m.%Y %H:%M:%S",
    "%d.%m.%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d.%m.%Y"];

/// Extract a number from a cell such as `"$1,234.50"` or `"-12.3 USDT"`.
///
/// Everything except digits, `-` and `.` is dropped and the longest numeric
/// prefix of the rest is parsed. Returns NaN when nothing parses.
pub fn parse_number(raw: &str) -> f64 {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '-' || *c == '.')
        .collect();

    // A sign only at the start, one decimal point.
    let mut end = 0;
    let mut seen_dot = false;
    let mut seen_digit = false;
    for (i, c) in cleaned.char_indices() {
        match c {
            '-' if i == 0 => {}
            '.' if !seen_dot => seen_dot = true,
            '0'..='9' => seen_digit = true,
            _ => break,
        }
        end = i + 1;
    }

    if !seen_digit {
        return f64::NAN;
    }
    cleaned[..end].parse().unwrap_or(f64::NAN)
}

/// `parse_number` that treats NaN as missing.
pub fn number(raw: &str) -> Option<f64> {
    let v = parse_number(raw);
    if v.is_nan() {
        None
    } else {
        Some(v)
    }
}

/// Two-decimal amount with thousands separators, e.g. `$1,234.50` or `-$3.00`.
pub fn format_currency(value: f64, symbol: &str) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    let sign = if value < 0.0 { "-" } else { "" };
    format!("{}{}{}", sign, symbol, group_thousands(value.abs()))
}

/// Absolute amount with an explicit polarity prefix, e.g. `+$125.00`.
pub fn format_signed_currency(value: f64, symbol: &str) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    let sign = if value < 0.0 { "-" } else { "+" };
    format!("{}{}{}", sign, symbol, group_thousands(value.abs()))
}

fn group_thousands(abs: f64) -> String {
    let fixed = format!("{:.2}", abs);
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{}.{}", grouped, frac_part)
}

/// Base asset of an exchange symbol: `LINKUSDT` -> `LINK`, `BTC-PERP` -> `BTC`.
pub fn clean_symbol(raw: &str) -> String {
    let mut symbol = raw.trim().to_uppercase();
    loop {
        let before = symbol.len();
        for suffix in QUOTE_SUFFIXES {
            if symbol.len() > suffix.len() && symbol.ends_with(suffix) {
                symbol.truncate(symbol.len() - suffix.len());
            }
        }
        while symbol.ends_with(&['-', '_', '/'][..]) {
            symbol.pop();
        }
        if symbol.len() == before {
            return symbol;
        }
    }
}

/// Best-effort timestamp parse over the formats exchange exports use.
/// Naive values are taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc));
    }

    // Some exports append the zone in parentheses, e.g. "2024-01-05 10:00:00(UTC)".
    let s = s.trim_end_matches("(UTC)").trim_end_matches("UTC").trim();

    if s.chars().all(|c| c.is_ascii_digit()) {
        let n: i64 = s.parse().ok()?;
        return if n > 100_000_000_000 {
            Utc.timestamp_millis_opt(n).single()
        } else if n > 100_000_000 {
            Utc.timestamp_opt(n, 0).single()
        } else {
            None
        };
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc());
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn parse_number_strips_currency_and_grouping() {
        assert_eq!(parse_number("$1,234.50"), 1234.5);
        assert_eq!(parse_number("-12.3 USDT"), -12.3);
        assert_eq!(parse_number(" 75 "), 75.0);
    }

    #[test]
    fn parse_number_nan_when_nothing_numeric() {
        assert!(parse_number("").is_nan());
        assert!(parse_number("n/a").is_nan());
        assert!(parse_number("-").is_nan());
        assert_eq!(number("abc"), None);
    }

    #[test]
    fn parse_number_takes_leading_numeric_prefix() {
        assert_eq!(parse_number("1.2.3"), 1.2);
        assert_eq!(parse_number("100-"), 100.0);
        assert_eq!(parse_number("-5-3"), -5.0);
        assert!(parse_number("--5").is_nan());
    }

    #[test]
    fn parse_number_handles_long_cells() {
        let cell = format!("1.{}-{}", "0".repeat(50_000), "9".repeat(50_000));
        assert_eq!(parse_number(&cell), 1.0);
        assert_eq!(parse_number(".5"), 0.5);
        assert_eq!(parse_number("7."), 7.0);
        assert!(parse_number(".").is_nan());
    }

    #[test]
    fn currency_formatting() {
        assert_eq!(format_currency(1234.5, "$"), "$1,234.50");
        assert_eq!(format_currency(-3.0, "$"), "-$3.00");
        assert_eq!(format_currency(0.0, "€"), "€0.00");
        assert_eq!(format_currency(1_000_000.0, "$"), "$1,000,000.00");
        assert_eq!(format_currency(f64::NAN, "$"), "$0.00");
    }

    #[test]
    fn signed_currency_formatting() {
        assert_eq!(format_signed_currency(125.0, "$"), "+$125.00");
        assert_eq!(format_signed_currency(-50.0, "$"), "-$50.00");
    }

    #[test]
    fn clean_symbol_drops_quote_assets() {
        assert_eq!(clean_symbol("LINKUSDT"), "LINK");
        assert_eq!(clean_symbol("ETHBUSD"), "ETH");
        assert_eq!(clean_symbol("solusdc"), "SOL");
        assert_eq!(clean_symbol("BTC-PERP"), "BTC");
        assert_eq!(clean_symbol("BTCUSDTPERP"), "BTC");
        assert_eq!(clean_symbol("AAPL"), "AAPL");
        assert_eq!(clean_symbol("USDT"), "USDT");
    }

    #[test]
    fn parse_timestamp_common_forms() {
        let ts = parse_timestamp("2024-01-05 10:30:00").unwrap();
        assert_eq!((ts.year(), ts.month(), ts.day(), ts.hour()), (2024, 1, 5, 10));

        let ts = parse_timestamp("2024-01-05T10:30:00Z").unwrap();
        assert_eq!(ts.minute(), 30);

        let ts = parse_timestamp("01/05/2024").unwrap();
        assert_eq!((ts.month(), ts.day()), (1, 5));

        let ts = parse_timestamp("1704450600000").unwrap();
        assert_eq!(ts.timestamp(), 1_704_450_600);

        assert!(parse_timestamp("2024-01-05 10:30:00(UTC)").is_some());
    }

    #[test]
    fn parse_timestamp_rejects_garbage() {
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("yesterday").is_none());
        assert!(parse_timestamp("42").is_none());
    }
}
