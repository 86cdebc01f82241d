use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use std::str::FromStr;

/// Cell values that mean "no value" in the exports we receive.
const NULL_TOKENS: [&str; 5] = ["null", "nan", "nat", "none", "na"];

/// Whether a cell carries no value at all, as opposed to an unparseable one.
pub fn is_blank(raw: &str) -> bool {
    let trimmed = raw.trim();
    trimmed.is_empty() || NULL_TOKENS.iter().any(|t| trimmed.eq_ignore_ascii_case(t))
}

/// Parses a date cell with the first matching format.
///
/// Formats carrying a time of day are accepted and the time is dropped.
pub fn parse_date(raw: &str, formats: &[String]) -> Option<NaiveDate> {
    if is_blank(raw) {
        return None;
    }
    let trimmed = raw.trim();
    formats.iter().find_map(|format| {
        NaiveDate::parse_from_str(trimmed, format)
            .ok()
            .or_else(|| {
                NaiveDateTime::parse_from_str(trimmed, format)
                    .ok()
                    .map(|dt| dt.date())
            })
    })
}

/// Parses a whole number that may have been written as a float (`"2021.0"`).
fn parse_whole(raw: &str) -> Option<f64> {
    if is_blank(raw) {
        return None;
    }
    let value: f64 = raw.trim().parse().ok()?;
    (value.is_finite() && value.fract() == 0.0).then_some(value)
}

pub fn parse_year(raw: &str) -> Option<i32> {
    let trimmed = raw.trim();
    if let Ok(year) = trimmed.parse::<i32>() {
        return Some(year);
    }
    let value = parse_whole(trimmed)?;
    (value >= f64::from(i32::MIN) && value <= f64::from(i32::MAX)).then_some(value as i32)
}

pub fn parse_count(raw: &str) -> Option<u64> {
    let trimmed = raw.trim();
    if let Ok(count) = trimmed.parse::<u64>() {
        return Some(count);
    }
    let value = parse_whole(trimmed)?;
    (value >= 0.0 && value <= u64::MAX as f64).then_some(value as u64)
}

pub fn parse_rate(raw: &str) -> Option<Decimal> {
    if is_blank(raw) {
        return None;
    }
    let trimmed = raw.trim();
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn formats() -> Vec<String> {
        vec!["%Y-%m-%d".to_string(), "%d/%m/%Y %H:%M:%S".to_string()]
    }

    #[test]
    fn dates_try_each_format() {
        assert_eq!(
            parse_date("2021-05-02", &formats()),
            NaiveDate::from_ymd_opt(2021, 5, 2)
        );
        assert_eq!(
            parse_date(" 02/05/2021 13:45:00 ", &formats()),
            NaiveDate::from_ymd_opt(2021, 5, 2)
        );
    }

    #[test]
    fn bad_or_null_dates_are_absent() {
        assert_eq!(parse_date("", &formats()), None);
        assert_eq!(parse_date("NULL", &formats()), None);
        assert_eq!(parse_date("2021-13-45", &formats()), None);
        assert_eq!(parse_date("yesterday", &formats()), None);
    }

    #[test]
    fn years_accept_float_spelling() {
        assert_eq!(parse_year("2021"), Some(2021));
        assert_eq!(parse_year("2021.0"), Some(2021));
        assert_eq!(parse_year("2021.5"), None);
        assert_eq!(parse_year("nan"), None);
    }

    #[test]
    fn counts_reject_negatives() {
        assert_eq!(parse_count("12"), Some(12));
        assert_eq!(parse_count("12.0"), Some(12));
        assert_eq!(parse_count("-1"), None);
        assert_eq!(parse_count("x"), None);
    }

    #[test]
    fn rates_parse_as_decimals() {
        assert_eq!(parse_rate("62.5"), Some(dec!(62.5)));
        assert_eq!(parse_rate(""), None);
        assert_eq!(parse_rate("abc"), None);
    }
}
