//! Value coercion helpers shared by the built-in rules.
//!
//! Form posts and query strings deliver everything as strings, so the rules
//! accept the common textual spellings of numbers and booleans and normalize
//! them before checking.

use chrono::{NaiveDate, NaiveDateTime};
use serde_json::{Number, Value};

/// Coerce a value into a boolean.
///
/// `true`, `1`, `"1"`, `"true"` and `"on"` are true; `false`, `0`, `"0"` and
/// `"false"` are false. Anything else is `None`.
pub fn as_boolean(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => {
            let n = n.as_f64()?;
            if n == 1.0 {
                Some(true)
            } else if n == 0.0 {
                Some(false)
            } else {
                None
            }
        }
        Value::String(s) => match s.as_str() {
            "1" | "true" | "on" => Some(true),
            "0" | "false" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Coerce a value into a finite number. Numeric strings are parsed.
pub fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) if !s.trim().is_empty() => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|n| n.is_finite())
}

/// JSON number for `n`, kept integral when it has no fraction.
pub fn number_value(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        Value::Number(Number::from(n as i64))
    } else {
        Number::from_f64(n).map_or(Value::Null, Value::Number)
    }
}

/// Formats accepted when parsing date strings, most specific first.
pub const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Parse a date or datetime string using `formats`, falling back to
/// RFC 3339 and to date-only values at midnight.
pub fn parse_datetime(input: &str, formats: &[String]) -> Option<NaiveDateTime> {
    let input = input.trim();
    if !formats.is_empty() {
        return formats.iter().find_map(|format| parse_with(input, format));
    }
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(input, format).ok())
        .or_else(|| {
            chrono::DateTime::parse_from_rfc3339(input)
                .ok()
                .map(|dt| dt.naive_utc())
        })
        .or_else(|| parse_with(input, "%Y-%m-%d"))
}

fn parse_with(input: &str, format: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(input, format).ok().or_else(|| {
        NaiveDate::parse_from_str(input, format)
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_boolean_spellings() {
        for truthy in [json!(true), json!(1), json!("1"), json!("true"), json!("on")] {
            assert_eq!(as_boolean(&truthy), Some(true), "{truthy}");
        }
        for falsy in [json!(false), json!(0), json!("0"), json!("false")] {
            assert_eq!(as_boolean(&falsy), Some(false), "{falsy}");
        }
        assert_eq!(as_boolean(&json!("foo")), None);
        assert_eq!(as_boolean(&json!(2)), None);
    }

    #[test]
    fn test_number_parsing() {
        assert_eq!(as_number(&json!("42")), Some(42.0));
        assert_eq!(as_number(&json!(" 1.5 ")), Some(1.5));
        assert_eq!(as_number(&json!("")), None);
        assert_eq!(as_number(&json!("abc")), None);
        assert_eq!(as_number(&json!("inf")), None);
        assert_eq!(number_value(3.0), json!(3));
        assert_eq!(number_value(3.5), json!(3.5));
    }

    #[test]
    fn test_parse_datetime_formats() {
        let date = parse_datetime("2024-02-29", &[]).unwrap();
        assert_eq!(date.to_string(), "2024-02-29 00:00:00");
        assert!(parse_datetime("2024-02-29 10:30:00", &[]).is_some());
        assert!(parse_datetime("2024-02-29T10:30:00Z", &[]).is_some());
        assert!(parse_datetime("29/02/2024", &[]).is_none());
        assert!(parse_datetime("29/02/2024", &["%d/%m/%Y".to_string()]).is_some());
    }

    proptest! {
        /// Integers survive the string round trip through `as_number`.
        #[test]
        fn prop_integer_strings_parse(n in -1_000_000i64..1_000_000) {
            prop_assert_eq!(as_number(&json!(n.to_string())), Some(n as f64));
        }
    }
}
