//! Number rules.
//!
//! [`NUMBER`] normalizes numeric strings into JSON numbers, so the rules
//! after it read the value with `as_f64`.

use crate::helpers::{as_number, number_value};
use crate::messages;
use crate::rule::{RuleFactory, RuleMetadata, create_rule};
use serde_json::{Value, json};
use std::sync::LazyLock;
use vine_rs_compiler::FieldContext;

/// Options of [`NUMBER`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NumberOptions {
    /// Reject numeric strings
    pub strict: bool,
}

/// Inclusive bounds of [`RANGE`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeOptions {
    pub min: f64,
    pub max: f64,
}

/// Accepted count of fraction digits for [`DECIMAL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecimalOptions {
    pub min_digits: usize,
    pub max_digits: usize,
}

fn number(field: &FieldContext) -> Option<f64> {
    field.value().and_then(Value::as_f64)
}

pub static NUMBER: LazyLock<RuleFactory<NumberOptions>> = LazyLock::new(|| {
    create_rule(
        "number",
        |options: &NumberOptions, field| {
            let parsed = match field.value() {
                Some(Value::Number(n)) => n.as_f64().filter(|n| n.is_finite()),
                Some(value) if !options.strict => as_number(value),
                _ => None,
            };
            match parsed {
                Some(n) if !field.value().is_some_and(Value::is_number) => {
                    field.mutate(number_value(n))
                }
                Some(_) => {}
                None => field.report(messages::NUMBER, "number", None),
            }
            Ok(())
        },
        RuleMetadata::default(),
    )
});

pub static MIN: LazyLock<RuleFactory<f64>> = LazyLock::new(|| {
    create_rule(
        "min",
        |min: &f64, field| {
            if number(field).is_some_and(|n| n < *min) {
                field.report(messages::MIN, "min", Some(json!({ "min": number_value(*min) })));
            }
            Ok(())
        },
        RuleMetadata::default(),
    )
});

pub static MAX: LazyLock<RuleFactory<f64>> = LazyLock::new(|| {
    create_rule(
        "max",
        |max: &f64, field| {
            if number(field).is_some_and(|n| n > *max) {
                field.report(messages::MAX, "max", Some(json!({ "max": number_value(*max) })));
            }
            Ok(())
        },
        RuleMetadata::default(),
    )
});

pub static RANGE: LazyLock<RuleFactory<RangeOptions>> = LazyLock::new(|| {
    create_rule(
        "range",
        |range: &RangeOptions, field| {
            if number(field).is_some_and(|n| n < range.min || n > range.max) {
                field.report(
                    messages::RANGE,
                    "range",
                    Some(json!({
                        "min": number_value(range.min),
                        "max": number_value(range.max),
                    })),
                );
            }
            Ok(())
        },
        RuleMetadata::default(),
    )
});

pub static POSITIVE: LazyLock<RuleFactory<()>> = LazyLock::new(|| {
    create_rule(
        "positive",
        |_: &(), field| {
            if number(field).is_some_and(|n| n <= 0.0) {
                field.report(messages::POSITIVE, "positive", None);
            }
            Ok(())
        },
        RuleMetadata::default(),
    )
});

pub static NEGATIVE: LazyLock<RuleFactory<()>> = LazyLock::new(|| {
    create_rule(
        "negative",
        |_: &(), field| {
            if number(field).is_some_and(|n| n >= 0.0) {
                field.report(messages::NEGATIVE, "negative", None);
            }
            Ok(())
        },
        RuleMetadata::default(),
    )
});

pub static WITHOUT_DECIMALS: LazyLock<RuleFactory<()>> = LazyLock::new(|| {
    create_rule(
        "withoutDecimals",
        |_: &(), field| {
            if number(field).is_some_and(|n| n.fract() != 0.0) {
                field.report(messages::WITHOUT_DECIMALS, "withoutDecimals", None);
            }
            Ok(())
        },
        RuleMetadata::default(),
    )
});

/// Number of digits after the decimal point in the JSON rendering.
fn fraction_digits(value: &Value) -> usize {
    let text = value.to_string();
    text.split_once('.').map_or(0, |(_, fraction)| fraction.len())
}

pub static DECIMAL: LazyLock<RuleFactory<DecimalOptions>> = LazyLock::new(|| {
    create_rule(
        "decimal",
        |range: &DecimalOptions, field| {
            let digits = match field.value() {
                Some(value @ Value::Number(_)) => fraction_digits(value),
                _ => return Ok(()),
            };
            if digits < range.min_digits || digits > range.max_digits {
                let expected = if range.min_digits == range.max_digits {
                    range.min_digits.to_string()
                } else {
                    format!("{}-{}", range.min_digits, range.max_digits)
                };
                field.report(messages::DECIMAL, "decimal", Some(json!({ "digits": expected })));
            }
            Ok(())
        },
        RuleMetadata::default(),
    )
});

pub static IN: LazyLock<RuleFactory<Vec<f64>>> = LazyLock::new(|| {
    create_rule(
        "in",
        |choices: &Vec<f64>, field| {
            if number(field).is_some_and(|n| !choices.contains(&n)) {
                field.report(messages::IN, "in", Some(json!({ "choices": choices })));
            }
            Ok(())
        },
        RuleMetadata::default(),
    )
});
