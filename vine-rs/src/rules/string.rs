//! String rules.

use super::{LazyPattern, pattern, string_value};
use crate::messages;
use crate::rule::{RuleFactory, RuleMetadata, create_rule};
use regex::Regex;
use serde_json::{Value, json};
use std::sync::LazyLock;
use vine_rs_compiler::FieldContext;

static EMAIL_PATTERN: LazyPattern =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@.]+(\.[^\s@.]+)+$"));
static ALPHA_PATTERN: LazyPattern = LazyLock::new(|| Regex::new(r"^[a-zA-Z]+$"));
static ALPHA_NUMERIC_PATTERN: LazyPattern = LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9]+$"));

fn report_unless(
    field: &mut FieldContext,
    valid: bool,
    message: &str,
    rule: &str,
    args: Option<Value>,
) {
    if !valid {
        field.report(message, rule, args);
    }
}

/// Ensures the value is a string.
pub static STRING: LazyLock<RuleFactory<()>> = LazyLock::new(|| {
    create_rule(
        "string",
        |_: &(), field| {
            let valid = field.value().is_some_and(Value::is_string);
            report_unless(field, valid, messages::STRING, "string", None);
            Ok(())
        },
        RuleMetadata::default(),
    )
});

pub static EMAIL: LazyLock<RuleFactory<()>> = LazyLock::new(|| {
    create_rule(
        "email",
        |_: &(), field| {
            let Some(value) = string_value(field) else {
                return Ok(());
            };
            let valid = pattern(&EMAIL_PATTERN, "email")?.is_match(&value);
            report_unless(field, valid, messages::EMAIL, "email", None);
            Ok(())
        },
        RuleMetadata::default(),
    )
});

/// Matches the value against a caller supplied pattern.
pub static REGEX: LazyLock<RuleFactory<Regex>> = LazyLock::new(|| {
    create_rule(
        "regex",
        |expression: &Regex, field| {
            let Some(value) = string_value(field) else {
                return Ok(());
            };
            let valid = expression.is_match(&value);
            report_unless(field, valid, messages::REGEX, "regex", None);
            Ok(())
        },
        RuleMetadata::default(),
    )
});

/// UUID, optionally restricted to one version.
pub static UUID: LazyLock<RuleFactory<Option<usize>>> = LazyLock::new(|| {
    create_rule(
        "uuid",
        |version: &Option<usize>, field| {
            let Some(value) = string_value(field) else {
                return Ok(());
            };
            let valid = uuid::Uuid::parse_str(&value).is_ok_and(|id| {
                version.is_none_or(|expected| id.get_version_num() == expected)
            });
            report_unless(field, valid, messages::UUID, "uuid", None);
            Ok(())
        },
        RuleMetadata::default(),
    )
});

pub static ALPHA: LazyLock<RuleFactory<()>> = LazyLock::new(|| {
    create_rule(
        "alpha",
        |_: &(), field| {
            let Some(value) = string_value(field) else {
                return Ok(());
            };
            let valid = pattern(&ALPHA_PATTERN, "alpha")?.is_match(&value);
            report_unless(field, valid, messages::ALPHA, "alpha", None);
            Ok(())
        },
        RuleMetadata::default(),
    )
});

pub static ALPHA_NUMERIC: LazyLock<RuleFactory<()>> = LazyLock::new(|| {
    create_rule(
        "alphaNumeric",
        |_: &(), field| {
            let Some(value) = string_value(field) else {
                return Ok(());
            };
            let valid = pattern(&ALPHA_NUMERIC_PATTERN, "alphaNumeric")?.is_match(&value);
            report_unless(field, valid, messages::ALPHA_NUMERIC, "alphaNumeric", None);
            Ok(())
        },
        RuleMetadata::default(),
    )
});

fn char_count(field: &FieldContext) -> Option<usize> {
    field
        .value()
        .and_then(Value::as_str)
        .map(|s| s.chars().count())
}

pub static MIN_LENGTH: LazyLock<RuleFactory<usize>> = LazyLock::new(|| {
    create_rule(
        "minLength",
        |min: &usize, field| {
            if char_count(field).is_some_and(|len| len < *min) {
                field.report(messages::MIN_LENGTH, "minLength", Some(json!({ "min": min })));
            }
            Ok(())
        },
        RuleMetadata::default(),
    )
});

pub static MAX_LENGTH: LazyLock<RuleFactory<usize>> = LazyLock::new(|| {
    create_rule(
        "maxLength",
        |max: &usize, field| {
            if char_count(field).is_some_and(|len| len > *max) {
                field.report(messages::MAX_LENGTH, "maxLength", Some(json!({ "max": max })));
            }
            Ok(())
        },
        RuleMetadata::default(),
    )
});

pub static FIXED_LENGTH: LazyLock<RuleFactory<usize>> = LazyLock::new(|| {
    create_rule(
        "fixedLength",
        |size: &usize, field| {
            if char_count(field).is_some_and(|len| len != *size) {
                field.report(messages::FIXED_LENGTH, "fixedLength", Some(json!({ "size": size })));
            }
            Ok(())
        },
        RuleMetadata::default(),
    )
});

pub static STARTS_WITH: LazyLock<RuleFactory<String>> = LazyLock::new(|| {
    create_rule(
        "startsWith",
        |substring: &String, field| {
            let Some(value) = string_value(field) else {
                return Ok(());
            };
            if !value.starts_with(substring.as_str()) {
                field.report(
                    messages::STARTS_WITH,
                    "startsWith",
                    Some(json!({ "substring": substring })),
                );
            }
            Ok(())
        },
        RuleMetadata::default(),
    )
});

pub static ENDS_WITH: LazyLock<RuleFactory<String>> = LazyLock::new(|| {
    create_rule(
        "endsWith",
        |substring: &String, field| {
            let Some(value) = string_value(field) else {
                return Ok(());
            };
            if !value.ends_with(substring.as_str()) {
                field.report(
                    messages::ENDS_WITH,
                    "endsWith",
                    Some(json!({ "substring": substring })),
                );
            }
            Ok(())
        },
        RuleMetadata::default(),
    )
});

/// The value must equal `<name>_confirmation` (or the given field) in the
/// parent.
pub static CONFIRMED: LazyLock<RuleFactory<Option<String>>> = LazyLock::new(|| {
    create_rule(
        "confirmed",
        |confirmation: &Option<String>, field| {
            let other = confirmation
                .clone()
                .unwrap_or_else(|| format!("{}_confirmation", field.name()));
            if field.parent().get(&other) != field.value() {
                field.report(
                    messages::CONFIRMED,
                    "confirmed",
                    Some(json!({ "otherField": other })),
                );
            }
            Ok(())
        },
        RuleMetadata::default(),
    )
});

pub static SAME_AS: LazyLock<RuleFactory<String>> = LazyLock::new(|| {
    create_rule(
        "sameAs",
        |other: &String, field| {
            if field.parent().get(other) != field.value() {
                field.report(messages::SAME_AS, "sameAs", Some(json!({ "otherField": other })));
            }
            Ok(())
        },
        RuleMetadata::default(),
    )
});

pub static NOT_SAME_AS: LazyLock<RuleFactory<String>> = LazyLock::new(|| {
    create_rule(
        "notSameAs",
        |other: &String, field| {
            if field.parent().get(other) == field.value() {
                field.report(
                    messages::NOT_SAME_AS,
                    "notSameAs",
                    Some(json!({ "otherField": other })),
                );
            }
            Ok(())
        },
        RuleMetadata::default(),
    )
});

pub static IN: LazyLock<RuleFactory<Vec<String>>> = LazyLock::new(|| {
    create_rule(
        "in",
        |choices: &Vec<String>, field| {
            let Some(value) = string_value(field) else {
                return Ok(());
            };
            if !choices.contains(&value) {
                field.report(messages::IN, "in", Some(json!({ "choices": choices })));
            }
            Ok(())
        },
        RuleMetadata::default(),
    )
});

pub static NOT_IN: LazyLock<RuleFactory<Vec<String>>> = LazyLock::new(|| {
    create_rule(
        "notIn",
        |list: &Vec<String>, field| {
            let Some(value) = string_value(field) else {
                return Ok(());
            };
            if list.contains(&value) {
                field.report(messages::NOT_IN, "notIn", Some(json!({ "list": list })));
            }
            Ok(())
        },
        RuleMetadata::default(),
    )
});

/// String mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringCase {
    Trim,
    Lower,
    Upper,
}

pub static NORMALIZE: LazyLock<RuleFactory<StringCase>> = LazyLock::new(|| {
    create_rule(
        "normalize",
        |case: &StringCase, field| {
            if let Some(value) = string_value(field) {
                let normalized = match case {
                    StringCase::Trim => value.trim().to_string(),
                    StringCase::Lower => value.to_lowercase(),
                    StringCase::Upper => value.to_uppercase(),
                };
                field.mutate(Value::String(normalized));
            }
            Ok(())
        },
        RuleMetadata::default(),
    )
});
