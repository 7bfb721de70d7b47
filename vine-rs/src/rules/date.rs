//! Date rules.
//!
//! [`DATE`] parses the value and stores it back in the canonical
//! `YYYY-MM-DDTHH:MM:SS` form that `chrono::NaiveDateTime` deserializes
//! from. The comparison rules read that canonical form and compare at day
//! granularity.

use crate::helpers::parse_datetime;
use crate::messages;
use crate::rule::{RuleFactory, RuleMetadata, create_rule};
use chrono::{Duration, Local, NaiveDate, NaiveDateTime};
use serde_json::{Value, json};
use std::cmp::Ordering;
use std::sync::LazyLock;
use vine_rs_compiler::{FieldContext, RuntimeError, RuntimeResult};

/// Options of [`DATE`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateOptions {
    /// `chrono` format strings; empty means the built-in formats
    pub formats: Vec<String>,
}

/// What a date is compared against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateReference {
    Today,
    Tomorrow,
    Yesterday,
    /// A literal date string
    Value(String),
    /// A sibling field of the same parent
    Field(String),
}

impl DateReference {
    /// Resolve the reference. `Ok(None)` means a sibling field is missing or
    /// not a date, which skips the comparison.
    fn resolve(&self, field: &FieldContext, rule: &str) -> RuntimeResult<Option<NaiveDate>> {
        let today = Local::now().date_naive();
        match self {
            Self::Today => Ok(Some(today)),
            Self::Tomorrow => Ok(Some(today + Duration::days(1))),
            Self::Yesterday => Ok(Some(today - Duration::days(1))),
            Self::Value(input) => parse_datetime(input, &[])
                .map(|dt| Some(dt.date()))
                .ok_or_else(|| {
                    RuntimeError::invalid_usage(rule, format!("'{input}' is not a valid date"))
                }),
            Self::Field(name) => Ok(field
                .parent()
                .get(name)
                .and_then(Value::as_str)
                .and_then(|s| parse_datetime(s, &[]))
                .map(|dt| dt.date())),
        }
    }

    fn label(&self) -> String {
        match self {
            Self::Today => "today".to_string(),
            Self::Tomorrow => "tomorrow".to_string(),
            Self::Yesterday => "yesterday".to_string(),
            Self::Value(input) => input.clone(),
            Self::Field(name) => name.clone(),
        }
    }
}

pub static DATE: LazyLock<RuleFactory<DateOptions>> = LazyLock::new(|| {
    create_rule(
        "date",
        |options: &DateOptions, field| {
            let parsed = field
                .value()
                .and_then(Value::as_str)
                .and_then(|s| parse_datetime(s, &options.formats));
            match parsed {
                Some(dt) => {
                    let canonical = serde_json::to_value(dt)
                        .map_err(|e| RuntimeError::invalid_usage("date", e.to_string()))?;
                    field.mutate(canonical);
                }
                None => field.report(messages::DATE, "date", None),
            }
            Ok(())
        },
        RuleMetadata::default(),
    )
});

fn compare(
    field: &mut FieldContext,
    reference: &DateReference,
    rule: &str,
    message: &str,
    accept: fn(Ordering) -> bool,
) -> RuntimeResult<()> {
    if !field.is_valid() {
        return Ok(());
    }
    let value: NaiveDateTime = match field.value().map(|v| serde_json::from_value(v.clone())) {
        Some(Ok(dt)) => dt,
        _ => {
            return Err(RuntimeError::invalid_usage(
                rule,
                "the value is not a date; apply the date rule first",
            ));
        }
    };
    let Some(expected) = reference.resolve(field, rule)? else {
        return Ok(());
    };
    if !accept(value.date().cmp(&expected)) {
        field.report(message, rule, Some(json!({ "expectedValue": reference.label() })));
    }
    Ok(())
}

pub static EQUALS: LazyLock<RuleFactory<DateReference>> = LazyLock::new(|| {
    create_rule(
        "date.equals",
        |reference: &DateReference, field| {
            compare(field, reference, "date.equals", messages::DATE_EQUALS, Ordering::is_eq)
        },
        RuleMetadata::default(),
    )
});

pub static AFTER: LazyLock<RuleFactory<DateReference>> = LazyLock::new(|| {
    create_rule(
        "date.after",
        |reference: &DateReference, field| {
            compare(field, reference, "date.after", messages::DATE_AFTER, Ordering::is_gt)
        },
        RuleMetadata::default(),
    )
});

pub static BEFORE: LazyLock<RuleFactory<DateReference>> = LazyLock::new(|| {
    create_rule(
        "date.before",
        |reference: &DateReference, field| {
            compare(field, reference, "date.before", messages::DATE_BEFORE, Ordering::is_lt)
        },
        RuleMetadata::default(),
    )
});
