//! Array rules. They run on the array itself, before its items.

use crate::messages;
use crate::rule::{RuleFactory, RuleMetadata, create_rule};
use serde_json::{Value, json};
use std::collections::HashSet;
use std::sync::LazyLock;
use vine_rs_compiler::FieldContext;

fn item_count(field: &FieldContext) -> Option<usize> {
    field.value().and_then(Value::as_array).map(Vec::len)
}

pub static MIN_LENGTH: LazyLock<RuleFactory<usize>> = LazyLock::new(|| {
    create_rule(
        "array.minLength",
        |min: &usize, field| {
            if item_count(field).is_some_and(|len| len < *min) {
                field.report(
                    messages::ARRAY_MIN_LENGTH,
                    "array.minLength",
                    Some(json!({ "min": min })),
                );
            }
            Ok(())
        },
        RuleMetadata::default(),
    )
});

pub static MAX_LENGTH: LazyLock<RuleFactory<usize>> = LazyLock::new(|| {
    create_rule(
        "array.maxLength",
        |max: &usize, field| {
            if item_count(field).is_some_and(|len| len > *max) {
                field.report(
                    messages::ARRAY_MAX_LENGTH,
                    "array.maxLength",
                    Some(json!({ "max": max })),
                );
            }
            Ok(())
        },
        RuleMetadata::default(),
    )
});

pub static FIXED_LENGTH: LazyLock<RuleFactory<usize>> = LazyLock::new(|| {
    create_rule(
        "array.fixedLength",
        |size: &usize, field| {
            if item_count(field).is_some_and(|len| len != *size) {
                field.report(
                    messages::ARRAY_FIXED_LENGTH,
                    "array.fixedLength",
                    Some(json!({ "size": size })),
                );
            }
            Ok(())
        },
        RuleMetadata::default(),
    )
});

pub static NOT_EMPTY: LazyLock<RuleFactory<()>> = LazyLock::new(|| {
    create_rule(
        "notEmpty",
        |_: &(), field| {
            if item_count(field) == Some(0) {
                field.report(messages::NOT_EMPTY, "notEmpty", None);
            }
            Ok(())
        },
        RuleMetadata::default(),
    )
});

/// Key an item is compared by: the whole item, or the listed properties.
fn distinct_key(item: &Value, fields: Option<&[String]>) -> String {
    match fields {
        None => item.to_string(),
        Some(fields) => Value::Array(
            fields
                .iter()
                .map(|name| item.get(name).cloned().unwrap_or(Value::Null))
                .collect(),
        )
        .to_string(),
    }
}

/// No two items may be equal. With fields, items are compared by those
/// properties only. The failure is reported on the array.
pub static DISTINCT: LazyLock<RuleFactory<Option<Vec<String>>>> = LazyLock::new(|| {
    create_rule(
        "distinct",
        |fields: &Option<Vec<String>>, field| {
            let Some(items) = field.value().and_then(Value::as_array) else {
                return Ok(());
            };
            let mut seen = HashSet::new();
            let has_duplicates = !items
                .iter()
                .all(|item| seen.insert(distinct_key(item, fields.as_deref())));
            if has_duplicates {
                let args = fields.as_ref().map(|fields| json!({ "fields": fields }));
                field.report(messages::DISTINCT, "distinct", args);
            }
            Ok(())
        },
        RuleMetadata::default(),
    )
});

/// Drops `null` and empty-string items.
pub static COMPACT: LazyLock<RuleFactory<()>> = LazyLock::new(|| {
    create_rule(
        "compact",
        |_: &(), field| {
            if let Some(items) = field.value().and_then(Value::as_array) {
                let compacted: Vec<Value> = items
                    .iter()
                    .filter(|item| !(item.is_null() || item.as_str() == Some("")))
                    .cloned()
                    .collect();
                field.mutate(Value::Array(compacted));
            }
            Ok(())
        },
        RuleMetadata::default(),
    )
});
