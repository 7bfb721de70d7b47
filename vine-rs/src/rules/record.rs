//! Record rules.

use crate::messages;
use crate::rule::{RuleFactory, RuleMetadata, create_rule};
use serde_json::{Value, json};
use std::sync::{Arc, LazyLock};
use vine_rs_compiler::FieldContext;

/// Receives the keys of a record and reports through the field.
pub type KeysValidatorFn = Arc<dyn Fn(&[String], &mut FieldContext) + Send + Sync>;

fn key_count(field: &FieldContext) -> Option<usize> {
    field.value().and_then(Value::as_object).map(|map| map.len())
}

pub static MIN_LENGTH: LazyLock<RuleFactory<usize>> = LazyLock::new(|| {
    create_rule(
        "record.minLength",
        |min: &usize, field| {
            if key_count(field).is_some_and(|len| len < *min) {
                field.report(
                    messages::RECORD_MIN_LENGTH,
                    "record.minLength",
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
        "record.maxLength",
        |max: &usize, field| {
            if key_count(field).is_some_and(|len| len > *max) {
                field.report(
                    messages::RECORD_MAX_LENGTH,
                    "record.maxLength",
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
        "record.fixedLength",
        |size: &usize, field| {
            if key_count(field).is_some_and(|len| len != *size) {
                field.report(
                    messages::RECORD_FIXED_LENGTH,
                    "record.fixedLength",
                    Some(json!({ "size": size })),
                );
            }
            Ok(())
        },
        RuleMetadata::default(),
    )
});

pub static VALID_KEYS: LazyLock<RuleFactory<KeysValidatorFn>> = LazyLock::new(|| {
    create_rule(
        "validKeys",
        |validator: &KeysValidatorFn, field| {
            let keys: Option<Vec<String>> = field
                .value()
                .and_then(Value::as_object)
                .map(|map| map.keys().cloned().collect());
            if let Some(keys) = keys {
                validator(&keys, &mut *field);
            }
            Ok(())
        },
        RuleMetadata::default(),
    )
});
