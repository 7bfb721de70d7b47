//! Shared helpers for the test modules.

use crate::{Schema, ValidateOptions, ValidationError, Vine};
use serde_json::Value;

/// `(field, rule)` pairs of a validation error, in report order.
pub fn pairs(error: &ValidationError) -> Vec<(String, String)> {
    error
        .messages
        .iter()
        .map(|entry| (entry.field.clone(), entry.rule.clone()))
        .collect()
}

/// Run `schema` synchronously and return the failures, empty when valid.
pub fn failures<S: Schema>(schema: &S, data: Value) -> Vec<(String, String)> {
    let validator = Vine::new().compile(schema);
    match validator.try_validate_sync(data, ValidateOptions::default()) {
        Ok(Ok(_)) => Vec::new(),
        Ok(Err(error)) => pairs(&error),
        Err(fatal) => panic!("unexpected fatal error: {fatal}"),
    }
}

/// Run `schema` synchronously and return its output, panicking on failure.
pub fn output<S: Schema>(schema: &S, data: Value) -> S::Output {
    match Vine::new().compile(schema).validate_sync(data) {
        Ok(output) => output,
        Err(error) => panic!("expected valid data, got {error:?}"),
    }
}

/// Shorthand for building expected pairs.
pub fn expect(items: &[(&str, &str)]) -> Vec<(String, String)> {
    items
        .iter()
        .map(|(field, rule)| (field.to_string(), rule.to_string()))
        .collect()
}
