//! Literal, enum and accepted rules.

use crate::helpers::{as_boolean, as_number, number_value};
use crate::messages;
use crate::rule::{RuleFactory, RuleMetadata, create_rule};
use serde_json::{Value, json};
use std::fmt;
use std::sync::{Arc, LazyLock};
use vine_rs_compiler::FieldContext;

/// Computes enum choices from the field being validated.
pub type ChoicesFn = Arc<dyn Fn(&FieldContext) -> Vec<Value> + Send + Sync>;

/// Choices of an enum, fixed or computed per field.
#[derive(Clone)]
pub enum EnumChoices {
    Static(Vec<Value>),
    Dynamic(ChoicesFn),
}

impl EnumChoices {
    pub fn resolve(&self, field: &FieldContext) -> Vec<Value> {
        match self {
            Self::Static(choices) => choices.clone(),
            Self::Dynamic(compute) => compute(field),
        }
    }
}

impl fmt::Debug for EnumChoices {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(choices) => f.debug_tuple("Static").field(choices).finish(),
            Self::Dynamic(_) => f.write_str("Dynamic(<fn>)"),
        }
    }
}

/// Coerce `value` into the shape of `expected` when a string or number
/// spelling of it was submitted.
fn coerce_to(expected: &Value, value: &Value) -> Option<Value> {
    match expected {
        Value::Bool(_) => as_boolean(value).map(Value::Bool),
        Value::Number(_) => as_number(value).map(number_value),
        _ => None,
    }
}

/// The value must equal one fixed value.
pub static LITERAL: LazyLock<RuleFactory<Value>> = LazyLock::new(|| {
    create_rule(
        "literal",
        |expected: &Value, field| {
            let Some(value) = field.value().cloned() else {
                return Ok(());
            };
            if &value == expected {
                return Ok(());
            }
            match coerce_to(expected, &value) {
                Some(coerced) if &coerced == expected => field.mutate(coerced),
                _ => field.report(
                    messages::LITERAL,
                    "literal",
                    Some(json!({ "expectedValue": expected })),
                ),
            }
            Ok(())
        },
        RuleMetadata::default(),
    )
});

pub static ENUM: LazyLock<RuleFactory<EnumChoices>> = LazyLock::new(|| {
    create_rule(
        "enum",
        |choices: &EnumChoices, field| {
            let choices = choices.resolve(field);
            let found = field.value().is_some_and(|value| choices.contains(value));
            if !found {
                field.report(messages::ENUM, "enum", Some(json!({ "choices": choices })));
            }
            Ok(())
        },
        RuleMetadata::default(),
    )
});

fn is_accepted(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64() == Some(1.0),
        Value::String(s) => matches!(s.as_str(), "on" | "1" | "yes" | "true"),
        _ => false,
    }
}

/// Checkbox style consent. Runs on undefined values and normalizes accepted
/// spellings to `true`.
pub static ACCEPTED: LazyLock<RuleFactory<()>> = LazyLock::new(|| {
    create_rule(
        "accepted",
        |_: &(), field| {
            if field.value().is_some_and(is_accepted) {
                field.mutate(Value::Bool(true));
            } else {
                field.report(messages::ACCEPTED, "accepted", None);
            }
            Ok(())
        },
        RuleMetadata::new().implicit(),
    )
});
