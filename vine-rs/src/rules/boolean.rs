//! Boolean rule.

use crate::helpers::as_boolean;
use crate::messages;
use crate::rule::{RuleFactory, RuleMetadata, create_rule};
use serde_json::Value;
use std::sync::LazyLock;

/// Options of [`BOOLEAN`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BooleanOptions {
    /// Only accept JSON booleans
    pub strict: bool,
}

/// Accepts booleans and their common spellings, normalizing the value to a
/// JSON boolean.
pub static BOOLEAN: LazyLock<RuleFactory<BooleanOptions>> = LazyLock::new(|| {
    create_rule(
        "boolean",
        |options: &BooleanOptions, field| {
            let coerced = match field.value() {
                Some(Value::Bool(b)) => Some(*b),
                Some(value) if !options.strict => as_boolean(value),
                _ => None,
            };
            match coerced {
                Some(b) => field.mutate(Value::Bool(b)),
                None => field.report(messages::BOOLEAN, "boolean", None),
            }
            Ok(())
        },
        RuleMetadata::default(),
    )
});
