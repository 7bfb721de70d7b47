//! Built-in rules
//!
//! Every rule is a lazily created [`RuleFactory`](crate::RuleFactory) static.
//! Schema builders attach them through their typed methods (`min_length`,
//! `email`, ...); custom schemas can attach them with `use_rule`.
//!
//! Rules only run on defined values unless they are implicit, so most of
//! them can assume a value is present.

pub mod array;
pub mod boolean;
pub mod date;
pub mod literal;
pub mod number;
pub mod optional;
pub mod record;
pub mod string;

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;
use vine_rs_compiler::{FieldContext, RuntimeError, RuntimeResult};

/// A pattern compiled on first use.
pub(crate) type LazyPattern = LazyLock<Result<Regex, regex::Error>>;

/// Borrow a lazily compiled pattern, turning a compile failure into a fatal
/// error of `rule`.
pub(crate) fn pattern<'a>(pattern: &'a LazyPattern, rule: &str) -> RuntimeResult<&'a Regex> {
    pattern
        .as_ref()
        .map_err(|e| RuntimeError::invalid_usage(rule, e.to_string()))
}

/// Owned string value of the field, when it is a string.
pub(crate) fn string_value(field: &FieldContext) -> Option<String> {
    field.value().and_then(Value::as_str).map(str::to_string)
}

/// Whether a sibling of the field is present and not null.
pub(crate) fn sibling_defined(field: &FieldContext, name: &str) -> bool {
    !matches!(field.parent().get(name), None | Some(Value::Null))
}
