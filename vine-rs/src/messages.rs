//! Default messages and the built-in [`SimpleMessagesProvider`].
//!
//! Every built-in rule reports with one of the templates below. Templates use
//! `{{ key }}` placeholders: `{{ field }}` renders the field's display name,
//! every other key is looked up in the rule's arguments using dotted paths.
//!
//! # Example
//! ```rust
//! use std::collections::HashMap;
//! use vine_rs::messages::{interpolate, SimpleMessagesProvider};
//! use serde_json::json;
//!
//! let text = interpolate(
//!     "The {{ field }} field must have at least {{ min }} characters",
//!     "username",
//!     Some(&json!({"min": 4})),
//! );
//! assert_eq!(text, "The username field must have at least 4 characters");
//!
//! let provider = SimpleMessagesProvider::new(HashMap::new(), HashMap::new());
//! # let _ = provider;
//! ```

use serde_json::Value;
use std::collections::HashMap;
use vine_rs_compiler::{FieldContext, MessagesProvider};

pub use vine_rs_compiler::messages::{ARRAY, OBJECT, REQUIRED, UNION, UNION_GROUP};

pub const STRING: &str = "The {{ field }} field must be a string";
pub const EMAIL: &str = "The {{ field }} field must be a valid email address";
pub const REGEX: &str = "The {{ field }} field format is invalid";
pub const UUID: &str = "The {{ field }} field must be a valid UUID";
pub const ALPHA: &str = "The {{ field }} field must contain only letters";
pub const ALPHA_NUMERIC: &str = "The {{ field }} field must contain only letters and numbers";
pub const MIN_LENGTH: &str = "The {{ field }} field must have at least {{ min }} characters";
pub const MAX_LENGTH: &str = "The {{ field }} field must not be greater than {{ max }} characters";
pub const FIXED_LENGTH: &str = "The {{ field }} field must be {{ size }} characters long";
pub const STARTS_WITH: &str = "The {{ field }} field must start with {{ substring }}";
pub const ENDS_WITH: &str = "The {{ field }} field must end with {{ substring }}";
pub const CONFIRMED: &str = "The {{ field }} field and {{ otherField }} field must be the same";
pub const SAME_AS: &str = "The {{ field }} field and {{ otherField }} field must be the same";
pub const NOT_SAME_AS: &str = "The {{ field }} field and {{ otherField }} field must be different";
pub const IN: &str = "The selected {{ field }} is invalid";
pub const NOT_IN: &str = "The selected {{ field }} is invalid";

pub const NUMBER: &str = "The {{ field }} field must be a number";
pub const MIN: &str = "The {{ field }} field must be at least {{ min }}";
pub const MAX: &str = "The {{ field }} field must not be greater than {{ max }}";
pub const RANGE: &str = "The {{ field }} field must be between {{ min }} and {{ max }}";
pub const POSITIVE: &str = "The {{ field }} field must be positive";
pub const NEGATIVE: &str = "The {{ field }} field must be negative";
pub const DECIMAL: &str = "The {{ field }} field must have {{ digits }} decimal places";
pub const WITHOUT_DECIMALS: &str = "The {{ field }} field must be an integer";

pub const BOOLEAN: &str = "The value must be a boolean";
pub const LITERAL: &str = "The {{ field }} field must be {{ expectedValue }}";
pub const ENUM: &str = "The selected {{ field }} is invalid";
pub const ACCEPTED: &str = "The {{ field }} field must be accepted";

pub const DATE: &str = "The {{ field }} field must be a datetime value";
pub const DATE_EQUALS: &str = "The {{ field }} field must be a date equal to {{ expectedValue }}";
pub const DATE_AFTER: &str = "The {{ field }} field must be a date after {{ expectedValue }}";
pub const DATE_BEFORE: &str = "The {{ field }} field must be a date before {{ expectedValue }}";

pub const ARRAY_MIN_LENGTH: &str = "The {{ field }} field must have at least {{ min }} items";
pub const ARRAY_MAX_LENGTH: &str = "The {{ field }} field must not have more than {{ max }} items";
pub const ARRAY_FIXED_LENGTH: &str = "The {{ field }} field must contain {{ size }} items";
pub const NOT_EMPTY: &str = "The {{ field }} field must not be empty";
pub const DISTINCT: &str = "The {{ field }} field has duplicate values";

pub const RECORD_MIN_LENGTH: &str = "The {{ field }} field must have at least {{ min }} items";
pub const RECORD_MAX_LENGTH: &str = "The {{ field }} field must not have more than {{ max }} items";
pub const RECORD_FIXED_LENGTH: &str = "The {{ field }} field must contain {{ size }} items";

/// Template of every built-in rule, keyed by rule name.
///
/// [`SimpleMessagesProvider`] falls back to it when a rule reports an empty
/// message. Also a starting point for a translated message table.
pub const DEFAULT_MESSAGES: &[(&str, &str)] = &[
    ("required", REQUIRED),
    ("object", OBJECT),
    ("array", ARRAY),
    ("union", UNION),
    ("unionGroup", UNION_GROUP),
    ("string", STRING),
    ("email", EMAIL),
    ("regex", REGEX),
    ("uuid", UUID),
    ("alpha", ALPHA),
    ("alphaNumeric", ALPHA_NUMERIC),
    ("minLength", MIN_LENGTH),
    ("maxLength", MAX_LENGTH),
    ("fixedLength", FIXED_LENGTH),
    ("startsWith", STARTS_WITH),
    ("endsWith", ENDS_WITH),
    ("confirmed", CONFIRMED),
    ("sameAs", SAME_AS),
    ("notSameAs", NOT_SAME_AS),
    ("in", IN),
    ("notIn", NOT_IN),
    ("number", NUMBER),
    ("min", MIN),
    ("max", MAX),
    ("range", RANGE),
    ("positive", POSITIVE),
    ("negative", NEGATIVE),
    ("decimal", DECIMAL),
    ("withoutDecimals", WITHOUT_DECIMALS),
    ("boolean", BOOLEAN),
    ("literal", LITERAL),
    ("enum", ENUM),
    ("accepted", ACCEPTED),
    ("date", DATE),
    ("date.equals", DATE_EQUALS),
    ("date.after", DATE_AFTER),
    ("date.before", DATE_BEFORE),
    ("array.minLength", ARRAY_MIN_LENGTH),
    ("array.maxLength", ARRAY_MAX_LENGTH),
    ("array.fixedLength", ARRAY_FIXED_LENGTH),
    ("notEmpty", NOT_EMPTY),
    ("distinct", DISTINCT),
    ("record.minLength", RECORD_MIN_LENGTH),
    ("record.maxLength", RECORD_MAX_LENGTH),
    ("record.fixedLength", RECORD_FIXED_LENGTH),
];

/// Default template of a rule.
pub fn default_message(rule: &str) -> Option<&'static str> {
    DEFAULT_MESSAGES
        .iter()
        .find(|(name, _)| *name == rule)
        .map(|(_, message)| *message)
}

/// Resolves messages from an override table and renders placeholders.
///
/// Lookup order: `"<wildcard path>.<rule>"`, then `"<rule>"`, then the raw
/// message the rule reported with. An empty raw message resolves to the
/// rule's entry in [`DEFAULT_MESSAGES`].
#[derive(Debug, Clone, Default)]
pub struct SimpleMessagesProvider {
    messages: HashMap<String, String>,
    fields: HashMap<String, String>,
}

impl SimpleMessagesProvider {
    /// `messages` holds overrides, `fields` the display names keyed by
    /// wildcard path.
    pub fn new(messages: HashMap<String, String>, fields: HashMap<String, String>) -> Self {
        Self { messages, fields }
    }

    fn template<'a>(&'a self, message: &'a str, rule: &str, path: &str) -> &'a str {
        if !path.is_empty() {
            if let Some(template) = self.messages.get(&format!("{path}.{rule}")) {
                return template;
            }
        }
        match self.messages.get(rule) {
            Some(template) => template,
            None if message.is_empty() => default_message(rule).unwrap_or(message),
            None => message,
        }
    }
}

impl MessagesProvider for SimpleMessagesProvider {
    fn get_message(
        &self,
        message: &str,
        rule: &str,
        field: &FieldContext,
        args: Option<&Value>,
    ) -> String {
        let path = field.wildcard_path();
        let template = self.template(message, rule, path);
        let field_name = self.fields.get(path).map_or(path, String::as_str);
        interpolate(template, field_name, args)
    }
}

/// Render `{{ key }}` placeholders.
///
/// `field` is substituted for `{{ field }}` unless `args` carries its own
/// `field` key. Missing keys render as `undefined`; an unclosed `{{` is left
/// as is.
pub fn interpolate(template: &str, field: &str, args: Option<&Value>) -> String {
    let mut output = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        let Some(len) = rest[start + 2..].find("}}") else {
            break;
        };
        output.push_str(&rest[..start]);
        let key = rest[start + 2..start + 2 + len].trim();
        output.push_str(&render_key(key, field, args));
        rest = &rest[start + 2 + len + 2..];
    }

    output.push_str(rest);
    output
}

fn render_key(key: &str, field: &str, args: Option<&Value>) -> String {
    match args.and_then(|args| lookup(args, key)) {
        Some(Value::String(s)) => s.clone(),
        Some(value) => value.to_string(),
        None if key == "field" => field.to_string(),
        None => "undefined".to_string(),
    }
}

/// Dotted-path lookup (`"a.b.0"`) into objects and arrays.
fn lookup<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(value, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}
