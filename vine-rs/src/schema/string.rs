//! String schema.

use super::{SchemaCore, TypeCheckFn, type_check};
use crate::rules::string::{self as rules, StringCase};
use regex::Regex;
use serde_json::Value;

/// Accepts strings.
///
/// # Example
/// ```rust
/// use vine_rs::Vine;
///
/// let vine = Vine::new();
/// let email = vine.string().trim().email().max_length(254);
/// # let _ = email;
/// ```
#[derive(Debug, Clone)]
pub struct VineString {
    pub(crate) core: SchemaCore,
}

impl VineString {
    pub fn new() -> Self {
        Self {
            core: SchemaCore::typed(rules::STRING.build()),
        }
    }

    field_builder_methods!();

    fn intrinsic_check(&self) -> Option<TypeCheckFn> {
        Some(type_check(Value::is_string))
    }

    #[must_use]
    pub fn email(self) -> Self {
        self.use_rule(rules::EMAIL.build())
    }

    #[must_use]
    pub fn regex(self, expression: Regex) -> Self {
        self.use_rule(rules::REGEX.call(expression))
    }

    /// Any UUID version.
    #[must_use]
    pub fn uuid(self) -> Self {
        self.use_rule(rules::UUID.call(None))
    }

    #[must_use]
    pub fn uuid_version(self, version: usize) -> Self {
        self.use_rule(rules::UUID.call(Some(version)))
    }

    #[must_use]
    pub fn alpha(self) -> Self {
        self.use_rule(rules::ALPHA.build())
    }

    #[must_use]
    pub fn alpha_numeric(self) -> Self {
        self.use_rule(rules::ALPHA_NUMERIC.build())
    }

    /// Minimum number of characters.
    #[must_use]
    pub fn min_length(self, min: usize) -> Self {
        self.use_rule(rules::MIN_LENGTH.call(min))
    }

    #[must_use]
    pub fn max_length(self, max: usize) -> Self {
        self.use_rule(rules::MAX_LENGTH.call(max))
    }

    #[must_use]
    pub fn fixed_length(self, size: usize) -> Self {
        self.use_rule(rules::FIXED_LENGTH.call(size))
    }

    #[must_use]
    pub fn starts_with(self, substring: impl Into<String>) -> Self {
        self.use_rule(rules::STARTS_WITH.call(substring.into()))
    }

    #[must_use]
    pub fn ends_with(self, substring: impl Into<String>) -> Self {
        self.use_rule(rules::ENDS_WITH.call(substring.into()))
    }

    /// The parent must hold an equal `<name>_confirmation` field.
    #[must_use]
    pub fn confirmed(self) -> Self {
        self.use_rule(rules::CONFIRMED.call(None))
    }

    /// Like [`confirmed`](Self::confirmed) with an explicit confirmation field.
    #[must_use]
    pub fn confirmed_by(self, field: impl Into<String>) -> Self {
        self.use_rule(rules::CONFIRMED.call(Some(field.into())))
    }

    #[must_use]
    pub fn same_as(self, field: impl Into<String>) -> Self {
        self.use_rule(rules::SAME_AS.call(field.into()))
    }

    #[must_use]
    pub fn not_same_as(self, field: impl Into<String>) -> Self {
        self.use_rule(rules::NOT_SAME_AS.call(field.into()))
    }

    #[must_use]
    pub fn in_list<I, S>(self, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.use_rule(rules::IN.call(choices.into_iter().map(Into::into).collect()))
    }

    #[must_use]
    pub fn not_in<I, S>(self, list: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.use_rule(rules::NOT_IN.call(list.into_iter().map(Into::into).collect()))
    }

    #[must_use]
    pub fn trim(self) -> Self {
        self.use_rule(rules::NORMALIZE.call(StringCase::Trim))
    }

    #[must_use]
    pub fn to_lower_case(self) -> Self {
        self.use_rule(rules::NORMALIZE.call(StringCase::Lower))
    }

    #[must_use]
    pub fn to_upper_case(self) -> Self {
        self.use_rule(rules::NORMALIZE.call(StringCase::Upper))
    }
}

impl Default for VineString {
    fn default() -> Self {
        Self::new()
    }
}

impl_literal_schema!(VineString => String);
