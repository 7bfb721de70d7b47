//! Number schema.

use super::{SchemaCore, TypeCheckFn, type_check};
use crate::helpers::as_number;
use crate::rules::number::{self as rules, DecimalOptions, NumberOptions, RangeOptions};

/// Accepts numbers and numeric strings. The output is always a JSON number.
#[derive(Debug, Clone)]
pub struct VineNumber {
    pub(crate) core: SchemaCore,
    strict: bool,
}

impl VineNumber {
    pub fn new() -> Self {
        Self {
            core: SchemaCore::typed(rules::NUMBER.call(NumberOptions::default())),
            strict: false,
        }
    }

    field_builder_methods!();

    fn intrinsic_check(&self) -> Option<TypeCheckFn> {
        if self.strict {
            Some(type_check(serde_json::Value::is_number))
        } else {
            Some(type_check(|value| as_number(value).is_some()))
        }
    }

    /// Reject numeric strings.
    #[must_use]
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self.core
            .replace_type_rule(rules::NUMBER.call(NumberOptions { strict: true }));
        self
    }

    #[must_use]
    pub fn min(self, min: f64) -> Self {
        self.use_rule(rules::MIN.call(min))
    }

    #[must_use]
    pub fn max(self, max: f64) -> Self {
        self.use_rule(rules::MAX.call(max))
    }

    /// Inclusive range.
    #[must_use]
    pub fn range(self, min: f64, max: f64) -> Self {
        self.use_rule(rules::RANGE.call(RangeOptions { min, max }))
    }

    #[must_use]
    pub fn positive(self) -> Self {
        self.use_rule(rules::POSITIVE.build())
    }

    #[must_use]
    pub fn negative(self) -> Self {
        self.use_rule(rules::NEGATIVE.build())
    }

    /// Between `min_digits` and `max_digits` fraction digits.
    #[must_use]
    pub fn decimal(self, min_digits: usize, max_digits: usize) -> Self {
        self.use_rule(rules::DECIMAL.call(DecimalOptions {
            min_digits,
            max_digits,
        }))
    }

    #[must_use]
    pub fn without_decimals(self) -> Self {
        self.use_rule(rules::WITHOUT_DECIMALS.build())
    }

    #[must_use]
    pub fn in_list(self, choices: impl IntoIterator<Item = f64>) -> Self {
        self.use_rule(rules::IN.call(choices.into_iter().collect()))
    }
}

impl Default for VineNumber {
    fn default() -> Self {
        Self::new()
    }
}

impl_literal_schema!(VineNumber => f64);
