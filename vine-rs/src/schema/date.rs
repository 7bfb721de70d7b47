//! Date schema.

use super::{SchemaCore, TypeCheckFn, type_check};
use crate::helpers::parse_datetime;
use crate::rules::date::{self as rules, DateOptions, DateReference};
use chrono::NaiveDateTime;

/// Accepts date strings and outputs a [`NaiveDateTime`].
///
/// # Example
/// ```rust
/// use vine_rs::{DateReference, Vine};
///
/// let vine = Vine::new();
/// let checkout = vine
///     .date()
///     .formats(["%d/%m/%Y"])
///     .after(DateReference::Field("checkin".into()));
/// # let _ = checkout;
/// ```
#[derive(Debug, Clone)]
pub struct VineDate {
    pub(crate) core: SchemaCore,
    formats: Vec<String>,
}

impl VineDate {
    pub fn new() -> Self {
        Self {
            core: SchemaCore::typed(rules::DATE.call(DateOptions::default())),
            formats: Vec::new(),
        }
    }

    field_builder_methods!();

    fn intrinsic_check(&self) -> Option<TypeCheckFn> {
        let formats = self.formats.clone();
        Some(type_check(move |value| {
            value
                .as_str()
                .is_some_and(|s| parse_datetime(s, &formats).is_some())
        }))
    }

    /// Accept only these `chrono` formats.
    #[must_use]
    pub fn formats<I, S>(mut self, formats: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.formats = formats.into_iter().map(Into::into).collect();
        self.core.replace_type_rule(rules::DATE.call(DateOptions {
            formats: self.formats.clone(),
        }));
        self
    }

    /// Same calendar day as the reference.
    #[must_use]
    pub fn equals(self, reference: DateReference) -> Self {
        self.use_rule(rules::EQUALS.call(reference))
    }

    #[must_use]
    pub fn after(self, reference: DateReference) -> Self {
        self.use_rule(rules::AFTER.call(reference))
    }

    #[must_use]
    pub fn before(self, reference: DateReference) -> Self {
        self.use_rule(rules::BEFORE.call(reference))
    }
}

impl Default for VineDate {
    fn default() -> Self {
        Self::new()
    }
}

impl_literal_schema!(VineDate => NaiveDateTime);
