//! Boolean schema.

use super::{SchemaCore, TypeCheckFn, type_check};
use crate::helpers::as_boolean;
use crate::rules::boolean::{BOOLEAN, BooleanOptions};

/// Accepts booleans. Unless strict, `1`, `"1"`, `"true"`, `"on"` and their
/// false counterparts are accepted and normalized.
#[derive(Debug, Clone)]
pub struct VineBoolean {
    pub(crate) core: SchemaCore,
    strict: bool,
}

impl VineBoolean {
    pub fn new() -> Self {
        Self {
            core: SchemaCore::typed(BOOLEAN.call(BooleanOptions::default())),
            strict: false,
        }
    }

    field_builder_methods!();

    fn intrinsic_check(&self) -> Option<TypeCheckFn> {
        if self.strict {
            Some(type_check(serde_json::Value::is_boolean))
        } else {
            Some(type_check(|value| as_boolean(value).is_some()))
        }
    }

    /// Only accept JSON booleans.
    #[must_use]
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self.core
            .replace_type_rule(BOOLEAN.call(BooleanOptions { strict: true }));
        self
    }
}

impl Default for VineBoolean {
    fn default() -> Self {
        Self::new()
    }
}

impl_literal_schema!(VineBoolean => bool);
