//! Literal schema.

use super::{SchemaCore, TypeCheckFn, type_check};
use crate::rules::literal::LITERAL;
use serde_json::Value;

/// Accepts exactly one value. Numeric and boolean literals also accept their
/// string spellings, normalized to the literal.
#[derive(Debug, Clone)]
pub struct VineLiteral {
    pub(crate) core: SchemaCore,
    expected: Value,
}

impl VineLiteral {
    pub fn new(expected: impl Into<Value>) -> Self {
        let expected = expected.into();
        Self {
            core: SchemaCore::typed(LITERAL.call(expected.clone())),
            expected,
        }
    }

    field_builder_methods!();

    fn intrinsic_check(&self) -> Option<TypeCheckFn> {
        let expected = self.expected.clone();
        Some(type_check(move |value| *value == expected))
    }

    pub fn expected(&self) -> &Value {
        &self.expected
    }
}

impl_literal_schema!(VineLiteral => Value);
