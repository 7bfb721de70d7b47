//! Pass-through schema.

use super::{SchemaCore, TypeCheckFn};

/// Accepts any value. Only the presence check and attached rules apply.
#[derive(Debug, Clone)]
pub struct VineAny {
    pub(crate) core: SchemaCore,
}

impl VineAny {
    pub fn new() -> Self {
        Self {
            core: SchemaCore::new(),
        }
    }

    field_builder_methods!();

    fn intrinsic_check(&self) -> Option<TypeCheckFn> {
        None
    }
}

impl Default for VineAny {
    fn default() -> Self {
        Self::new()
    }
}

impl_literal_schema!(VineAny => serde_json::Value);
