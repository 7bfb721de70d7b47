//! Accepted schema.

use super::{SchemaCore, TypeCheckFn};
use crate::rules::literal::ACCEPTED;

/// Consent checkbox: `"on"`, `"1"`, `"yes"`, `"true"`, `true` or `1`. The
/// output is always `true`.
#[derive(Debug, Clone)]
pub struct VineAccepted {
    pub(crate) core: SchemaCore,
}

impl VineAccepted {
    pub fn new() -> Self {
        Self {
            core: SchemaCore::typed(ACCEPTED.build()),
        }
    }

    field_builder_methods!();

    fn intrinsic_check(&self) -> Option<TypeCheckFn> {
        None
    }
}

impl Default for VineAccepted {
    fn default() -> Self {
        Self::new()
    }
}

impl_literal_schema!(VineAccepted => bool);
