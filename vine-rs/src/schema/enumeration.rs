//! Enum schema.

use super::{SchemaCore, TypeCheckFn, type_check};
use crate::rules::literal::{ENUM, EnumChoices};
use serde_json::Value;
use std::sync::Arc;
use vine_rs_compiler::FieldContext;

/// Accepts one of a list of values.
///
/// Choices are fixed at build time, or computed per field from the field's
/// context (its parent, the metadata bag, ...).
#[derive(Debug, Clone)]
pub struct VineEnum {
    pub(crate) core: SchemaCore,
    choices: EnumChoices,
}

impl VineEnum {
    pub fn new<I, V>(choices: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let choices = EnumChoices::Static(choices.into_iter().map(Into::into).collect());
        Self {
            core: SchemaCore::typed(ENUM.call(choices.clone())),
            choices,
        }
    }

    /// Compute the choices when the field is validated.
    pub fn dynamic<F>(choices: F) -> Self
    where
        F: Fn(&FieldContext) -> Vec<Value> + Send + Sync + 'static,
    {
        let choices = EnumChoices::Dynamic(Arc::new(choices));
        Self {
            core: SchemaCore::typed(ENUM.call(choices.clone())),
            choices,
        }
    }

    field_builder_methods!();

    /// Only static choices can be tested without a field.
    fn intrinsic_check(&self) -> Option<TypeCheckFn> {
        match &self.choices {
            EnumChoices::Static(choices) => {
                let choices = choices.clone();
                Some(type_check(move |value| choices.contains(value)))
            }
            EnumChoices::Dynamic(_) => None,
        }
    }

    pub fn choices(&self) -> &EnumChoices {
        &self.choices
    }
}

impl_literal_schema!(VineEnum => Value);
