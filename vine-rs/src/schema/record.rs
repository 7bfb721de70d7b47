//! Record schema.

use super::{Compilable, ParserOptions, Schema, SchemaCore, TypeCheckFn, sealed, type_check};
use crate::rules::record as rules;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use vine_rs_compiler::{CompilerNode, FieldContext, RecordNode, RefsStore};

/// Accepts objects with arbitrary keys whose values all match one schema.
#[derive(Debug, Clone)]
pub struct VineRecord<S> {
    pub(crate) core: SchemaCore,
    each: S,
}

impl<S: Schema> VineRecord<S> {
    pub fn new(each: S) -> Self {
        Self {
            core: SchemaCore::new(),
            each,
        }
    }

    field_builder_methods!();

    /// Minimum number of keys.
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

    /// Inspect the keys; the callback reports through the field.
    #[must_use]
    pub fn valid_keys<F>(self, validator: F) -> Self
    where
        F: Fn(&[String], &mut FieldContext) + Send + Sync + 'static,
    {
        self.use_rule(rules::VALID_KEYS.call(Arc::new(validator)))
    }
}

impl<S: Schema> sealed::Sealed for VineRecord<S> {}

impl<S: Schema> Compilable for VineRecord<S> {
    fn compile(
        &self,
        property_name: &str,
        refs: &mut RefsStore,
        options: &ParserOptions,
    ) -> CompilerNode {
        let field = self.core.compile_field(property_name, refs, options);
        CompilerNode::Record(RecordNode {
            field,
            each: Box::new(self.each.compile("*", refs, options)),
        })
    }

    fn type_check(&self) -> Option<TypeCheckFn> {
        Some(type_check(Value::is_object))
    }

    fn clone_boxed(&self) -> Box<dyn Compilable> {
        Box::new(self.clone())
    }
}

impl<S: Schema> Schema for VineRecord<S> {
    type Output = HashMap<String, S::Output>;
}
