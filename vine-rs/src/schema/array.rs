//! Array schema.

use super::{Compilable, ParserOptions, Schema, SchemaCore, TypeCheckFn, sealed, type_check};
use crate::rules::array as rules;
use serde_json::Value;
use vine_rs_compiler::{ArrayNode, CompilerNode, RefsStore};

/// Accepts arrays whose items all match one schema.
///
/// Array rules run on the array before its items are validated, so length
/// and distinct failures are reported on the array itself.
#[derive(Debug, Clone)]
pub struct VineArray<S> {
    pub(crate) core: SchemaCore,
    each: S,
}

impl<S: Schema> VineArray<S> {
    pub fn new(each: S) -> Self {
        Self {
            core: SchemaCore::new(),
            each,
        }
    }

    field_builder_methods!();

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
    pub fn not_empty(self) -> Self {
        self.use_rule(rules::NOT_EMPTY.build())
    }

    /// No two items may be equal.
    #[must_use]
    pub fn distinct(self) -> Self {
        self.use_rule(rules::DISTINCT.call(None))
    }

    /// No two items may share the values of `fields`.
    #[must_use]
    pub fn distinct_by<I, N>(self, fields: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        self.use_rule(rules::DISTINCT.call(Some(fields.into_iter().map(Into::into).collect())))
    }

    /// Drop `null` and empty-string items before they are validated.
    #[must_use]
    pub fn compact(self) -> Self {
        self.use_rule(rules::COMPACT.build())
    }
}

impl<S: Schema> sealed::Sealed for VineArray<S> {}

impl<S: Schema> Compilable for VineArray<S> {
    fn compile(
        &self,
        property_name: &str,
        refs: &mut RefsStore,
        options: &ParserOptions,
    ) -> CompilerNode {
        let field = self.core.compile_field(property_name, refs, options);
        CompilerNode::Array(ArrayNode {
            field,
            each: Box::new(self.each.compile("*", refs, options)),
        })
    }

    fn type_check(&self) -> Option<TypeCheckFn> {
        Some(type_check(Value::is_array))
    }

    fn clone_boxed(&self) -> Box<dyn Compilable> {
        Box::new(self.clone())
    }
}

impl<S: Schema> Schema for VineArray<S> {
    type Output = Vec<S::Output>;
}
