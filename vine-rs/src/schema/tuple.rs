//! Tuple schema.

use super::{Compilable, ParserOptions, Schema, SchemaCore, TypeCheckFn, sealed, type_check};
use serde_json::Value;
use vine_rs_compiler::{CompilerNode, RefsStore, TupleNode};

/// Accepts arrays with one schema per position.
///
/// Extra items are dropped unless
/// [`allow_unknown_properties`](Self::allow_unknown_properties) is set.
#[derive(Debug, Clone)]
pub struct VineTuple {
    pub(crate) core: SchemaCore,
    items: Vec<Box<dyn Compilable>>,
    allow_unknown_properties: bool,
}

impl VineTuple {
    pub fn new(items: Vec<Box<dyn Compilable>>) -> Self {
        Self {
            core: SchemaCore::new(),
            items,
            allow_unknown_properties: false,
        }
    }

    field_builder_methods!();

    /// Append a position.
    #[must_use]
    pub fn item<S: Schema>(mut self, schema: S) -> Self {
        self.items.push(Box::new(schema));
        self
    }

    /// Keep items past the declared positions.
    #[must_use]
    pub fn allow_unknown_properties(mut self) -> Self {
        self.allow_unknown_properties = true;
        self
    }
}

impl sealed::Sealed for VineTuple {}

impl Compilable for VineTuple {
    fn compile(
        &self,
        property_name: &str,
        refs: &mut RefsStore,
        options: &ParserOptions,
    ) -> CompilerNode {
        let field = self.core.compile_field(property_name, refs, options);
        let properties = self
            .items
            .iter()
            .enumerate()
            .map(|(index, item)| item.compile(&index.to_string(), refs, options))
            .collect();

        CompilerNode::Tuple(TupleNode {
            field,
            properties,
            allow_unknown_properties: self.allow_unknown_properties,
        })
    }

    fn type_check(&self) -> Option<TypeCheckFn> {
        Some(type_check(Value::is_array))
    }

    fn clone_boxed(&self) -> Box<dyn Compilable> {
        Box::new(self.clone())
    }
}

impl Schema for VineTuple {
    type Output = Vec<Value>;
}
