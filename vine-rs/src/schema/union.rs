//! Union schema.

use super::{Compilable, ParserOptions, Schema, TypeCheckFn, output_name, sealed, type_check};
use crate::messages;
use serde_json::Value;
use std::fmt;
use vine_rs_compiler::{
    CompilerNode, ConditionNode, ConditionalFn, FieldContext, RefsStore, UnionNode,
};

/// One branch of a [`VineUnion`].
#[derive(Clone)]
pub struct UnionConditional {
    predicate: ConditionalFn,
    check: Option<TypeCheckFn>,
    schema: Box<dyn Compilable>,
}

impl UnionConditional {
    /// Validate with `schema` when `predicate` accepts the value.
    pub fn when<F, S>(predicate: F, schema: S) -> Self
    where
        F: Fn(&Value, &FieldContext) -> bool + Send + Sync + 'static,
        S: Schema,
    {
        Self {
            predicate: ConditionalFn::predicate(predicate),
            check: None,
            schema: Box::new(schema),
        }
    }

    /// Branch selected by the schema's own type check. Schemas without one
    /// accept every value.
    pub fn of_type(schema: Box<dyn Compilable>) -> Self {
        let check = schema.type_check();
        let predicate = match check.clone() {
            Some(check) => ConditionalFn::predicate(move |value, _| check(value)),
            None => ConditionalFn::predicate(|_, _| true),
        };
        Self {
            predicate,
            check,
            schema,
        }
    }
}

impl fmt::Debug for UnionConditional {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnionConditional")
            .field("type_checked", &self.check.is_some())
            .finish_non_exhaustive()
    }
}

/// Picks one schema per value.
///
/// Conditionals are tried in order and the first match validates the value.
/// Without a match, the `otherwise` callback runs and the value is left out
/// of the output.
///
/// # Example
/// ```rust
/// use vine_rs::{UnionConditional, Vine};
///
/// let vine = Vine::new();
/// let contact = vine.union(vec![
///     UnionConditional::when(
///         |value, _| value["type"] == "email",
///         vine.object().property("address", vine.string().email()),
///     ),
///     UnionConditional::when(
///         |value, _| value["type"] == "phone",
///         vine.object().property("number", vine.string()),
///     ),
/// ]);
/// # let _ = contact;
/// ```
#[derive(Clone)]
pub struct VineUnion {
    conditionals: Vec<UnionConditional>,
    otherwise: ConditionalFn,
}

impl VineUnion {
    /// Union over `conditionals`. Without a match, `union` is reported.
    pub fn new(conditionals: Vec<UnionConditional>) -> Self {
        Self {
            conditionals,
            otherwise: ConditionalFn::otherwise(|_, field| {
                field.report(messages::UNION, "union", None)
            }),
        }
    }

    /// Union selecting the first schema whose type check accepts the value.
    pub fn of_types(schemas: Vec<Box<dyn Compilable>>) -> Self {
        Self::new(schemas.into_iter().map(UnionConditional::of_type).collect())
    }

    /// Replace the fallback run when no conditional matches.
    #[must_use]
    pub fn otherwise<F>(mut self, otherwise: F) -> Self
    where
        F: Fn(&Value, &mut FieldContext) + Send + Sync + 'static,
    {
        self.otherwise = ConditionalFn::otherwise(otherwise);
        self
    }

    pub fn len(&self) -> usize {
        self.conditionals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conditionals.is_empty()
    }
}

impl fmt::Debug for VineUnion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VineUnion")
            .field("conditionals", &self.conditionals)
            .finish_non_exhaustive()
    }
}

impl sealed::Sealed for VineUnion {}

impl Compilable for VineUnion {
    fn compile(
        &self,
        property_name: &str,
        refs: &mut RefsStore,
        options: &ParserOptions,
    ) -> CompilerNode {
        let conditions = self
            .conditionals
            .iter()
            .map(|conditional| ConditionNode {
                conditional_fn_id: refs.track_conditional(conditional.predicate.clone()),
                schema: conditional.schema.compile(property_name, refs, options),
            })
            .collect();

        CompilerNode::Union(UnionNode {
            field_name: property_name.to_string(),
            property_name: output_name(property_name, options),
            conditions,
            else_conditional_fn_id: refs.track_conditional(self.otherwise.clone()),
            validations: Vec::new(),
            transform_fn_id: None,
        })
    }

    /// A value has the union's type when any branch's schema accepts it.
    fn type_check(&self) -> Option<TypeCheckFn> {
        let checks = self
            .conditionals
            .iter()
            .map(|conditional| conditional.schema.type_check())
            .collect::<Option<Vec<_>>>()?;
        Some(type_check(move |value| checks.iter().any(|check| check(value))))
    }

    fn clone_boxed(&self) -> Box<dyn Compilable> {
        Box::new(self.clone())
    }
}

impl Schema for VineUnion {
    type Output = Value;
}
