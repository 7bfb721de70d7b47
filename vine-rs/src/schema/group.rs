//! Conditional property groups merged into objects.
//!
//! A group holds conditionals. The first conditional whose predicate accepts
//! the object contributes its properties; when none does, the group's
//! `otherwise` callback runs. Properties of the other conditionals are never
//! validated nor copied.

use super::object::{Properties, compile_properties, upsert_property};
use super::{ParserOptions, Schema};
use crate::messages;
use serde_json::Value;
use std::fmt;
use vine_rs_compiler::{
    ConditionalFn, FieldContext, GroupConditionNode, GroupNode, RefsStore, SubObjectNode,
};

/// One branch of an [`ObjectGroup`].
#[derive(Clone)]
pub struct GroupConditional {
    predicate: ConditionalFn,
    properties: Properties,
    groups: Vec<ObjectGroup>,
}

impl GroupConditional {
    /// Branch selected when `predicate` accepts the object.
    pub fn when<F>(predicate: F) -> Self
    where
        F: Fn(&Value, &FieldContext) -> bool + Send + Sync + 'static,
    {
        Self {
            predicate: ConditionalFn::predicate(predicate),
            properties: Vec::new(),
            groups: Vec::new(),
        }
    }

    #[must_use]
    pub fn property<S: Schema>(mut self, name: impl Into<String>, schema: S) -> Self {
        upsert_property(&mut self.properties, name.into(), Box::new(schema));
        self
    }

    /// Nest another group inside this branch.
    #[must_use]
    pub fn merge(mut self, group: ObjectGroup) -> Self {
        self.groups.push(group);
        self
    }
}

impl fmt::Debug for GroupConditional {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.properties.iter().map(|(name, _)| name.as_str()).collect();
        f.debug_struct("GroupConditional")
            .field("properties", &names)
            .field("groups", &self.groups)
            .finish_non_exhaustive()
    }
}

/// Properties that depend on the shape of the object.
///
/// # Example
/// ```rust
/// use vine_rs::{GroupConditional, ObjectGroup, Vine};
///
/// let vine = Vine::new();
/// let contact = ObjectGroup::new(vec![
///     GroupConditional::when(|data, _| data["kind"] == "email")
///         .property("email", vine.string().email()),
///     GroupConditional::when(|data, _| data["kind"] == "phone")
///         .property("phone", vine.string().min_length(7)),
/// ]);
/// let schema = vine.object().property("kind", vine.string()).merge(contact);
/// # let _ = schema;
/// ```
#[derive(Clone)]
pub struct ObjectGroup {
    conditionals: Vec<GroupConditional>,
    otherwise: ConditionalFn,
}

impl ObjectGroup {
    /// Group over `conditionals`. When none matches, `unionGroup` is
    /// reported on the object.
    pub fn new(conditionals: Vec<GroupConditional>) -> Self {
        Self {
            conditionals,
            otherwise: ConditionalFn::otherwise(|_, field| {
                field.report(messages::UNION_GROUP, "unionGroup", None)
            }),
        }
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

    pub(crate) fn compile(&self, refs: &mut RefsStore, options: &ParserOptions) -> GroupNode {
        let conditions = self
            .conditionals
            .iter()
            .map(|conditional| GroupConditionNode {
                conditional_fn_id: refs.track_conditional(conditional.predicate.clone()),
                schema: SubObjectNode {
                    properties: compile_properties(&conditional.properties, refs, options),
                    groups: conditional
                        .groups
                        .iter()
                        .map(|group| group.compile(refs, options))
                        .collect(),
                },
            })
            .collect();

        GroupNode {
            conditions,
            else_conditional_fn_id: refs.track_conditional(self.otherwise.clone()),
        }
    }
}

impl fmt::Debug for ObjectGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectGroup")
            .field("conditionals", &self.conditionals)
            .finish_non_exhaustive()
    }
}
