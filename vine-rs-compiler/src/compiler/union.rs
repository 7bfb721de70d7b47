//! Union and group dispatch.
//!
//! A union first runs its own rules. Conditions are then tried in declared
//! order and the first predicate that accepts the value wins. When none
//! does, the else callback runs instead. Exactly one of the two happens per field per pass.

use super::executor::{Execution, Slot};
use crate::error::RuntimeResult;
use crate::field::FieldContext;
use crate::ir::{GroupNode, UnionNode};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::trace;

impl Execution {
    /// Run the union's own rules, then dispatch. The transform applies to
    /// the matched branch's output.
    pub(super) async fn validate_union(
        &self,
        node: &UnionNode,
        slot: Slot,
    ) -> RuntimeResult<Option<Value>> {
        let Slot {
            value,
            parent,
            location,
        } = slot;
        let mut ctx = FieldContext::new(value, Arc::clone(&parent), location, &self.scope);

        self.run_rules(&node.validations, true, &mut ctx).await?;
        if !ctx.is_valid() {
            return Ok(None);
        }

        let value = ctx.value().cloned().unwrap_or(Value::Null);
        for (branch, condition) in node.conditions.iter().enumerate() {
            let predicate = self.refs.predicate(condition.conditional_fn_id)?;
            if predicate(&value, &ctx) {
                trace!(field = %ctx.field_path(), branch, "Union branch matched");
                let slot = Slot {
                    value: ctx.value().cloned(),
                    parent,
                    location: ctx.location().clone(),
                };
                return match self.validate_node(&condition.schema, slot).await? {
                    Some(output) if !output.is_null() => {
                        ctx.mutate(output.clone());
                        self.apply_transform(node.transform_fn_id, output, &ctx)
                            .map(Some)
                    }
                    output => Ok(output),
                };
            }
        }

        trace!(field = %ctx.field_path(), "No union branch matched");
        let otherwise = self.refs.otherwise(node.else_conditional_fn_id)?;
        otherwise(&value, &mut ctx);
        Ok(None)
    }

    /// Resolve one group of an object. The object's own context is used for
    /// predicates and for the else callback.
    pub(super) async fn validate_group(
        &self,
        group: &GroupNode,
        object: &Arc<Value>,
        ctx: &mut FieldContext,
        output: &mut Map<String, Value>,
    ) -> RuntimeResult<()> {
        let value: &Value = object;

        for (branch, condition) in group.conditions.iter().enumerate() {
            let predicate = self.refs.predicate(condition.conditional_fn_id)?;
            if predicate(value, &*ctx) {
                trace!(field = %ctx.field_path(), branch, "Group matched");
                return self
                    .validate_members(
                        &condition.schema.properties,
                        &condition.schema.groups,
                        object,
                        ctx,
                        output,
                    )
                    .await;
            }
        }

        trace!(field = %ctx.field_path(), "No group matched");
        let otherwise = self.refs.otherwise(group.else_conditional_fn_id)?;
        otherwise(value, &mut *ctx);
        Ok(())
    }
}
