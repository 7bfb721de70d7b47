use super::{CompilerOptions, ExecutionInput};
use crate::error::{RuntimeError, RuntimeResult};
use crate::field::{FieldContext, FieldLocation, FieldScope};
use crate::ir::{CompilerNode, FieldNode, RootNode, ValidationNode};
use crate::messages;
use crate::refs::{ParseContext, RefId, RefsStore, RuleFn};
use futures::FutureExt;
use futures::future::BoxFuture;
use serde_json::Value;
use std::sync::Arc;
use tracing::{trace, warn};

/// A value waiting to be validated by a node.
pub(super) struct Slot {
    pub value: Option<Value>,
    pub parent: Arc<Value>,
    pub location: FieldLocation,
}

/// Intrinsic type check of a container node.
pub(super) struct TypeCheck {
    pub rule: &'static str,
    pub message: &'static str,
    pub check: fn(&Value) -> bool,
}

pub(super) const OBJECT_CHECK: TypeCheck = TypeCheck {
    rule: "object",
    message: messages::OBJECT,
    check: Value::is_object,
};

pub(super) const ARRAY_CHECK: TypeCheck = TypeCheck {
    rule: "array",
    message: messages::ARRAY,
    check: Value::is_array,
};

/// Outcome of the per-field steps shared by every node kind.
pub(super) struct FieldRun {
    pub ctx: FieldContext,
    /// False when the intrinsic type check failed
    pub type_ok: bool,
}

impl FieldRun {
    /// Whether a container should walk its children.
    pub fn should_descend(&self, field: &FieldNode) -> bool {
        self.type_ok && self.ctx.is_defined() && (self.ctx.is_valid() || !field.bail)
    }
}

/// State of one validation pass.
pub(super) struct Execution {
    pub refs: Arc<RefsStore>,
    pub scope: FieldScope,
    options: CompilerOptions,
    sync_only: bool,
}

impl Execution {
    pub fn new(input: ExecutionInput, options: CompilerOptions) -> Self {
        let ExecutionInput {
            data,
            meta,
            refs,
            messages_provider,
            error_reporter,
            sync_only,
        } = input;

        Self {
            refs,
            scope: FieldScope {
                data: Arc::new(data),
                meta: Arc::new(meta),
                messages: messages_provider,
                reporter: error_reporter,
            },
            options,
            sync_only,
        }
    }

    pub async fn run(&self, root: &RootNode) -> RuntimeResult<Value> {
        let slot = Slot {
            value: Some(self.scope.data.as_ref().clone()),
            parent: Arc::clone(&self.scope.data),
            location: FieldLocation::root(),
        };

        match self.validate_node(&root.schema, slot).await {
            Ok(output) => Ok(output.unwrap_or(Value::Null)),
            Err(error) => {
                warn!(error = %error, "Validation pass aborted");
                Err(error)
            }
        }
    }

    /// Validate one node and return its output, `None` meaning "leave the
    /// property out".
    pub fn validate_node<'a>(
        &'a self,
        node: &'a CompilerNode,
        slot: Slot,
    ) -> BoxFuture<'a, RuntimeResult<Option<Value>>> {
        async move {
            match node {
                CompilerNode::Literal(literal) => {
                    let run = self.run_field(&literal.field, slot, None).await?;
                    self.finish(&literal.field, &run.ctx, run.ctx.value().cloned())
                }
                CompilerNode::Object(object) => self.validate_object(object, slot).await,
                CompilerNode::Array(array) => self.validate_array(array, slot).await,
                CompilerNode::Tuple(tuple) => self.validate_tuple(tuple, slot).await,
                CompilerNode::Record(record) => self.validate_record(record, slot).await,
                CompilerNode::Union(union) => self.validate_union(union, slot).await,
            }
        }
        .boxed()
    }

    /// Normalize, parse, check presence, check type and run the rules of a
    /// field.
    pub async fn run_field(
        &self,
        field: &FieldNode,
        slot: Slot,
        type_check: Option<&TypeCheck>,
    ) -> RuntimeResult<FieldRun> {
        let Slot {
            mut value,
            parent,
            location,
        } = slot;

        if self.options.convert_empty_strings_to_null
            && matches!(&value, Some(Value::String(s)) if s.is_empty())
        {
            value = Some(Value::Null);
        }

        if let Some(id) = field.parse_fn_id {
            let parser = self.refs.parser(id)?;
            let ctx = ParseContext {
                data: &self.scope.data,
                parent: &parent,
                meta: &self.scope.meta,
            };
            value = parser(value, &ctx);
        }

        let mut ctx = FieldContext::new(value, parent, location, &self.scope);

        if !field.is_optional {
            let missing = if field.allow_null {
                ctx.value().is_none()
            } else {
                !ctx.is_defined()
            };
            if missing {
                ctx.report(messages::REQUIRED, "required", None);
            }
        }

        let mut type_ok = true;
        if let Some(check) = type_check {
            let mismatched = ctx
                .value()
                .is_some_and(|v| !v.is_null() && !(check.check)(v));
            if mismatched {
                ctx.report(check.message, check.rule, None);
                type_ok = false;
            }
        }

        if type_ok {
            self.run_rules(&field.validations, field.bail, &mut ctx).await?;
        }

        Ok(FieldRun { ctx, type_ok })
    }

    /// Run rules in declared order.
    pub async fn run_rules(
        &self,
        validations: &[ValidationNode],
        bail: bool,
        ctx: &mut FieldContext,
    ) -> RuntimeResult<()> {
        for node in validations {
            if bail && !ctx.is_valid() {
                break;
            }
            if !node.implicit && !ctx.is_defined() {
                continue;
            }

            let validation = self.refs.validation(node.rule_fn_id)?;
            let rule = &validation.rule;
            trace!(
                field = %ctx.field_path(),
                rule = %rule.name,
                is_async = node.is_async,
                "Running rule"
            );

            match &rule.validator {
                RuleFn::Sync(validator) => validator(&*validation.options, &mut *ctx)?,
                RuleFn::Async(_) if self.sync_only => {
                    return Err(RuntimeError::AsyncRuleInSyncMode {
                        rule: rule.name.clone(),
                    });
                }
                RuleFn::Async(validator) => validator(&*validation.options, &mut *ctx).await?,
            }
        }
        Ok(())
    }

    /// Build the output of a field from its final value.
    pub fn finish(
        &self,
        field: &FieldNode,
        ctx: &FieldContext,
        value: Option<Value>,
    ) -> RuntimeResult<Option<Value>> {
        if !ctx.is_valid() {
            return Ok(None);
        }
        match value {
            None => Ok(None),
            Some(Value::Null) => Ok(field.allow_null.then_some(Value::Null)),
            Some(value) => self.apply_transform(field.transform_fn_id, value, ctx).map(Some),
        }
    }

    /// Run the transformer `id`, if any, over a valid value.
    pub fn apply_transform(
        &self,
        id: Option<RefId>,
        value: Value,
        ctx: &FieldContext,
    ) -> RuntimeResult<Value> {
        match id {
            Some(id) => {
                let transform = self.refs.transformer(id)?;
                Ok(transform(value, ctx))
            }
            None => Ok(value),
        }
    }
}
