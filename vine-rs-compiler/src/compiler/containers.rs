//! Object, array, tuple and record walking.

use super::executor::{ARRAY_CHECK, Execution, OBJECT_CHECK, Slot};
use crate::error::RuntimeResult;
use crate::field::FieldContext;
use crate::ir::{ArrayNode, CompilerNode, GroupNode, ObjectNode, RecordNode, TupleNode};
use futures::FutureExt;
use futures::future::BoxFuture;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::sync::Arc;

impl Execution {
    pub(super) async fn validate_object(
        &self,
        node: &ObjectNode,
        slot: Slot,
    ) -> RuntimeResult<Option<Value>> {
        let mut run = self.run_field(&node.field, slot, Some(&OBJECT_CHECK)).await?;
        if !run.should_descend(&node.field) {
            let value = run.ctx.value().cloned();
            return self.finish(&node.field, &run.ctx, value);
        }

        let object = Arc::new(run.ctx.value().cloned().unwrap_or(Value::Null));
        let mut output = Map::new();

        if node.allow_unknown_properties {
            let mut declared = HashSet::new();
            declared_names(&node.properties, &node.groups, &mut declared);
            if let Value::Object(map) = object.as_ref() {
                for (key, value) in map {
                    if !declared.contains(key.as_str()) {
                        output.insert(key.clone(), value.clone());
                    }
                }
            }
        }

        self.validate_members(
            &node.properties,
            &node.groups,
            &object,
            &mut run.ctx,
            &mut output,
        )
        .await?;

        self.finish(&node.field, &run.ctx, Some(Value::Object(output)))
    }

    /// Validate declared properties, then resolve groups, writing into
    /// `output`.
    pub(super) fn validate_members<'a>(
        &'a self,
        properties: &'a [CompilerNode],
        groups: &'a [GroupNode],
        object: &'a Arc<Value>,
        ctx: &'a mut FieldContext,
        output: &'a mut Map<String, Value>,
    ) -> BoxFuture<'a, RuntimeResult<()>> {
        async move {
            for property in properties {
                let name = property.field_name();
                let slot = Slot {
                    value: object.get(name).cloned(),
                    parent: Arc::clone(object),
                    location: ctx.location().child(name, name, false),
                };
                if let Some(value) = self.validate_node(property, slot).await? {
                    output.insert(property.property_name().to_string(), value);
                }
            }

            for group in groups {
                self.validate_group(group, object, ctx, output).await?;
            }
            Ok(())
        }
        .boxed()
    }

    pub(super) async fn validate_array(
        &self,
        node: &ArrayNode,
        slot: Slot,
    ) -> RuntimeResult<Option<Value>> {
        let run = self.run_field(&node.field, slot, Some(&ARRAY_CHECK)).await?;
        if !run.should_descend(&node.field) {
            let value = run.ctx.value().cloned();
            return self.finish(&node.field, &run.ctx, value);
        }

        let array = Arc::new(run.ctx.value().cloned().unwrap_or(Value::Null));
        let items = array.as_array().map(Vec::as_slice).unwrap_or_default();
        let mut output = Vec::with_capacity(items.len());

        for (index, item) in items.iter().enumerate() {
            let name = index.to_string();
            let slot = Slot {
                value: Some(item.clone()),
                parent: Arc::clone(&array),
                location: run.ctx.location().child(&name, "*", true),
            };
            let value = self.validate_node(&node.each, slot).await?;
            output.push(value.unwrap_or(Value::Null));
        }

        self.finish(&node.field, &run.ctx, Some(Value::Array(output)))
    }

    pub(super) async fn validate_tuple(
        &self,
        node: &TupleNode,
        slot: Slot,
    ) -> RuntimeResult<Option<Value>> {
        let run = self.run_field(&node.field, slot, Some(&ARRAY_CHECK)).await?;
        if !run.should_descend(&node.field) {
            let value = run.ctx.value().cloned();
            return self.finish(&node.field, &run.ctx, value);
        }

        let array = Arc::new(run.ctx.value().cloned().unwrap_or(Value::Null));
        let items = array.as_array().map(Vec::as_slice).unwrap_or_default();
        let mut output = Vec::with_capacity(node.properties.len());

        for (index, property) in node.properties.iter().enumerate() {
            let name = index.to_string();
            let slot = Slot {
                value: items.get(index).cloned(),
                parent: Arc::clone(&array),
                location: run.ctx.location().child(&name, &name, true),
            };
            let value = self.validate_node(property, slot).await?;
            output.push(value.unwrap_or(Value::Null));
        }

        if node.allow_unknown_properties && items.len() > node.properties.len() {
            output.extend_from_slice(&items[node.properties.len()..]);
        }

        self.finish(&node.field, &run.ctx, Some(Value::Array(output)))
    }

    pub(super) async fn validate_record(
        &self,
        node: &RecordNode,
        slot: Slot,
    ) -> RuntimeResult<Option<Value>> {
        let run = self.run_field(&node.field, slot, Some(&OBJECT_CHECK)).await?;
        if !run.should_descend(&node.field) {
            let value = run.ctx.value().cloned();
            return self.finish(&node.field, &run.ctx, value);
        }

        let record = Arc::new(run.ctx.value().cloned().unwrap_or(Value::Null));
        let mut output = Map::new();

        if let Some(entries) = record.as_object() {
            for (key, value) in entries {
                let slot = Slot {
                    value: Some(value.clone()),
                    parent: Arc::clone(&record),
                    location: run.ctx.location().child(key, "*", false),
                };
                if let Some(value) = self.validate_node(&node.each, slot).await? {
                    output.insert(key.clone(), value);
                }
            }
        }

        self.finish(&node.field, &run.ctx, Some(Value::Object(output)))
    }
}

/// Field names an object declares, including every group branch.
fn declared_names<'a>(
    properties: &'a [CompilerNode],
    groups: &'a [GroupNode],
    names: &mut HashSet<&'a str>,
) {
    names.extend(properties.iter().map(CompilerNode::field_name));
    for group in groups {
        for condition in &group.conditions {
            declared_names(&condition.schema.properties, &condition.schema.groups, names);
        }
    }
}
