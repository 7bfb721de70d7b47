//! Compiler node IR.
//!
//! Plain-data mirror of a schema tree. Every callback is replaced by a
//! [`RefId`] into the paired [`RefsStore`](crate::RefsStore), so the whole
//! tree can be serialized, compared, or cached on its own.
//!
//! # Example
//! ```rust
//! use vine_rs_compiler::{CompilerNode, FieldNode, LiteralNode, RootNode};
//!
//! let root = RootNode::new(CompilerNode::Literal(LiteralNode::new(
//!     FieldNode::new("username", "username"),
//! )));
//! let json = root.to_json().unwrap();
//! assert_eq!(json["schema"]["type"], "literal");
//! assert_eq!(json["schema"]["fieldName"], "username");
//! ```

use crate::refs::RefId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Reference to a rule use inside a field node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationNode {
    /// Id of the tracked validation
    pub rule_fn_id: RefId,
    /// Run even when the field is undefined
    pub implicit: bool,
    /// Must be awaited
    pub is_async: bool,
}

/// Field options shared by every node that holds a value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldNode {
    /// Name of the field in the input
    pub field_name: String,
    /// Name of the property in the output
    pub property_name: String,
    /// Stop running rules after the first failure
    pub bail: bool,
    /// Accept `null` as a value
    pub allow_null: bool,
    /// Accept a missing value
    pub is_optional: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parse_fn_id: Option<RefId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform_fn_id: Option<RefId>,
    /// Rules in declaration order
    #[serde(default)]
    pub validations: Vec<ValidationNode>,
}

impl FieldNode {
    /// Create a required, non-nullable field with bail enabled.
    pub fn new(field_name: impl Into<String>, property_name: impl Into<String>) -> Self {
        Self {
            field_name: field_name.into(),
            property_name: property_name.into(),
            bail: true,
            allow_null: false,
            is_optional: false,
            parse_fn_id: None,
            transform_fn_id: None,
            validations: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiteralNode {
    #[serde(flatten)]
    pub field: FieldNode,
}

impl LiteralNode {
    pub fn new(field: FieldNode) -> Self {
        Self { field }
    }
}

/// Object node: declared properties plus conditional groups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectNode {
    #[serde(flatten)]
    pub field: FieldNode,
    pub properties: Vec<CompilerNode>,
    #[serde(default)]
    pub groups: Vec<GroupNode>,
    /// Copy undeclared keys into the output
    #[serde(default)]
    pub allow_unknown_properties: bool,
}

/// Array node: one child validated against every element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrayNode {
    #[serde(flatten)]
    pub field: FieldNode,
    pub each: Box<CompilerNode>,
}

/// Tuple node: one child per position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TupleNode {
    #[serde(flatten)]
    pub field: FieldNode,
    pub properties: Vec<CompilerNode>,
    /// Keep elements past the declared positions
    #[serde(default)]
    pub allow_unknown_properties: bool,
}

/// Record node: one child validated against every value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordNode {
    #[serde(flatten)]
    pub field: FieldNode,
    pub each: Box<CompilerNode>,
}

/// One branch of a union.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionNode {
    pub conditional_fn_id: RefId,
    pub schema: CompilerNode,
}

/// Union node. Carries no field block of its own; optionality and
/// nullability come from the selected branch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnionNode {
    pub field_name: String,
    pub property_name: String,
    pub conditions: Vec<ConditionNode>,
    pub else_conditional_fn_id: RefId,
    /// Rules run before a branch is picked
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub validations: Vec<ValidationNode>,
    /// Applied to the output of the matched branch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform_fn_id: Option<RefId>,
}

/// Properties merged into an object when a group condition matches.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SubObjectNode {
    pub properties: Vec<CompilerNode>,
    #[serde(default)]
    pub groups: Vec<GroupNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupConditionNode {
    pub conditional_fn_id: RefId,
    pub schema: SubObjectNode,
}

/// Conditional property group of an object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupNode {
    pub conditions: Vec<GroupConditionNode>,
    pub else_conditional_fn_id: RefId,
}

/// Tagged IR node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CompilerNode {
    Literal(LiteralNode),
    Object(ObjectNode),
    Array(ArrayNode),
    Tuple(TupleNode),
    Record(RecordNode),
    Union(UnionNode),
}

impl CompilerNode {
    /// The type tag as it appears in JSON.
    pub fn node_type(&self) -> &'static str {
        match self {
            Self::Literal(_) => "literal",
            Self::Object(_) => "object",
            Self::Array(_) => "array",
            Self::Tuple(_) => "tuple",
            Self::Record(_) => "record",
            Self::Union(_) => "union",
        }
    }

    pub fn field_name(&self) -> &str {
        match self {
            Self::Union(node) => &node.field_name,
            other => other.field().map_or("", |f| f.field_name.as_str()),
        }
    }

    pub fn property_name(&self) -> &str {
        match self {
            Self::Union(node) => &node.property_name,
            other => other.field().map_or("", |f| f.property_name.as_str()),
        }
    }

    /// Field block of the node. Unions have none.
    pub fn field(&self) -> Option<&FieldNode> {
        match self {
            Self::Literal(node) => Some(&node.field),
            Self::Object(node) => Some(&node.field),
            Self::Array(node) => Some(&node.field),
            Self::Tuple(node) => Some(&node.field),
            Self::Record(node) => Some(&node.field),
            Self::Union(_) => None,
        }
    }

    /// Mutable field block of the node. Unions have none.
    pub fn field_mut(&mut self) -> Option<&mut FieldNode> {
        match self {
            Self::Literal(node) => Some(&mut node.field),
            Self::Object(node) => Some(&mut node.field),
            Self::Array(node) => Some(&mut node.field),
            Self::Tuple(node) => Some(&mut node.field),
            Self::Record(node) => Some(&mut node.field),
            Self::Union(_) => None,
        }
    }

    /// Rules of the node. Unions keep theirs next to their conditions.
    pub fn validations_mut(&mut self) -> &mut Vec<ValidationNode> {
        match self {
            Self::Literal(node) => &mut node.field.validations,
            Self::Object(node) => &mut node.field.validations,
            Self::Array(node) => &mut node.field.validations,
            Self::Tuple(node) => &mut node.field.validations,
            Self::Record(node) => &mut node.field.validations,
            Self::Union(node) => &mut node.validations,
        }
    }

    /// Transform slot of the node.
    pub fn transform_fn_id_mut(&mut self) -> &mut Option<RefId> {
        match self {
            Self::Literal(node) => &mut node.field.transform_fn_id,
            Self::Object(node) => &mut node.field.transform_fn_id,
            Self::Array(node) => &mut node.field.transform_fn_id,
            Self::Tuple(node) => &mut node.field.transform_fn_id,
            Self::Record(node) => &mut node.field.transform_fn_id,
            Self::Union(node) => &mut node.transform_fn_id,
        }
    }

    /// Every ref id referenced by this node and its descendants, in tree
    /// order.
    pub fn ref_ids(&self) -> Vec<RefId> {
        let mut ids = Vec::new();
        collect_ids(self, &mut ids);
        ids
    }
}

fn collect_field_ids(field: &FieldNode, ids: &mut Vec<RefId>) {
    ids.extend(field.parse_fn_id);
    ids.extend(field.validations.iter().map(|v| v.rule_fn_id));
    ids.extend(field.transform_fn_id);
}

fn collect_group_ids(groups: &[GroupNode], ids: &mut Vec<RefId>) {
    for group in groups {
        for condition in &group.conditions {
            ids.push(condition.conditional_fn_id);
            for property in &condition.schema.properties {
                collect_ids(property, ids);
            }
            collect_group_ids(&condition.schema.groups, ids);
        }
        ids.push(group.else_conditional_fn_id);
    }
}

fn collect_ids(node: &CompilerNode, ids: &mut Vec<RefId>) {
    if let Some(field) = node.field() {
        collect_field_ids(field, ids);
    }
    match node {
        CompilerNode::Literal(_) => {}
        CompilerNode::Object(object) => {
            for property in &object.properties {
                collect_ids(property, ids);
            }
            collect_group_ids(&object.groups, ids);
        }
        CompilerNode::Tuple(tuple) => {
            for property in &tuple.properties {
                collect_ids(property, ids);
            }
        }
        CompilerNode::Array(ArrayNode { each, .. }) | CompilerNode::Record(RecordNode { each, .. }) => {
            collect_ids(each, ids)
        }
        CompilerNode::Union(union) => {
            for condition in &union.conditions {
                ids.push(condition.conditional_fn_id);
                collect_ids(&condition.schema, ids);
            }
            ids.push(union.else_conditional_fn_id);
            ids.extend(union.validations.iter().map(|v| v.rule_fn_id));
            ids.extend(union.transform_fn_id);
        }
    }
}

/// Root of a compiled tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RootNode {
    pub schema: CompilerNode,
}

impl RootNode {
    pub fn new(schema: CompilerNode) -> Self {
        Self { schema }
    }

    /// Deep JSON copy of the tree.
    pub fn to_json(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    /// Rebuild a tree from its JSON form.
    pub fn from_json(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> RootNode {
        let mut name = FieldNode::new("name", "name");
        name.validations.push(ValidationNode {
            rule_fn_id: RefId::new(0),
            implicit: false,
            is_async: false,
        });
        let mut tags = FieldNode::new("*", "*");
        tags.is_optional = true;
        RootNode::new(CompilerNode::Object(ObjectNode {
            field: FieldNode::new("", ""),
            properties: vec![
                CompilerNode::Literal(LiteralNode::new(name)),
                CompilerNode::Array(ArrayNode {
                    field: FieldNode::new("tags", "tags"),
                    each: Box::new(CompilerNode::Literal(LiteralNode::new(tags))),
                }),
            ],
            groups: vec![],
            allow_unknown_properties: false,
        }))
    }

    #[test]
    fn test_json_shape_uses_camel_case_keys() {
        let json = sample().to_json().unwrap();
        let name = &json["schema"]["properties"][0];
        assert_eq!(name["type"], "literal");
        assert_eq!(name["isOptional"], json!(false));
        assert_eq!(name["validations"][0]["ruleFnId"], json!(0));
        assert!(name.get("parseFnId").is_none());
        assert_eq!(json["schema"]["properties"][1]["each"]["fieldName"], "*");
    }

    #[test]
    fn test_json_round_trip() {
        let root = sample();
        let back = RootNode::from_json(root.to_json().unwrap()).unwrap();
        assert_eq!(back, root);
    }

    #[test]
    fn test_union_has_no_field_block() {
        let node = CompilerNode::Union(UnionNode {
            field_name: "contact".into(),
            property_name: "contact".into(),
            conditions: vec![],
            else_conditional_fn_id: RefId::new(4),
            validations: vec![],
            transform_fn_id: None,
        });
        assert!(node.field().is_none());
        assert_eq!(node.field_name(), "contact");
        assert_eq!(node.ref_ids(), vec![RefId::new(4)]);
    }

    #[test]
    fn test_union_keeps_rules_and_transform_outside_field_block() {
        let mut node = CompilerNode::Union(UnionNode {
            field_name: "contact".into(),
            property_name: "contact".into(),
            conditions: vec![],
            else_conditional_fn_id: RefId::new(0),
            validations: vec![],
            transform_fn_id: None,
        });
        node.validations_mut().push(ValidationNode {
            rule_fn_id: RefId::new(1),
            implicit: true,
            is_async: false,
        });
        *node.transform_fn_id_mut() = Some(RefId::new(2));

        assert!(node.field().is_none());
        assert_eq!(
            node.ref_ids(),
            vec![RefId::new(0), RefId::new(1), RefId::new(2)]
        );

        let json = RootNode::new(node.clone()).to_json().unwrap();
        assert_eq!(json["schema"]["transformFnId"], json!(2));
        assert_eq!(json["schema"]["validations"][0]["implicit"], json!(true));
        assert_eq!(RootNode::from_json(json).unwrap().schema, node);
    }
}
