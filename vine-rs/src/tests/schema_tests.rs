//! Tests for schema compilation
//!
//! These check the compiled tree and the refs table directly: declaration
//! order of refs, the flags set by modifiers, and camelCase output names.

use super::support::output;
use crate::schema::{Compilable, ParserOptions};
use crate::{SchemaExt, UnionConditional, Vine};
use proptest::prelude::*;
use serde_json::{Value, json};
use vine_rs_compiler::{CompilerNode, RefId, RefsStore, RootNode};

fn compile<S: Compilable>(schema: &S) -> (CompilerNode, RefsStore) {
    let mut refs = RefsStore::new();
    let node = schema.compile("", &mut refs, &ParserOptions::default());
    (node, refs)
}

fn ids(node: &CompilerNode) -> Vec<u32> {
    node.field()
        .map(|field| field.validations.iter().map(|v| v.rule_fn_id.get()).collect())
        .unwrap_or_default()
}

// =============================================================================
// Ref Tracking
// =============================================================================

#[test]
fn test_refs_follow_declaration_order() {
    let vine = Vine::new();
    let schema = vine
        .object()
        .property("name", vine.string().min_length(1))
        .property("age", vine.number());
    let (node, refs) = compile(&schema);

    let CompilerNode::Object(object) = node else {
        panic!("expected an object node");
    };
    assert!(object.field.validations.is_empty());
    assert_eq!(ids(&object.properties[0]), vec![0, 1]);
    assert_eq!(ids(&object.properties[1]), vec![2]);
    assert_eq!(refs.len(), 3);
    assert_eq!(refs.count_of("validation"), 3);
}

#[test]
fn test_parser_is_tracked_before_rules() {
    let vine = Vine::new();
    let schema = vine.string().parse(|value, _| value).min_length(2);
    let (node, refs) = compile(&schema);

    let field = node.field().unwrap();
    assert_eq!(field.parse_fn_id, Some(RefId::new(0)));
    assert_eq!(ids(&node), vec![1, 2]);
    assert_eq!(refs.get(RefId::new(0)).unwrap().kind(), "parser");
}

#[test]
fn test_union_tracks_each_predicate_then_its_schema() {
    let vine = Vine::new();
    let schema = vine.union(vec![
        UnionConditional::when(|value, _| value.is_string(), vine.string()),
        UnionConditional::when(|value, _| value.is_number(), vine.number()),
    ]);
    let (node, refs) = compile(&schema);

    let CompilerNode::Union(union) = node else {
        panic!("expected a union node");
    };
    let kinds: Vec<&str> = refs.iter().map(|(_, entry)| entry.kind()).collect();
    assert_eq!(
        kinds,
        vec!["predicate", "validation", "predicate", "validation", "otherwise"]
    );
    assert_eq!(union.conditions[0].conditional_fn_id, RefId::new(0));
    assert_eq!(union.conditions[1].conditional_fn_id, RefId::new(2));
    assert_eq!(union.else_conditional_fn_id, RefId::new(4));
}

#[test]
fn test_shared_rule_is_tracked_per_use() {
    let vine = Vine::new();
    let name = vine.string().min_length(2);
    let schema = vine
        .object()
        .property("first", name.clone())
        .property("last", name);
    let (node, refs) = compile(&schema);

    assert_eq!(refs.len(), 4);
    let mut seen: Vec<RefId> = node.ref_ids();
    seen.sort();
    seen.dedup();
    assert_eq!(seen.len(), refs.len());
}

#[test]
fn test_compilation_is_deterministic() {
    let vine = Vine::new();
    let schema = vine
        .object()
        .property("tags", vine.array(vine.string().trim()).distinct())
        .property("meta", vine.record(vine.any()).optional())
        .property("point", vine.tuple(vec![vine.number().boxed(), vine.number().boxed()]));

    let first = vine.compile(&schema).to_json().unwrap();
    let second = vine.compile(&schema).to_json().unwrap();
    assert_eq!(first, second);

    let root = RootNode::from_json(first.clone()).unwrap();
    assert_eq!(root.to_json().unwrap(), first);
}

// =============================================================================
// Modifiers
// =============================================================================

#[test]
fn test_modifiers_set_field_flags() {
    let vine = Vine::new();

    let (node, _) = compile(&vine.string());
    let field = node.field().unwrap();
    assert!(field.bail);
    assert!(!field.is_optional && !field.allow_null);
    assert!(field.transform_fn_id.is_none());

    let (node, _) = compile(&vine.string().optional());
    assert!(node.field().unwrap().is_optional);

    let (node, _) = compile(&vine.string().nullable());
    assert!(node.field().unwrap().allow_null);

    let (node, refs) = compile(&vine.string().transform(|value, _| value));
    let id = node.field().unwrap().transform_fn_id.unwrap();
    assert_eq!(refs.get(id).unwrap().kind(), "transformer");

    let (node, _) = compile(&vine.string().bail(false));
    assert!(!node.field().unwrap().bail);
}

#[test]
fn test_modifiers_leave_unions_unchanged() {
    let vine = Vine::new();
    let union = vine.union(vec![UnionConditional::when(|_, _| true, vine.string())]);

    let (plain, _) = compile(&union);
    let (optional, _) = compile(&union.clone().optional().nullable());
    assert_eq!(plain, optional);
}

#[test]
fn test_unions_carry_transform_and_requirements() {
    let vine = Vine::new();
    let union = vine.union(vec![UnionConditional::when(
        |value, _| value.is_string(),
        vine.string(),
    )]);

    let transformed = union.clone().transform(|_, _| json!("TRANSFORMED"));
    let (node, refs) = compile(&transformed);
    assert_eq!(refs.count_of("transformer"), 1);
    let CompilerNode::Union(union_node) = &node else {
        panic!("expected a union node, got {}", node.node_type());
    };
    assert!(union_node.transform_fn_id.is_some());
    assert_eq!(output(&transformed, json!("hello")), json!("TRANSFORMED"));

    let (node, refs) = compile(&union.optional().required_if_exists(["a"]));
    assert_eq!(refs.count_of("validation"), 1);
    let CompilerNode::Union(union_node) = &node else {
        panic!("expected a union node, got {}", node.node_type());
    };
    assert_eq!(union_node.validations.len(), 1);
    assert!(union_node.validations[0].implicit);
}

#[test]
fn test_conditional_requirements_are_implicit() {
    let vine = Vine::new();
    let (node, _) = compile(&vine.string().optional().required_if_exists(["other"]));

    let field = node.field().unwrap();
    assert_eq!(field.validations.len(), 2);
    assert!(!field.validations[0].implicit);
    assert!(field.validations[1].implicit);
}

#[test]
fn test_builders_are_immutable() {
    let vine = Vine::new();
    let base = vine.string();
    let extended = base.clone().min_length(1).email();

    assert_eq!(base.validations().len(), 1);
    assert_eq!(extended.validations().len(), 3);
}

#[test]
fn test_later_property_replaces_earlier_one() {
    let vine = Vine::new();
    let schema = vine
        .object()
        .property("a", vine.string())
        .property("b", vine.string())
        .property("a", vine.number());

    assert_eq!(schema.keys(), vec!["a", "b"]);
    assert_eq!(output(&schema, json!({"a": "1", "b": "x"}))["a"], json!(1));
}

// =============================================================================
// Property Names
// =============================================================================

#[test]
fn test_camel_case_applies_to_nested_output() {
    let vine = Vine::new();
    let schema = vine
        .object()
        .property("first_name", vine.string())
        .property(
            "home_address",
            vine.object().property("zip_code", vine.string()),
        )
        .property("phone_numbers", vine.array(vine.string()))
        .to_camel_case();

    let out = output(
        &schema,
        json!({
            "first_name": "Virk",
            "home_address": {"zip_code": "110001"},
            "phone_numbers": ["1"]
        }),
    );
    assert_eq!(
        Value::Object(out),
        json!({
            "firstName": "Virk",
            "homeAddress": {"zipCode": "110001"},
            "phoneNumbers": ["1"]
        })
    );
}

#[test]
fn test_camel_case_keeps_input_names() {
    let vine = Vine::new();
    let schema = vine
        .object()
        .property("first_name", vine.string())
        .to_camel_case();
    let (node, _) = compile(&schema);

    let CompilerNode::Object(object) = node else {
        panic!("expected an object node");
    };
    assert_eq!(object.properties[0].field_name(), "first_name");
    assert_eq!(object.properties[0].property_name(), "firstName");
}

// =============================================================================
// Type Checks
// =============================================================================

#[test]
fn test_type_checks() {
    let vine = Vine::new();

    let string = vine.string().type_check().unwrap();
    assert!(string(&json!("a")) && !string(&json!(1)));

    let number = vine.number().type_check().unwrap();
    assert!(number(&json!("1.5")) && !number(&json!("x")));

    let strict = vine.number().strict().type_check().unwrap();
    assert!(!strict(&json!("1.5")));

    let nullable = vine.boolean().nullable().type_check().unwrap();
    assert!(nullable(&json!(null)) && nullable(&json!("on")));

    let literal = vine.literal("a").type_check().unwrap();
    assert!(literal(&json!("a")) && !literal(&json!("b")));

    assert!(vine.any().type_check().is_none());
    assert!(vine.enumeration_with(|_| Vec::new()).type_check().is_none());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// An object of `n` plain string properties compiles to `n` nodes whose
    /// refs are numbered in declaration order.
    #[test]
    fn prop_ref_ids_match_declaration_order(n in 1usize..20) {
        let vine = Vine::new();
        let schema = (0..n).fold(vine.object(), |object, i| {
            object.property(format!("field_{i}"), vine.string())
        });
        let (node, refs) = compile(&schema);

        let CompilerNode::Object(object) = node else {
            panic!("expected an object node");
        };
        prop_assert_eq!(object.properties.len(), n);
        prop_assert_eq!(refs.len(), n);
        for (i, property) in object.properties.iter().enumerate() {
            prop_assert_eq!(ids(property), vec![i as u32]);
        }
    }
}
