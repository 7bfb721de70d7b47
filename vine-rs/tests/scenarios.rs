//! End-to-end scenarios through the public API.

use serde::Deserialize;
use serde_json::{Value, json};
use vine_rs::{
    GroupConditional, ObjectGroup, RootNode, SchemaExt, UnionConditional, ValidateOptions,
    ValidationError, Vine, VineConfig, VineError, VineObject,
};

fn pairs(error: &ValidationError) -> Vec<(&str, &str)> {
    error
        .messages
        .iter()
        .map(|entry| (entry.field.as_str(), entry.rule.as_str()))
        .collect()
}

fn validation_error<T: std::fmt::Debug>(result: Result<T, VineError>) -> ValidationError {
    match result {
        Err(VineError::Validation(error)) => error,
        other => panic!("expected a validation error, got {other:?}"),
    }
}

// =============================================================================
// Flat Object
// =============================================================================

#[derive(Debug, Deserialize, PartialEq)]
struct User {
    username: String,
    email: String,
    password: String,
}

fn user_schema(vine: &Vine) -> VineObject<User> {
    vine.object()
        .property("username", vine.string().trim().min_length(3).max_length(20))
        .property("email", vine.string().email().to_lower_case())
        .property("password", vine.string().min_length(8).confirmed())
        .output::<User>()
}

#[tokio::test]
async fn flat_object_passes_and_normalizes() {
    let vine = Vine::new();
    let validator = vine.compile(&user_schema(&vine));

    let user = validator
        .validate(json!({
            "username": "  virk  ",
            "email": "Virk@Example.com",
            "password": "secret123",
            "password_confirmation": "secret123",
        }))
        .await
        .unwrap();

    assert_eq!(
        user,
        User {
            username: "virk".into(),
            email: "virk@example.com".into(),
            password: "secret123".into(),
        }
    );
}

#[tokio::test]
async fn flat_object_reports_every_field_in_order() {
    let vine = Vine::new();
    let validator = vine.compile(&user_schema(&vine));

    let error = validation_error(
        validator
            .validate(json!({"username": "ab", "email": "nope", "password": "short"}))
            .await,
    );
    assert_eq!(
        pairs(&error),
        vec![
            ("username", "minLength"),
            ("email", "email"),
            ("password", "minLength"),
        ]
    );
}

#[tokio::test]
async fn without_bail_every_rule_of_a_field_runs() {
    let vine = Vine::new();
    let schema = vine.object().property(
        "password",
        vine.string().min_length(8).confirmed().bail(false),
    );

    let error = validation_error(vine.compile(&schema).validate(json!({"password": "short"})).await);
    assert_eq!(
        pairs(&error),
        vec![("password", "minLength"), ("password", "confirmed")]
    );
}

// =============================================================================
// Nested Optional Objects
// =============================================================================

#[tokio::test]
async fn nested_optional_object() {
    let vine = Vine::new();
    let schema = vine
        .object()
        .property("name", vine.string())
        .property(
            "address",
            vine.object()
                .property("street", vine.string())
                .property("zip", vine.string().fixed_length(5))
                .optional(),
        );
    let validator = vine.compile(&schema);

    let out = validator.validate(json!({"name": "virk"})).await.unwrap();
    assert_eq!(Value::Object(out), json!({"name": "virk"}));

    let error = validation_error(
        validator
            .validate(json!({"name": "virk", "address": {"zip": "123"}}))
            .await,
    );
    assert_eq!(
        pairs(&error),
        vec![("address.street", "required"), ("address.zip", "fixedLength")]
    );
}

// =============================================================================
// Arrays
// =============================================================================

#[tokio::test]
async fn array_of_objects_with_distinct_and_item_paths() {
    let vine = Vine::new();
    let schema = vine.object().property(
        "items",
        vine.array(
            vine.object()
                .property("sku", vine.string())
                .property("qty", vine.number().positive()),
        )
        .not_empty()
        .distinct_by(["sku"]),
    );
    let validator = vine.compile(&schema);

    let error = validation_error(
        validator
            .validate(json!({"items": [
                {"sku": "a", "qty": 1},
                {"sku": "a", "qty": 0},
            ]}))
            .await,
    );
    assert_eq!(pairs(&error), vec![("items", "distinct")]);

    let error = validation_error(
        validator
            .validate(json!({"items": [{"sku": "a", "qty": 1}, {"sku": "b", "qty": 0}]}))
            .await,
    );
    assert_eq!(pairs(&error), vec![("items.1.qty", "positive")]);

    let error = validation_error(validator.validate(json!({"items": []})).await);
    assert_eq!(pairs(&error), vec![("items", "notEmpty")]);
}

// =============================================================================
// Unions
// =============================================================================

#[tokio::test]
async fn union_dispatch_and_fallback() {
    let vine = Vine::new();
    let payment = vine.union(vec![
        UnionConditional::when(
            |value, _| value["type"] == "card",
            vine.object()
                .property("type", vine.literal("card"))
                .property("number", vine.string().fixed_length(16)),
        ),
        UnionConditional::when(
            |value, _| value["type"] == "bank",
            vine.object()
                .property("type", vine.literal("bank"))
                .property("iban", vine.string().min_length(15)),
        ),
    ]);
    let validator = vine.compile(&vine.object().property("payment", payment));

    let out = validator
        .validate(json!({"payment": {"type": "bank", "iban": "DE89370400440532013000"}}))
        .await
        .unwrap();
    assert_eq!(out["payment"]["iban"], "DE89370400440532013000");

    let error = validation_error(
        validator
            .validate(json!({"payment": {"type": "card", "number": "42"}}))
            .await,
    );
    assert_eq!(pairs(&error), vec![("payment.number", "fixedLength")]);

    let error = validation_error(validator.validate(json!({"payment": {"type": "cash"}})).await);
    assert_eq!(pairs(&error), vec![("payment", "union")]);
}

#[tokio::test]
async fn object_groups_merge_conditional_properties() {
    let vine = Vine::new();
    let group = ObjectGroup::new(vec![
        GroupConditional::when(|value, _| value["visitor"] == true)
            .property("visitor_name", vine.string()),
        GroupConditional::when(|value, _| value["visitor"] == false)
            .property("employee_id", vine.number()),
    ]);
    let schema = vine
        .object()
        .property("visitor", vine.boolean())
        .merge(group);
    let validator = vine.compile(&schema);

    let out = validator
        .validate(json!({"visitor": true, "visitor_name": "virk", "employee_id": 1}))
        .await
        .unwrap();
    assert_eq!(Value::Object(out), json!({"visitor": true, "visitor_name": "virk"}));

    let error = validation_error(validator.validate(json!({"visitor": false})).await);
    assert_eq!(pairs(&error), vec![("employee_id", "required")]);
}

// =============================================================================
// Booleans
// =============================================================================

#[tokio::test]
async fn boolean_coercion() {
    let vine = Vine::new();
    let validator = vine.compile(&vine.object().property("active", vine.boolean()));

    for input in [json!("on"), json!("1"), json!(true), json!(1)] {
        let out = validator.validate(json!({"active": input})).await.unwrap();
        assert_eq!(out["active"], true);
    }
    for input in [json!("0"), json!("false"), json!(false), json!(0)] {
        let out = validator.validate(json!({"active": input})).await.unwrap();
        assert_eq!(out["active"], false);
    }

    let error = validation_error(validator.validate(json!({"active": "foo"})).await);
    assert_eq!(pairs(&error), vec![("active", "boolean")]);
    assert_eq!(error.messages[0].message, "The value must be a boolean");
}

// =============================================================================
// Compiled Tree
// =============================================================================

#[test]
fn compiled_tree_is_deterministic_and_serializable() {
    let vine = Vine::new();
    let first = vine.compile(&user_schema(&vine)).to_json().unwrap();
    let second = vine.compile(&user_schema(&vine)).to_json().unwrap();
    assert_eq!(first, second);

    let restored = RootNode::from_json(first.clone()).unwrap();
    assert_eq!(restored.to_json().unwrap(), first);
    assert_eq!(first["schema"]["type"], "object");
}

#[tokio::test]
async fn camel_case_output_keys() {
    let vine = Vine::new();
    let schema = vine
        .object()
        .property("first_name", vine.string())
        .property("address", vine.object().property("zip_code", vine.string()))
        .to_camel_case();

    let out = vine
        .compile(&schema)
        .validate(json!({"first_name": "virk", "address": {"zip_code": "12345"}}))
        .await
        .unwrap();
    assert_eq!(
        Value::Object(out),
        json!({"firstName": "virk", "address": {"zipCode": "12345"}})
    );
}

// =============================================================================
// Passes
// =============================================================================

#[tokio::test]
async fn validator_serves_concurrent_passes() {
    let vine = Vine::new();
    let validator = vine.compile(&user_schema(&vine));

    let tasks: Vec<_> = (0..8)
        .map(|i| {
            let validator = validator.clone();
            tokio::spawn(async move {
                let password = if i % 2 == 0 { "secret123" } else { "x" };
                validator
                    .try_validate(
                        json!({
                            "username": format!("user{i}"),
                            "email": "a@b.co",
                            "password": password,
                            "password_confirmation": password,
                        }),
                        ValidateOptions::default(),
                    )
                    .await
                    .unwrap()
            })
        })
        .collect();

    for (i, task) in tasks.into_iter().enumerate() {
        let result = task.await.unwrap();
        if i % 2 == 0 {
            assert_eq!(result.unwrap().username, format!("user{i}"));
        } else {
            let error = result.unwrap_err();
            assert_eq!(pairs(&error), vec![("password", "minLength")]);
        }
    }
}

#[tokio::test]
async fn metadata_validator_guards_passes() {
    let vine = Vine::new();
    let validator = vine
        .compile(&vine.object().property("name", vine.string()))
        .with_meta_validator(|meta| match meta.get("locale") {
            Some(Value::String(_)) => Ok(()),
            _ => Err("locale must be a string".to_string()),
        });

    let rejected = validator
        .try_validate(json!({"name": "virk"}), ValidateOptions::default())
        .await;
    assert!(matches!(rejected, Err(VineError::InvalidMetadata(_))));

    let accepted = validator
        .try_validate(
            json!({"name": "virk"}),
            ValidateOptions::new().with_meta_value("locale", "en"),
        )
        .await
        .unwrap();
    assert!(accepted.is_ok());
}

#[test]
fn invalid_configuration_is_rejected() {
    let result = Vine::with_config(VineConfig::new().with_field_name("", "nothing"));
    assert!(matches!(result, Err(VineError::Config(_))));
}
