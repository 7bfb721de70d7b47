//! Tests for the validator facade
//!
//! Typed output, per-pass options, configuration, async rules and concurrent
//! use of one compiled validator.

use super::support::{expect, failures, output, pairs};
use crate::{
    ConfigValidationError, ErrorEntry, ErrorReporter, FieldContext, MessagesProvider,
    RuleMetadata, RuntimeError, SchemaExt, SimpleErrorReporter, ValidateOptions,
    ValidationError, Vine, VineConfig, VineError, create_async_rule, create_rule,
};
use futures::FutureExt;
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Deserialize, PartialEq)]
struct Signup {
    username: String,
    email: String,
    age: Option<f64>,
}

fn signup_schema(vine: &Vine) -> crate::VineObject<Signup> {
    vine.object()
        .property("username", vine.string().min_length(3))
        .property("email", vine.string().email())
        .property("age", vine.number().positive().optional())
        .output::<Signup>()
}

// =============================================================================
// Typed Output
// =============================================================================

#[test]
fn test_flat_object_output() {
    let vine = Vine::new();
    let validator = vine.compile(&signup_schema(&vine));

    let signup = validator
        .validate_sync(json!({"username": "virk", "email": "virk@example.com", "age": "30"}))
        .unwrap();
    assert_eq!(
        signup,
        Signup {
            username: "virk".into(),
            email: "virk@example.com".into(),
            age: Some(30.0),
        }
    );
}

#[test]
fn test_failures_arrive_in_declaration_order() {
    let vine = Vine::new();
    assert_eq!(
        failures(&signup_schema(&vine), json!({"age": -1})),
        expect(&[
            ("username", "required"),
            ("email", "required"),
            ("age", "positive"),
        ])
    );
}

#[test]
fn test_validation_error_shape() {
    let vine = Vine::new();
    let error = vine
        .compile(&signup_schema(&vine))
        .validate_sync(json!({"username": "ab", "email": "virk@example.com"}))
        .unwrap_err();

    let VineError::Validation(error) = error else {
        panic!("expected a validation error");
    };
    assert_eq!(error.code, ValidationError::CODE);
    assert_eq!(error.status, 422);
    assert_eq!(
        error.messages,
        vec![
            ErrorEntry::new(
                "The username field must have at least 3 characters",
                "username",
                "minLength"
            )
            .with_meta(json!({"min": 3}))
        ]
    );
}

#[test]
fn test_output_type_mismatch_is_fatal() {
    #[derive(Debug, Deserialize)]
    #[allow(dead_code)]
    struct NeedsId {
        id: u64,
    }

    let vine = Vine::new();
    let validator = vine
        .compile(&vine.object().property("name", vine.string()).output::<NeedsId>());
    let result = validator.validate_sync(json!({"name": "virk"}));
    assert!(matches!(result, Err(VineError::Output(_))));
}

#[test]
fn test_nested_optional_object() {
    let vine = Vine::new();
    let schema = vine.object().property(
        "profile",
        vine.object()
            .property("bio", vine.string().optional())
            .property("twitter", vine.string().optional())
            .optional(),
    );

    assert_eq!(Value::Object(output(&schema, json!({}))), json!({}));
    assert_eq!(
        Value::Object(output(&schema, json!({"profile": {"bio": "hi"}}))),
        json!({"profile": {"bio": "hi"}})
    );
    assert_eq!(
        failures(&schema, json!({"profile": {"bio": 5}})),
        expect(&[("profile.bio", "string")])
    );
}

#[test]
fn test_null_handling() {
    let vine = Vine::new();
    let schema = vine
        .object()
        .property("nick", vine.string().nullable())
        .property("bio", vine.string().optional())
        .property("name", vine.string());

    let out = output(&schema, json!({"nick": null, "bio": null, "name": "virk"}));
    assert_eq!(Value::Object(out), json!({"nick": null, "name": "virk"}));

    assert_eq!(
        failures(&schema, json!({"name": null})),
        expect(&[("nick", "required"), ("name", "required")])
    );
}

#[test]
fn test_parse_and_transform() {
    let vine = Vine::new();
    let schema = vine
        .object()
        .property(
            "code",
            vine.string().parse(|value, _| match value {
                Some(Value::Number(n)) => Some(Value::String(n.to_string())),
                other => other,
            }),
        )
        .property(
            "double",
            vine.number()
                .transform(|value, _| json!(value.as_f64().unwrap_or_default() * 2.0)),
        );

    let out = output(&schema, json!({"code": 42, "double": "2"}));
    assert_eq!(out["code"], "42");
    assert_eq!(out["double"], json!(4.0));
}

#[test]
fn test_unknown_properties() {
    let vine = Vine::new();
    let strict = vine.object().property("a", vine.number());
    let open = strict.clone().allow_unknown_properties();

    assert_eq!(Value::Object(output(&strict, json!({"a": 1, "b": 2}))), json!({"a": 1}));
    assert_eq!(
        Value::Object(output(&open, json!({"a": "1", "b": "2"}))),
        json!({"a": 1, "b": "2"})
    );
}

#[test]
fn test_tuple_positions() {
    let vine = Vine::new();
    let point = vine.tuple(vec![vine.number().boxed(), vine.number().boxed()]);
    let schema = vine.object().property("point", point.clone());

    assert_eq!(output(&schema, json!({"point": ["1", 2, 3]}))["point"], json!([1, 2]));
    assert_eq!(
        failures(&schema, json!({"point": [1, "x"]})),
        expect(&[("point.1", "number")])
    );

    let open = vine.object().property("point", point.allow_unknown_properties());
    assert_eq!(output(&open, json!({"point": [1, 2, 3]}))["point"], json!([1, 2, 3]));
}

#[test]
fn test_container_type_mismatch_does_not_descend() {
    let vine = Vine::new();
    let schema = vine
        .object()
        .property("tags", vine.array(vine.string()))
        .property("profile", vine.object().property("bio", vine.string()));

    assert_eq!(
        failures(&schema, json!({"tags": "a,b", "profile": []})),
        expect(&[("tags", "array"), ("profile", "object")])
    );
}

// =============================================================================
// Configuration
// =============================================================================

#[test]
fn test_invalid_config_is_rejected() {
    let result = Vine::with_config(VineConfig::new().with_message("", "x"));
    assert!(matches!(
        result,
        Err(VineError::Config(ConfigValidationError::EmptyMessageKey))
    ));
}

#[test]
fn test_message_overrides_and_field_names() {
    let config = VineConfig::new()
        .with_message("required", "{{ field }} is missing")
        .with_message("email.email", "Enter a valid email address")
        .with_field_name("first_name", "first name");
    let vine = Vine::with_config(config).unwrap();
    let schema = vine
        .object()
        .property("first_name", vine.string())
        .property("email", vine.string().email());

    let error = vine
        .compile(&schema)
        .validate_sync(json!({"email": "nope"}))
        .unwrap_err();
    let messages: Vec<&str> = error
        .as_validation()
        .unwrap()
        .messages
        .iter()
        .map(|entry| entry.message.as_str())
        .collect();
    assert_eq!(messages, vec!["first name is missing", "Enter a valid email address"]);
}

#[test]
fn test_empty_strings_become_null_when_enabled() {
    let vine = Vine::with_config(VineConfig::new().with_convert_empty_strings_to_null(true)).unwrap();
    let schema = vine
        .object()
        .property("name", vine.string())
        .property("bio", vine.string().optional());
    let validator = vine.compile(&schema);

    let error = validator
        .try_validate_sync(json!({"name": "", "bio": ""}), ValidateOptions::default())
        .unwrap()
        .unwrap_err();
    assert_eq!(pairs(&error), expect(&[("name", "required")]));

    // Disabled by default: "" is a valid string
    assert!(failures(&schema, json!({"name": ""})).is_empty());
}

struct ShoutingMessages;

impl MessagesProvider for ShoutingMessages {
    fn get_message(&self, _: &str, rule: &str, field: &FieldContext, _: Option<&Value>) -> String {
        format!("{} FAILED {}", field.field_path().to_uppercase(), rule.to_uppercase())
    }
}

/// Keeps only the first failure.
#[derive(Default)]
struct FirstOnlyReporter {
    first: Option<ErrorEntry>,
}

impl ErrorReporter for FirstOnlyReporter {
    fn has_errors(&self) -> bool {
        self.first.is_some()
    }

    fn report(&mut self, message: &str, rule: &str, field: &FieldContext, _: Option<&Value>) {
        if self.first.is_none() {
            self.first = Some(ErrorEntry::new(message, field.field_path(), rule));
        }
    }

    fn create_error(&mut self) -> ValidationError {
        ValidationError::new(self.first.take().into_iter().collect())
    }
}

#[test]
fn test_per_pass_provider_and_reporter() {
    let vine = Vine::new();
    let validator = vine.compile(&signup_schema(&vine));
    let options = ValidateOptions::new()
        .with_messages_provider(Arc::new(ShoutingMessages))
        .with_error_reporter(|| Box::new(FirstOnlyReporter::default()) as Box<dyn ErrorReporter>);

    let error = validator
        .try_validate_sync(json!({}), options)
        .unwrap()
        .unwrap_err();
    assert_eq!(error.messages.len(), 1);
    assert_eq!(error.messages[0].message, "USERNAME FAILED REQUIRED");

    // The configured defaults are untouched
    let error = validator
        .try_validate_sync(json!({}), ValidateOptions::default())
        .unwrap()
        .unwrap_err();
    assert_eq!(error.messages.len(), 2);
}

#[test]
fn test_configured_reporter() {
    let config = VineConfig::new()
        .with_error_reporter(|| Box::new(FirstOnlyReporter::default()) as Box<dyn ErrorReporter>);
    let vine = Vine::with_config(config).unwrap();

    let error = vine
        .compile(&signup_schema(&vine))
        .validate_sync(json!({}))
        .unwrap_err();
    assert_eq!(error.as_validation().map(|e| e.len()), Some(1));
}

#[test]
fn test_simple_reporter_records_index_and_meta() {
    let vine = Vine::new();
    let schema = vine
        .object()
        .property("tags", vine.array(vine.string().min_length(2)));

    let error = vine
        .compile(&schema)
        .validate_sync(json!({"tags": ["ok", "x"]}))
        .unwrap_err();
    let entry = &error.as_validation().unwrap().messages[0];
    assert_eq!(entry.field, "tags.1");
    assert_eq!(entry.index, Some(1));
    assert_eq!(entry.meta, Some(json!({"min": 2})));

    let reporter = SimpleErrorReporter::new();
    assert!(reporter.errors().is_empty());
}

// =============================================================================
// Metadata
// =============================================================================

#[test]
fn test_meta_validator_rejects_before_running() {
    let vine = Vine::new();
    let validator = vine
        .compile(&vine.object().property("name", vine.string()))
        .with_meta_validator(|meta| {
            if meta.contains_key("tenant") {
                Ok(())
            } else {
                Err("tenant is required".into())
            }
        });

    let result = validator.try_validate_sync(json!({"name": "virk"}), ValidateOptions::default());
    assert!(matches!(result, Err(VineError::InvalidMetadata(ref reason)) if reason == "tenant is required"));

    let options = ValidateOptions::new().with_meta_value("tenant", "acme");
    assert!(validator.try_validate_sync(json!({"name": "virk"}), options).unwrap().is_ok());
}

#[test]
fn test_rules_see_metadata() {
    let owned_by = create_rule(
        "ownedBy",
        |_: &(), field| {
            let owner = field.meta().get("user").cloned();
            if field.value() != owner.as_ref() {
                field.report("{{ field }} must be yours", "ownedBy", None);
            }
            Ok(())
        },
        RuleMetadata::default(),
    );

    let vine = Vine::new();
    let validator = vine.compile(&vine.object().property("owner", vine.string().use_rule(owned_by.build())));
    let options = ValidateOptions::new().with_meta_value("user", "virk");

    assert!(validator.try_validate_sync(json!({"owner": "virk"}), options.clone()).unwrap().is_ok());
    let error = validator
        .try_validate_sync(json!({"owner": "romain"}), options)
        .unwrap()
        .unwrap_err();
    assert_eq!(error.messages[0].message, "owner must be yours");
}

// =============================================================================
// Fatal Errors
// =============================================================================

#[test]
fn test_rule_error_aborts_the_pass() {
    let broken = create_rule(
        "broken",
        |_: &(), _| Err(RuntimeError::invalid_usage("broken", "misconfigured")),
        RuleMetadata::default(),
    );

    let vine = Vine::new();
    let schema = vine
        .object()
        .property("a", vine.string().use_rule(broken.build()))
        .property("b", vine.string());

    let result = vine.compile(&schema).validate_sync(json!({"a": "x"}));
    assert!(matches!(result, Err(VineError::Runtime(RuntimeError::InvalidRuleUsage { .. }))));
}

// =============================================================================
// Async Rules
// =============================================================================

fn unique_username() -> crate::RuleFactory<Vec<String>> {
    create_async_rule(
        "unique",
        |taken: &Vec<String>, field| {
            async move {
                tokio::time::sleep(Duration::from_millis(1)).await;
                let exists = field
                    .value()
                    .and_then(Value::as_str)
                    .is_some_and(|name| taken.iter().any(|t| t == name));
                if exists {
                    field.report("The {{ field }} has already been taken", "unique", None);
                }
                Ok(())
            }
            .boxed()
        },
        RuleMetadata::default(),
    )
}

#[tokio::test]
async fn test_async_rule_runs() {
    let vine = Vine::new();
    let schema = vine.object().property(
        "username",
        vine.string().use_rule(unique_username().call(vec!["virk".into()])),
    );
    let validator = vine.compile(&schema);

    let out = validator.validate(json!({"username": "romain"})).await.unwrap();
    assert_eq!(out["username"], "romain");

    let error = validator.validate(json!({"username": "virk"})).await.unwrap_err();
    assert_eq!(
        error.as_validation().unwrap().messages[0].message,
        "The username has already been taken"
    );
}

#[tokio::test]
async fn test_async_rules_run_in_order() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let step = |name: &'static str, delay: u64, log: Arc<Mutex<Vec<&'static str>>>| {
        create_async_rule(
            name,
            move |_: &(), _| {
                let log = Arc::clone(&log);
                async move {
                    tokio::time::sleep(Duration::from_millis(delay)).await;
                    log.lock().unwrap().push(name);
                    Ok(())
                }
                .boxed()
            },
            RuleMetadata::default(),
        )
    };

    let vine = Vine::new();
    let schema = vine.object().property(
        "name",
        vine.string()
            .use_rule(step("slow", 20, Arc::clone(&log)).build())
            .use_rule(step("fast", 0, Arc::clone(&log)).build()),
    );
    vine.compile(&schema).validate(json!({"name": "x"})).await.unwrap();

    assert_eq!(*log.lock().unwrap(), vec!["slow", "fast"]);
}

#[test]
fn test_sync_mode_rejects_async_rules() {
    let vine = Vine::new();
    let schema = vine.object().property(
        "username",
        vine.string().use_rule(unique_username().call(Vec::new())),
    );

    let result = vine.compile(&schema).validate_sync(json!({"username": "virk"}));
    assert!(matches!(
        result,
        Err(VineError::Runtime(RuntimeError::AsyncRuleInSyncMode { ref rule })) if rule == "unique"
    ));
}

#[tokio::test]
async fn test_concurrent_passes_are_isolated() {
    let vine = Vine::new();
    let validator = vine.compile(&signup_schema(&vine));

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let validator = validator.clone();
            tokio::spawn(async move {
                let data = if i % 2 == 0 {
                    json!({"username": format!("user{i}"), "email": "a@b.co"})
                } else {
                    json!({"username": "x"})
                };
                (i, validator.try_validate(data, ValidateOptions::default()).await)
            })
        })
        .collect();

    for handle in handles {
        let (i, result) = handle.await.unwrap();
        match result.unwrap() {
            Ok(signup) => {
                assert_eq!(i % 2, 0);
                assert_eq!(signup.username, format!("user{i}"));
            }
            Err(error) => {
                assert_eq!(i % 2, 1);
                assert_eq!(
                    pairs(&error),
                    expect(&[("username", "minLength"), ("email", "required")])
                );
            }
        }
    }
}
