//! The root builder.
//!
//! [`Vine`] is the entry point: it hands out schema builders and compiles
//! finished schemas into [`Validator`]s using its [`VineConfig`]. Instances
//! are independent, so two parts of an application can use different
//! messages or reporters side by side.

use crate::config::VineConfig;
use crate::error::VineResult;
use crate::schema::{
    Compilable, GroupConditional, ObjectGroup, ParserOptions, Schema, UnionConditional,
    VineAccepted, VineAny, VineArray, VineBoolean, VineDate, VineEnum, VineLiteral, VineNumber,
    VineObject, VineRecord, VineString, VineTuple, VineUnion,
};
use crate::validator::Validator;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;
use vine_rs_compiler::{Compiler, CompilerOptions, FieldContext, RefsStore, RootNode};

/// Schema factory and compiler.
///
/// # Example
/// ```rust
/// use serde_json::json;
/// use vine_rs::{SchemaExt, Vine, VineConfig};
///
/// let vine = Vine::with_config(VineConfig::new().with_message("required", "{{ field }} is missing"))
///     .unwrap();
/// let validator = vine.compile(
///     &vine
///         .object()
///         .property("username", vine.string())
///         .property("nickname", vine.string().optional()),
/// );
///
/// let error = validator.validate_sync(json!({})).unwrap_err();
/// let error = error.as_validation().unwrap();
/// assert_eq!(error.messages[0].message, "username is missing");
/// ```
#[derive(Debug, Clone)]
pub struct Vine {
    config: Arc<VineConfig>,
}

impl Default for Vine {
    fn default() -> Self {
        Self::new()
    }
}

impl Vine {
    /// A root builder with the default configuration.
    pub fn new() -> Self {
        Self {
            config: Arc::new(VineConfig::default()),
        }
    }

    /// A root builder with `config`, validated first.
    pub fn with_config(config: VineConfig) -> VineResult<Self> {
        config.validate()?;
        Ok(Self {
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &VineConfig {
        &self.config
    }

    // ========================================================================
    // Builders
    // ========================================================================

    pub fn string(&self) -> VineString {
        VineString::new()
    }

    pub fn number(&self) -> VineNumber {
        VineNumber::new()
    }

    pub fn boolean(&self) -> VineBoolean {
        VineBoolean::new()
    }

    pub fn literal(&self, expected: impl Into<Value>) -> VineLiteral {
        VineLiteral::new(expected)
    }

    /// Enum over fixed choices.
    pub fn enumeration<I, V>(&self, choices: I) -> VineEnum
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        VineEnum::new(choices)
    }

    /// Enum whose choices are computed per field.
    pub fn enumeration_with<F>(&self, choices: F) -> VineEnum
    where
        F: Fn(&FieldContext) -> Vec<Value> + Send + Sync + 'static,
    {
        VineEnum::dynamic(choices)
    }

    pub fn accepted(&self) -> VineAccepted {
        VineAccepted::new()
    }

    pub fn date(&self) -> VineDate {
        VineDate::new()
    }

    pub fn any(&self) -> VineAny {
        VineAny::new()
    }

    pub fn object(&self) -> VineObject {
        VineObject::new()
    }

    pub fn array<S: Schema>(&self, each: S) -> VineArray<S> {
        VineArray::new(each)
    }

    pub fn tuple(&self, items: Vec<Box<dyn Compilable>>) -> VineTuple {
        VineTuple::new(items)
    }

    pub fn record<S: Schema>(&self, each: S) -> VineRecord<S> {
        VineRecord::new(each)
    }

    pub fn union(&self, conditionals: Vec<UnionConditional>) -> VineUnion {
        VineUnion::new(conditionals)
    }

    /// Union picking the first schema whose type check accepts the value.
    pub fn union_of_types(&self, schemas: Vec<Box<dyn Compilable>>) -> VineUnion {
        VineUnion::of_types(schemas)
    }

    pub fn group(&self, conditionals: Vec<GroupConditional>) -> ObjectGroup {
        ObjectGroup::new(conditionals)
    }

    // ========================================================================
    // Compilation
    // ========================================================================

    /// Compile `schema` into a validator.
    ///
    /// Refs are tracked in declaration order, so compiling the same schema
    /// twice yields identical trees.
    pub fn compile<S: Schema>(&self, schema: &S) -> Validator<S::Output> {
        let mut refs = RefsStore::new();
        let root = RootNode::new(schema.compile("", &mut refs, &ParserOptions::default()));

        debug!(
            node_type = root.schema.node_type(),
            refs = refs.len(),
            "Compiled schema"
        );

        let options = CompilerOptions {
            convert_empty_strings_to_null: self.config.convert_empty_strings_to_null,
        };
        let validate_fn = Compiler::new(root.clone(), options).compile();
        Validator::from_parts(root, refs, validate_fn, Arc::clone(&self.config))
    }

    /// Compile and run one pass.
    pub async fn validate<S: Schema>(&self, schema: &S, data: Value) -> VineResult<S::Output> {
        self.compile(schema).validate(data).await
    }
}
