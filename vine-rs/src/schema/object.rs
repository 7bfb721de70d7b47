//! Object schema.

use super::group::ObjectGroup;
use super::{Compilable, ParserOptions, Schema, SchemaCore, TypeCheckFn, sealed, type_check};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::fmt;
use std::marker::PhantomData;
use vine_rs_compiler::{CompilerNode, ObjectNode, RefsStore};

/// Named child schemas in declaration order.
pub(crate) type Properties = Vec<(String, Box<dyn Compilable>)>;

/// Insert a property, replacing an earlier one with the same name in place.
pub(crate) fn upsert_property(
    properties: &mut Properties,
    name: String,
    schema: Box<dyn Compilable>,
) {
    match properties.iter_mut().find(|(existing, _)| *existing == name) {
        Some((_, slot)) => *slot = schema,
        None => properties.push((name, schema)),
    }
}

pub(crate) fn compile_properties(
    properties: &Properties,
    refs: &mut RefsStore,
    options: &ParserOptions,
) -> Vec<CompilerNode> {
    properties
        .iter()
        .map(|(name, schema)| schema.compile(name, refs, options))
        .collect()
}

/// Accepts objects with a known set of properties.
///
/// Unknown properties are dropped from the output unless
/// [`allow_unknown_properties`](Self::allow_unknown_properties) is set. The
/// output deserializes into `O`, a JSON map by default.
///
/// # Example
/// ```rust
/// use serde::Deserialize;
/// use vine_rs::Vine;
///
/// #[derive(Deserialize)]
/// struct Login {
///     email: String,
///     password: String,
/// }
///
/// let vine = Vine::new();
/// let login = vine
///     .object()
///     .property("email", vine.string().email())
///     .property("password", vine.string().min_length(8))
///     .output::<Login>();
/// # let _ = login;
/// ```
pub struct VineObject<O = Map<String, Value>> {
    pub(crate) core: SchemaCore,
    properties: Properties,
    groups: Vec<ObjectGroup>,
    allow_unknown_properties: bool,
    to_camel_case: bool,
    _output: PhantomData<fn() -> O>,
}

impl VineObject {
    pub fn new() -> Self {
        Self {
            core: SchemaCore::new(),
            properties: Vec::new(),
            groups: Vec::new(),
            allow_unknown_properties: false,
            to_camel_case: false,
            _output: PhantomData,
        }
    }
}

impl Default for VineObject {
    fn default() -> Self {
        Self::new()
    }
}

impl<O> VineObject<O> {
    field_builder_methods!();

    /// Add or replace a property.
    #[must_use]
    pub fn property<S: Schema>(mut self, name: impl Into<String>, schema: S) -> Self {
        upsert_property(&mut self.properties, name.into(), Box::new(schema));
        self
    }

    /// Add a conditional group of properties.
    #[must_use]
    pub fn merge(mut self, group: ObjectGroup) -> Self {
        self.groups.push(group);
        self
    }

    /// Copy undeclared properties to the output unvalidated.
    #[must_use]
    pub fn allow_unknown_properties(mut self) -> Self {
        self.allow_unknown_properties = true;
        self
    }

    /// Output property names of this object and every nested schema in
    /// camelCase.
    #[must_use]
    pub fn to_camel_case(mut self) -> Self {
        self.to_camel_case = true;
        self
    }

    /// Deserialize the output into `T`.
    pub fn output<T>(self) -> VineObject<T> {
        VineObject {
            core: self.core,
            properties: self.properties,
            groups: self.groups,
            allow_unknown_properties: self.allow_unknown_properties,
            to_camel_case: self.to_camel_case,
            _output: PhantomData,
        }
    }

    /// Declared property names, groups excluded.
    pub fn keys(&self) -> Vec<&str> {
        self.properties.iter().map(|(name, _)| name.as_str()).collect()
    }
}

impl<O> Clone for VineObject<O> {
    fn clone(&self) -> Self {
        Self {
            core: self.core.clone(),
            properties: self.properties.clone(),
            groups: self.groups.clone(),
            allow_unknown_properties: self.allow_unknown_properties,
            to_camel_case: self.to_camel_case,
            _output: PhantomData,
        }
    }
}

impl<O> fmt::Debug for VineObject<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VineObject")
            .field("core", &self.core)
            .field("properties", &self.keys())
            .field("groups", &self.groups.len())
            .field("allow_unknown_properties", &self.allow_unknown_properties)
            .field("to_camel_case", &self.to_camel_case)
            .finish()
    }
}

impl<O> sealed::Sealed for VineObject<O> {}

impl<O: 'static> Compilable for VineObject<O> {
    fn compile(
        &self,
        property_name: &str,
        refs: &mut RefsStore,
        options: &ParserOptions,
    ) -> CompilerNode {
        let field = self.core.compile_field(property_name, refs, options);
        let child_options = ParserOptions {
            to_camel_case: options.to_camel_case || self.to_camel_case,
        };

        CompilerNode::Object(ObjectNode {
            field,
            properties: compile_properties(&self.properties, refs, &child_options),
            groups: self
                .groups
                .iter()
                .map(|group| group.compile(refs, &child_options))
                .collect(),
            allow_unknown_properties: self.allow_unknown_properties,
        })
    }

    fn type_check(&self) -> Option<TypeCheckFn> {
        Some(type_check(Value::is_object))
    }

    fn clone_boxed(&self) -> Box<dyn Compilable> {
        Box::new(self.clone())
    }
}

impl<O: DeserializeOwned + Send + 'static> Schema for VineObject<O> {
    type Output = O;
}
