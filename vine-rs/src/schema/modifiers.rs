//! Optional, nullable and transform wrappers.
//!
//! Each wrapper compiles its inner schema and then adjusts the resulting
//! node. Unions take their optionality from their branches, so `optional`
//! and `nullable` leave them unchanged. Conditional requirements and
//! transforms attach to union nodes like to any other.

use super::{Compilable, ParserOptions, Schema, TypeCheckFn, sealed};
use crate::rule::Validation;
use crate::rules::optional::{REQUIRED_IF_EXISTS, REQUIRED_IF_MISSING, REQUIRED_WHEN};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use vine_rs_compiler::{
    CompilerNode, FieldContext, RefsStore, TransformFn, ValidationNode, transform_fn,
};

// ============================================================================
// Optional
// ============================================================================

/// Field that may be missing. Missing optional properties are left out of
/// the output.
#[derive(Debug, Clone)]
pub struct Optional<S> {
    inner: S,
    conditions: Vec<Validation>,
}

impl<S: Schema> Optional<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            conditions: Vec::new(),
        }
    }

    /// Required after all when any of `fields` is present in the parent.
    #[must_use]
    pub fn required_if_exists<I, N>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        let fields = fields.into_iter().map(Into::into).collect();
        self.conditions.push(REQUIRED_IF_EXISTS.call(fields));
        self
    }

    /// Required after all when any of `fields` is missing from the parent.
    #[must_use]
    pub fn required_if_missing<I, N>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        let fields = fields.into_iter().map(Into::into).collect();
        self.conditions.push(REQUIRED_IF_MISSING.call(fields));
        self
    }

    /// Required after all when `condition` holds.
    #[must_use]
    pub fn required_when<F>(mut self, condition: F) -> Self
    where
        F: Fn(&FieldContext) -> bool + Send + Sync + 'static,
    {
        self.conditions.push(REQUIRED_WHEN.call(Arc::new(condition)));
        self
    }
}

impl<S: Schema> sealed::Sealed for Optional<S> {}

impl<S: Schema> Compilable for Optional<S> {
    fn compile(
        &self,
        property_name: &str,
        refs: &mut RefsStore,
        options: &ParserOptions,
    ) -> CompilerNode {
        let mut node = self.inner.compile(property_name, refs, options);
        if let Some(field) = node.field_mut() {
            field.is_optional = true;
        }
        for condition in &self.conditions {
            let rule_fn_id = refs.track_validation(condition.clone());
            node.validations_mut().push(ValidationNode {
                rule_fn_id,
                implicit: condition.rule.implicit,
                is_async: condition.rule.is_async,
            });
        }
        node
    }

    fn type_check(&self) -> Option<TypeCheckFn> {
        self.inner.type_check()
    }

    fn clone_boxed(&self) -> Box<dyn Compilable> {
        Box::new(self.clone())
    }
}

impl<S: Schema> Schema for Optional<S> {
    type Output = Option<S::Output>;
}

// ============================================================================
// Nullable
// ============================================================================

/// Field that accepts `null` and keeps it in the output.
#[derive(Debug, Clone)]
pub struct Nullable<S> {
    inner: S,
}

impl<S: Schema> Nullable<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

impl<S: Schema> sealed::Sealed for Nullable<S> {}

impl<S: Schema> Compilable for Nullable<S> {
    fn compile(
        &self,
        property_name: &str,
        refs: &mut RefsStore,
        options: &ParserOptions,
    ) -> CompilerNode {
        let mut node = self.inner.compile(property_name, refs, options);
        if let Some(field) = node.field_mut() {
            field.allow_null = true;
        }
        node
    }

    fn type_check(&self) -> Option<TypeCheckFn> {
        let inner = self.inner.type_check()?;
        Some(super::type_check(move |value| value.is_null() || inner(value)))
    }

    fn clone_boxed(&self) -> Box<dyn Compilable> {
        Box::new(self.clone())
    }
}

impl<S: Schema> Schema for Nullable<S> {
    type Output = Option<S::Output>;
}

// ============================================================================
// Transform
// ============================================================================

/// Field whose valid output is rewritten by a callback. `O` is what the
/// rewritten value deserializes into.
pub struct Transformed<S, O = Value> {
    inner: S,
    transform: TransformFn,
    _output: PhantomData<fn() -> O>,
}

impl<S: Schema, O> Transformed<S, O> {
    /// Deserialize the transformed value into `T`.
    pub fn output<T>(self) -> Transformed<S, T> {
        Transformed {
            inner: self.inner,
            transform: self.transform,
            _output: PhantomData,
        }
    }
}

impl<S: Clone, O> Clone for Transformed<S, O> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            transform: Arc::clone(&self.transform),
            _output: PhantomData,
        }
    }
}

impl<S: fmt::Debug, O> fmt::Debug for Transformed<S, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transformed")
            .field("inner", &self.inner)
            .finish_non_exhaustive()
    }
}

impl<S: Schema, O> sealed::Sealed for Transformed<S, O> {}

impl<S: Schema, O: 'static> Compilable for Transformed<S, O> {
    fn compile(
        &self,
        property_name: &str,
        refs: &mut RefsStore,
        options: &ParserOptions,
    ) -> CompilerNode {
        let mut node = self.inner.compile(property_name, refs, options);
        *node.transform_fn_id_mut() = Some(refs.track_transformer(Arc::clone(&self.transform)));
        node
    }

    fn type_check(&self) -> Option<TypeCheckFn> {
        self.inner.type_check()
    }

    fn clone_boxed(&self) -> Box<dyn Compilable> {
        Box::new(self.clone())
    }
}

impl<S: Schema, O: DeserializeOwned + Send + 'static> Schema for Transformed<S, O> {
    type Output = O;
}

// ============================================================================
// Extension Trait
// ============================================================================

/// Wrappers available on every schema.
pub trait SchemaExt: Schema + Sized {
    fn optional(self) -> Optional<Self> {
        Optional::new(self)
    }

    fn nullable(self) -> Nullable<Self> {
        Nullable::new(self)
    }

    /// Rewrite the valid output of the field. Runs after every rule passed.
    fn transform<F>(self, transform: F) -> Transformed<Self, Value>
    where
        F: Fn(Value, &FieldContext) -> Value + Send + Sync + 'static,
    {
        Transformed {
            inner: self,
            transform: transform_fn(transform),
            _output: PhantomData,
        }
    }

    /// Erase the schema type, for tuples and type unions.
    fn boxed(self) -> Box<dyn Compilable> {
        Box::new(self)
    }
}

impl<S: Schema> SchemaExt for S {}
