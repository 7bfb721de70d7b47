//! Schema builders
//!
//! Every builder implements [`Compilable`], which turns it into a
//! [`CompilerNode`] while registering its callbacks in a [`RefsStore`], and
//! [`Schema`], which names the typed output a successful pass deserializes
//! into. Builders are immutable values: every method consumes `self` and
//! returns the updated builder, so a schema can be cloned and extended
//! without touching the original.
//!
//! # Example
//! ```rust
//! use vine_rs::{SchemaExt, Vine};
//!
//! let vine = Vine::new();
//! let schema = vine
//!     .object()
//!     .property("username", vine.string().min_length(3))
//!     .property("age", vine.number().positive().optional());
//! # let _ = schema;
//! ```

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use vine_rs_compiler::{CompilerNode, FieldNode, ParseFn, RefsStore, ValidationNode};

use crate::rule::Validation;

// ============================================================================
// Builder Macros
// ============================================================================

/// Methods every field-backed builder shares. Expects a `core: SchemaCore`
/// field.
macro_rules! field_builder_methods {
    () => {
        /// Stop at the first failing rule (default) or keep running every
        /// rule of the field.
        #[must_use]
        pub fn bail(mut self, bail: bool) -> Self {
            self.core.bail = bail;
            self
        }

        /// Rewrite the raw value before any rule runs.
        #[must_use]
        pub fn parse<F>(mut self, parse: F) -> Self
        where
            F: Fn(
                    Option<serde_json::Value>,
                    &vine_rs_compiler::ParseContext<'_>,
                ) -> Option<serde_json::Value>
                + Send
                + Sync
                + 'static,
        {
            self.core.parse = Some(vine_rs_compiler::parse_fn(parse));
            self
        }

        /// Append a rule.
        #[must_use]
        pub fn use_rule(mut self, validation: $crate::rule::Validation) -> Self {
            self.core.validations.push(validation);
            self
        }

        /// Rules attached so far, in execution order.
        pub fn validations(&self) -> &[$crate::rule::Validation] {
            &self.core.validations
        }
    };
}

/// `Compilable` + `Schema` for builders that compile to a literal node.
macro_rules! impl_literal_schema {
    ($ty:ty => $output:ty) => {
        impl $crate::schema::sealed::Sealed for $ty {}

        impl $crate::schema::Compilable for $ty {
            fn compile(
                &self,
                property_name: &str,
                refs: &mut vine_rs_compiler::RefsStore,
                options: &$crate::schema::ParserOptions,
            ) -> vine_rs_compiler::CompilerNode {
                vine_rs_compiler::CompilerNode::Literal(vine_rs_compiler::LiteralNode::new(
                    self.core.compile_field(property_name, refs, options),
                ))
            }

            fn type_check(&self) -> Option<$crate::schema::TypeCheckFn> {
                self.intrinsic_check()
            }

            fn clone_boxed(&self) -> Box<dyn $crate::schema::Compilable> {
                Box::new(self.clone())
            }
        }

        impl $crate::schema::Schema for $ty {
            type Output = $output;
        }
    };
}

pub mod accepted;
pub mod any;
pub mod array;
pub mod boolean;
pub mod date;
pub mod enumeration;
pub mod group;
pub mod literal;
pub mod modifiers;
pub mod number;
pub mod object;
pub mod record;
pub mod string;
pub mod tuple;
pub mod union;

pub use accepted::VineAccepted;
pub use any::VineAny;
pub use array::VineArray;
pub use boolean::VineBoolean;
pub use date::VineDate;
pub use enumeration::VineEnum;
pub use group::{GroupConditional, ObjectGroup};
pub use literal::VineLiteral;
pub use modifiers::{Nullable, Optional, SchemaExt, Transformed};
pub use number::VineNumber;
pub use object::VineObject;
pub use record::VineRecord;
pub use string::VineString;
pub use tuple::VineTuple;
pub use union::{UnionConditional, VineUnion};

pub(crate) mod sealed {
    pub trait Sealed {}
}

// ============================================================================
// Traits
// ============================================================================

/// Cheap test of whether a value has a schema's type. Used by
/// [`Vine::union_of_types`](crate::Vine::union_of_types) to pick a branch.
pub type TypeCheckFn = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

pub(crate) fn type_check<F>(check: F) -> TypeCheckFn
where
    F: Fn(&Value) -> bool + Send + Sync + 'static,
{
    Arc::new(check)
}

/// Options threaded through compilation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParserOptions {
    /// Output property names in camelCase
    pub to_camel_case: bool,
}

/// A builder that compiles to IR.
///
/// Sealed: new behavior is added with custom rules, not new node kinds.
pub trait Compilable: sealed::Sealed + Send + Sync {
    /// Compile into a node named `property_name`, tracking every callback in
    /// `refs` in declaration order.
    fn compile(&self, property_name: &str, refs: &mut RefsStore, options: &ParserOptions)
    -> CompilerNode;

    /// Intrinsic type test, when the schema has one.
    fn type_check(&self) -> Option<TypeCheckFn>;

    fn clone_boxed(&self) -> Box<dyn Compilable>;
}

impl Clone for Box<dyn Compilable> {
    fn clone(&self) -> Self {
        self.clone_boxed()
    }
}

impl fmt::Debug for dyn Compilable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Compilable")
    }
}

impl sealed::Sealed for Box<dyn Compilable> {}

impl Compilable for Box<dyn Compilable> {
    fn compile(
        &self,
        property_name: &str,
        refs: &mut RefsStore,
        options: &ParserOptions,
    ) -> CompilerNode {
        (**self).compile(property_name, refs, options)
    }

    fn type_check(&self) -> Option<TypeCheckFn> {
        (**self).type_check()
    }

    fn clone_boxed(&self) -> Box<dyn Compilable> {
        (**self).clone_boxed()
    }
}

impl Schema for Box<dyn Compilable> {
    type Output = Value;
}

/// A compilable builder with a typed output.
pub trait Schema: Compilable + Clone + 'static {
    /// What a successful pass deserializes into
    type Output: DeserializeOwned + Send + 'static;
}

// ============================================================================
// Shared Builder State
// ============================================================================

/// Field settings and rules shared by every field-backed builder.
#[derive(Clone)]
pub(crate) struct SchemaCore {
    pub bail: bool,
    pub parse: Option<ParseFn>,
    pub validations: Vec<Validation>,
}

impl SchemaCore {
    pub fn new() -> Self {
        Self {
            bail: true,
            parse: None,
            validations: Vec::new(),
        }
    }

    /// A core whose first rule checks the type.
    pub fn typed(type_rule: Validation) -> Self {
        let mut core = Self::new();
        core.validations.push(type_rule);
        core
    }

    /// Replace the type rule pushed by [`SchemaCore::typed`].
    pub fn replace_type_rule(&mut self, type_rule: Validation) {
        match self.validations.first_mut() {
            Some(first) if first.rule.name == type_rule.rule.name => *first = type_rule,
            _ => self.validations.insert(0, type_rule),
        }
    }

    /// Build the field block, tracking the parser first and then every rule.
    pub fn compile_field(
        &self,
        property_name: &str,
        refs: &mut RefsStore,
        options: &ParserOptions,
    ) -> FieldNode {
        let mut field = FieldNode::new(property_name, output_name(property_name, options));
        field.bail = self.bail;
        field.parse_fn_id = self.parse.clone().map(|parse| refs.track_parser(parse));
        field.validations = self
            .validations
            .iter()
            .map(|validation| ValidationNode {
                rule_fn_id: refs.track_validation(validation.clone()),
                implicit: validation.rule.implicit,
                is_async: validation.rule.is_async,
            })
            .collect();
        field
    }
}

impl fmt::Debug for SchemaCore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rules: Vec<&str> = self.validations.iter().map(|v| v.rule.name.as_str()).collect();
        f.debug_struct("SchemaCore")
            .field("bail", &self.bail)
            .field("parse", &self.parse.is_some())
            .field("rules", &rules)
            .finish()
    }
}

/// Output property name. Synthetic names (`*`, tuple positions) are kept.
pub(crate) fn output_name(property_name: &str, options: &ParserOptions) -> String {
    use convert_case::{Case, Casing};

    if options.to_camel_case && property_name.chars().any(char::is_alphabetic) {
        property_name.to_case(Case::Camel)
    } else {
        property_name.to_string()
    }
}
