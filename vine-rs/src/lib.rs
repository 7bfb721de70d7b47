//! # vine-rs
//!
//! Composable validation schemas for JSON-shaped data, compiled once into a
//! serializable IR and executed by a reusable, thread-safe [`Validator`].
//!
//! ## Overview
//!
//! A schema is built from small immutable builders handed out by [`Vine`].
//! Compiling it produces a tree of [`CompilerNode`]s free of callbacks plus a
//! [`RefsStore`] holding every rule, parser, transformer and conditional the
//! tree refers to by id. Validation walks the tree, mutates a working copy of
//! the input as rules normalize it, and either returns the typed output or a
//! [`ValidationError`] listing every failed field.
//!
//! ## Quick Start
//!
//! ```rust
//! use serde::Deserialize;
//! use serde_json::json;
//! use vine_rs::{SchemaExt, Vine};
//!
//! #[derive(Debug, Deserialize)]
//! struct Signup {
//!     username: String,
//!     email: String,
//!     age: Option<f64>,
//! }
//!
//! let vine = Vine::new();
//! let schema = vine
//!     .object()
//!     .property("username", vine.string().trim().min_length(3))
//!     .property("email", vine.string().email())
//!     .property("age", vine.number().positive().optional())
//!     .output::<Signup>();
//!
//! let validator = vine.compile(&schema);
//! let signup = validator
//!     .validate_sync(json!({"username": "  virk ", "email": "virk@example.com"}))
//!     .unwrap();
//! assert_eq!(signup.username, "virk");
//! assert_eq!(signup.age, None);
//! ```
//!
//! ## Schemas
//!
//! | Builder | Output | Notes |
//! |---------|--------|-------|
//! | [`VineString`] | `String` | email, regex, uuid, lengths, mutations |
//! | [`VineNumber`] | `f64` | numeric strings accepted unless strict |
//! | [`VineBoolean`] | `bool` | `1`, `"on"`, `"true"` ... unless strict |
//! | [`VineLiteral`] / [`VineEnum`] | `Value` | fixed or computed choices |
//! | [`VineAccepted`] | `bool` | consent checkboxes |
//! | [`VineDate`] | `NaiveDateTime` | formats and day comparisons |
//! | [`VineObject`] | any `DeserializeOwned` | groups, unknown keys, camelCase |
//! | [`VineArray`] / [`VineTuple`] / [`VineRecord`] | `Vec` / `Vec<Value>` / `HashMap` | |
//! | [`VineUnion`] | `Value` | first matching conditional wins |
//!
//! Every schema also takes `.optional()`, `.nullable()` and `.transform(..)`
//! through [`SchemaExt`], plus `.bail(..)`, `.parse(..)` and `.use_rule(..)`
//! on the builder itself.
//!
//! ## Custom Rules
//!
//! [`create_rule`] and [`create_async_rule`] turn a function into a reusable
//! rule. Async rules are awaited in order; running a schema that uses one
//! through [`Validator::validate_sync`] is a runtime error.

pub mod config;
pub mod error;
pub mod helpers;
pub mod messages;
pub mod reporter;
pub mod rule;
pub mod rules;
pub mod schema;
pub mod validator;
pub mod vine;

#[cfg(test)]
mod tests;

pub use config::{ConfigValidationError, VineConfig};
pub use error::{VineError, VineResult};
pub use messages::SimpleMessagesProvider;
pub use reporter::SimpleErrorReporter;
pub use rule::{RuleFactory, RuleMetadata, Validation, create_async_rule, create_rule};
pub use rules::date::DateReference;
pub use schema::{
    Compilable, GroupConditional, Nullable, ObjectGroup, Optional, ParserOptions, Schema,
    SchemaExt, Transformed, TypeCheckFn, UnionConditional, VineAccepted, VineAny, VineArray,
    VineBoolean, VineDate, VineEnum, VineLiteral, VineNumber, VineObject, VineRecord, VineString,
    VineTuple, VineUnion,
};
pub use validator::{MetaValidatorFn, ValidateOptions, Validator};
pub use vine::Vine;

pub use vine_rs_compiler::{
    CompilerNode, ErrorEntry, ErrorReporter, FieldContext, MessagesProvider, ParseContext,
    RefId, RefsStore, RootNode, RuntimeError, ValidationError,
};
