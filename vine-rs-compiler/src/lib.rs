//! # vine-rs-compiler
//!
//! The data half of vine-rs: a serializable IR for validation schemas, the
//! side table of callbacks it points into, and the runtime contract every
//! execution backend follows.
//!
//! - [`ir`]: tagged [`CompilerNode`] tree, free of callbacks
//! - [`refs`]: append-only [`RefsStore`] resolving [`RefId`]s to callbacks
//! - [`field`]: the per-field [`FieldContext`] handed to every rule
//! - [`reporter`]: [`ErrorReporter`] / [`MessagesProvider`] contracts
//! - [`compiler`]: the reference interpreter backend behind [`ValidateFn`]
//!
//! Schema builders live in the `vine-rs` crate; this crate only knows about
//! the compiled form.

pub mod compiler;
pub mod error;
pub mod field;
pub mod ir;
pub mod messages;
pub mod refs;
pub mod reporter;

#[cfg(test)]
mod testing;

pub use compiler::{Compiler, CompilerOptions, ExecutionInput, ValidateFn, ValidateFuture};
pub use error::{ErrorEntry, RuntimeError, RuntimeResult, ValidationError};
pub use field::{
    FieldContext, FieldLocation, FieldScope, SharedReporter, share_reporter, with_reporter,
};
pub use ir::{
    ArrayNode, CompilerNode, ConditionNode, FieldNode, GroupConditionNode, GroupNode,
    LiteralNode, ObjectNode, RecordNode, RootNode, SubObjectNode, TupleNode, UnionNode,
    ValidationNode,
};
pub use refs::{
    AsyncRuleFn, ConditionalFn, OtherwiseFn, ParseContext, ParseFn, PredicateFn, RefEntry, RefId,
    RefsStore, Rule, RuleFn, RuleOptions, SyncRuleFn, TransformFn, ValidationRef, parse_fn,
    transform_fn,
};
pub use reporter::{ErrorReporter, ErrorReporterFactory, MessagesProvider};
