//! Reference execution backend.
//!
//! [`Compiler`] turns a [`RootNode`] into a [`ValidateFn`] that walks the IR
//! directly for every call. It honours the full engine contract (rule order,
//! bail, implicit and async rules, unions and groups, unknown-property
//! handling) without generating code, so it doubles as the behavioural
//! reference for any other backend plugged in through [`ValidateFn`].
//!
//! # Example
//! ```rust,ignore
//! let validate = Compiler::new(root, CompilerOptions::default()).compile();
//! let output = validate(ExecutionInput { .. }).await?;
//! ```

mod containers;
mod executor;
mod union;

use crate::error::RuntimeResult;
use crate::field::SharedReporter;
use crate::ir::RootNode;
use crate::refs::RefsStore;
use crate::reporter::MessagesProvider;
use executor::Execution;
use serde_json::{Map, Value};
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Boxed future returned by a backend.
pub type ValidateFuture = Pin<Box<dyn Future<Output = RuntimeResult<Value>> + Send>>;

/// Backend boundary: executes one validation pass.
///
/// Field failures go to `input.error_reporter`; `Err` is reserved for fatal
/// conditions.
pub type ValidateFn = Arc<dyn Fn(ExecutionInput) -> ValidateFuture + Send + Sync>;

/// Everything a backend needs for one pass.
pub struct ExecutionInput {
    /// Input document
    pub data: Value,
    /// Metadata bag handed to every field
    pub meta: Map<String, Value>,
    /// Callbacks referenced from the IR
    pub refs: Arc<RefsStore>,
    pub messages_provider: Arc<dyn MessagesProvider>,
    pub error_reporter: SharedReporter,
    /// Reject async rules instead of awaiting them
    pub sync_only: bool,
}

impl fmt::Debug for ExecutionInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutionInput")
            .field("data", &self.data)
            .field("meta", &self.meta)
            .field("refs", &self.refs)
            .field("sync_only", &self.sync_only)
            .finish_non_exhaustive()
    }
}

/// Options of the reference backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompilerOptions {
    /// Treat `""` as `null` before parsing
    pub convert_empty_strings_to_null: bool,
}

/// Builds the reference backend for one compiled tree.
#[derive(Debug, Clone)]
pub struct Compiler {
    root: Arc<RootNode>,
    options: CompilerOptions,
}

impl Compiler {
    pub fn new(root: RootNode, options: CompilerOptions) -> Self {
        Self {
            root: Arc::new(root),
            options,
        }
    }

    /// Produce the validate function.
    pub fn compile(self) -> ValidateFn {
        let Self { root, options } = self;
        Arc::new(move |input: ExecutionInput| -> ValidateFuture {
            let root = Arc::clone(&root);
            Box::pin(async move {
                let execution = Execution::new(input, options);
                execution.run(&root).await
            })
        })
    }
}
