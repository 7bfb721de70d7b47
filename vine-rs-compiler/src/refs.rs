//! Refs store
//!
//! The IR never holds callbacks. Every validator, parser, transformer and
//! conditional attached to a schema is pushed into a [`RefsStore`] while the
//! schema compiles, and the IR keeps only the returned [`RefId`]. Backends
//! resolve ids back to callbacks through the store at execution time.
//!
//! The store is append-only: ids are dense, start at zero, and are never
//! reused. Once compilation finishes the store is frozen behind an `Arc` and
//! shared read-only by every validation run.

use crate::error::{RuntimeError, RuntimeResult};
use crate::field::FieldContext;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Integer handle of a tracked callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RefId(u32);

impl RefId {
    /// Create an id from its raw value.
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Raw integer value.
    pub fn get(self) -> u32 {
        self.0
    }

    fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for RefId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Callback types
// =============================================================================

/// Type-erased rule options.
pub type RuleOptions = dyn Any + Send + Sync;

/// Synchronous rule body.
pub type SyncRuleFn =
    Arc<dyn Fn(&RuleOptions, &mut FieldContext) -> RuntimeResult<()> + Send + Sync>;

/// Asynchronous rule body. The returned future may borrow the options and
/// the field context.
pub type AsyncRuleFn = Arc<
    dyn for<'a> Fn(&'a RuleOptions, &'a mut FieldContext) -> BoxFuture<'a, RuntimeResult<()>>
        + Send
        + Sync,
>;

/// Context handed to parse callbacks.
#[derive(Debug, Clone, Copy)]
pub struct ParseContext<'a> {
    /// Root input document
    pub data: &'a Value,
    /// Container of the field being parsed
    pub parent: &'a Value,
    /// Metadata bag of the current run
    pub meta: &'a Map<String, Value>,
}

/// Pre-validation parser. Receives the raw value (`None` when undefined).
pub type ParseFn = Arc<dyn Fn(Option<Value>, &ParseContext<'_>) -> Option<Value> + Send + Sync>;

/// Post-validation value mapper.
pub type TransformFn = Arc<dyn Fn(Value, &FieldContext) -> Value + Send + Sync>;

/// Union / group predicate.
pub type PredicateFn = Arc<dyn Fn(&Value, &FieldContext) -> bool + Send + Sync>;

/// Callback run when no union / group predicate matched.
pub type OtherwiseFn = Arc<dyn Fn(&Value, &mut FieldContext) + Send + Sync>;

/// Body of a rule unit.
#[derive(Clone)]
pub enum RuleFn {
    /// Runs to completion before returning.
    Sync(SyncRuleFn),
    /// Must be awaited before the next rule of the field runs.
    Async(AsyncRuleFn),
}

impl RuleFn {
    /// Wrap a synchronous validator.
    pub fn from_sync<F>(validator: F) -> Self
    where
        F: Fn(&RuleOptions, &mut FieldContext) -> RuntimeResult<()> + Send + Sync + 'static,
    {
        Self::Sync(Arc::new(validator))
    }

    /// Wrap an asynchronous validator.
    pub fn from_async<F>(validator: F) -> Self
    where
        F: for<'a> Fn(&'a RuleOptions, &'a mut FieldContext) -> BoxFuture<'a, RuntimeResult<()>>
            + Send
            + Sync
            + 'static,
    {
        Self::Async(Arc::new(validator))
    }
}

/// Wrap a parse callback.
pub fn parse_fn<F>(f: F) -> ParseFn
where
    F: Fn(Option<Value>, &ParseContext<'_>) -> Option<Value> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Wrap a transform callback.
pub fn transform_fn<F>(f: F) -> TransformFn
where
    F: Fn(Value, &FieldContext) -> Value + Send + Sync + 'static,
{
    Arc::new(f)
}

/// A validator function plus its metadata.
#[derive(Clone)]
pub struct Rule {
    /// Rule name, used for tracing and fatal errors
    pub name: String,
    /// The validator body
    pub validator: RuleFn,
    /// Whether the rule is flagged async in the IR
    pub is_async: bool,
    /// Whether the rule runs on undefined fields
    pub implicit: bool,
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("is_async", &self.is_async)
            .field("implicit", &self.implicit)
            .finish_non_exhaustive()
    }
}

/// A rule paired with the options of one use.
#[derive(Clone)]
pub struct ValidationRef {
    /// The rule unit
    pub rule: Arc<Rule>,
    /// Options for this use of the rule
    pub options: Arc<RuleOptions>,
}

impl fmt::Debug for ValidationRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ValidationRef").field(&self.rule).finish()
    }
}

/// Conditional callbacks share one channel.
#[derive(Clone)]
pub enum ConditionalFn {
    /// Selects a union branch or a group.
    Predicate(PredicateFn),
    /// Fallback when nothing matched.
    Otherwise(OtherwiseFn),
}

impl ConditionalFn {
    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&Value, &FieldContext) -> bool + Send + Sync + 'static,
    {
        Self::Predicate(Arc::new(f))
    }

    pub fn otherwise<F>(f: F) -> Self
    where
        F: Fn(&Value, &mut FieldContext) + Send + Sync + 'static,
    {
        Self::Otherwise(Arc::new(f))
    }
}

/// One tracked callback.
#[derive(Clone)]
pub enum RefEntry {
    /// Rule validator + options
    Validation(ValidationRef),
    /// Parse callback
    Parser(ParseFn),
    /// Transform callback
    Transformer(TransformFn),
    /// Predicate or otherwise callback
    Conditional(ConditionalFn),
}

impl RefEntry {
    /// Human-readable kind, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::Parser(_) => "parser",
            Self::Transformer(_) => "transformer",
            Self::Conditional(ConditionalFn::Predicate(_)) => "predicate",
            Self::Conditional(ConditionalFn::Otherwise(_)) => "otherwise",
        }
    }
}

// =============================================================================
// Store
// =============================================================================

/// Append-only side table of callbacks referenced from the IR.
#[derive(Clone, Default)]
pub struct RefsStore {
    entries: Vec<RefEntry>,
}

impl RefsStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append any entry and return its id.
    pub fn track(&mut self, entry: RefEntry) -> RefId {
        let id = RefId(self.entries.len() as u32);
        self.entries.push(entry);
        id
    }

    /// Track a rule validator and its options.
    pub fn track_validation(&mut self, validation: ValidationRef) -> RefId {
        self.track(RefEntry::Validation(validation))
    }

    /// Track a parse callback.
    pub fn track_parser(&mut self, parser: ParseFn) -> RefId {
        self.track(RefEntry::Parser(parser))
    }

    /// Track a transform callback.
    pub fn track_transformer(&mut self, transformer: TransformFn) -> RefId {
        self.track(RefEntry::Transformer(transformer))
    }

    /// Track a predicate or otherwise callback.
    pub fn track_conditional(&mut self, conditional: ConditionalFn) -> RefId {
        self.track(RefEntry::Conditional(conditional))
    }

    /// Number of tracked entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing was tracked.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up an entry.
    pub fn get(&self, id: RefId) -> RuntimeResult<&RefEntry> {
        self.entries
            .get(id.index())
            .ok_or(RuntimeError::MissingRef(id))
    }

    /// Iterate over `(id, entry)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (RefId, &RefEntry)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, entry)| (RefId(i as u32), entry))
    }

    /// Count entries of one kind (see [`RefEntry::kind`]).
    pub fn count_of(&self, kind: &str) -> usize {
        self.entries.iter().filter(|e| e.kind() == kind).count()
    }

    /// Resolve a validation entry.
    pub fn validation(&self, id: RefId) -> RuntimeResult<&ValidationRef> {
        match self.get(id)? {
            RefEntry::Validation(v) => Ok(v),
            other => Err(mismatch(id, "validation", other)),
        }
    }

    /// Resolve a parse callback.
    pub fn parser(&self, id: RefId) -> RuntimeResult<&ParseFn> {
        match self.get(id)? {
            RefEntry::Parser(p) => Ok(p),
            other => Err(mismatch(id, "parser", other)),
        }
    }

    /// Resolve a transform callback.
    pub fn transformer(&self, id: RefId) -> RuntimeResult<&TransformFn> {
        match self.get(id)? {
            RefEntry::Transformer(t) => Ok(t),
            other => Err(mismatch(id, "transformer", other)),
        }
    }

    /// Resolve a predicate.
    pub fn predicate(&self, id: RefId) -> RuntimeResult<&PredicateFn> {
        match self.get(id)? {
            RefEntry::Conditional(ConditionalFn::Predicate(p)) => Ok(p),
            other => Err(mismatch(id, "predicate", other)),
        }
    }

    /// Resolve an otherwise callback.
    pub fn otherwise(&self, id: RefId) -> RuntimeResult<&OtherwiseFn> {
        match self.get(id)? {
            RefEntry::Conditional(ConditionalFn::Otherwise(o)) => Ok(o),
            other => Err(mismatch(id, "otherwise", other)),
        }
    }
}

fn mismatch(id: RefId, expected: &'static str, found: &RefEntry) -> RuntimeError {
    RuntimeError::RefKindMismatch {
        id,
        expected,
        found: found.kind(),
    }
}

impl fmt::Debug for RefsStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(RefEntry::kind))
            .finish()
    }
}
