//! Compiled validators
//!
//! A [`Validator`] owns the compiled IR, the refs it points into and the
//! execution function. It is immutable and cheap to clone, so one instance
//! can serve any number of concurrent passes; every pass gets its own
//! reporter and metadata.
//!
//! # Example
//! ```rust
//! use serde_json::json;
//! use vine_rs::{ValidateOptions, Vine};
//!
//! # futures::executor::block_on(async {
//! let vine = Vine::new();
//! let validator = vine.compile(&vine.object().property("name", vine.string()));
//!
//! let output = validator
//!     .validate(json!({"name": "virk", "extra": true}))
//!     .await
//!     .unwrap();
//! assert_eq!(output["name"], "virk");
//! assert!(output.get("extra").is_none());
//!
//! let failed = validator
//!     .try_validate(json!({}), ValidateOptions::default())
//!     .await
//!     .unwrap()
//!     .unwrap_err();
//! assert_eq!(failed.messages[0].rule, "required");
//! # });
//! ```

use crate::config::VineConfig;
use crate::error::{VineError, VineResult};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::debug;
use vine_rs_compiler::{
    ErrorReporter, ErrorReporterFactory, ExecutionInput, MessagesProvider, RefsStore, RootNode,
    ValidateFn, ValidationError, share_reporter, with_reporter,
};

/// Checks the metadata bag before a pass starts.
pub type MetaValidatorFn = Arc<dyn Fn(&Map<String, Value>) -> Result<(), String> + Send + Sync>;

// ============================================================================
// Per-pass Options
// ============================================================================

/// Options of one validation pass.
#[derive(Clone, Default)]
pub struct ValidateOptions {
    /// Metadata bag visible to every rule. Default: empty.
    pub meta: Map<String, Value>,
    /// Overrides the configured provider for this pass.
    pub messages_provider: Option<Arc<dyn MessagesProvider>>,
    /// Overrides the configured reporter for this pass.
    pub error_reporter: Option<ErrorReporterFactory>,
}

impl ValidateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the metadata bag.
    #[must_use = "This method returns a new ValidateOptions and does not modify self"]
    pub fn with_meta(mut self, meta: Map<String, Value>) -> Self {
        self.meta = meta;
        self
    }

    /// Add one metadata entry.
    #[must_use = "This method returns a new ValidateOptions and does not modify self"]
    pub fn with_meta_value(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.meta.insert(key.into(), value.into());
        self
    }

    #[must_use = "This method returns a new ValidateOptions and does not modify self"]
    pub fn with_messages_provider(mut self, provider: Arc<dyn MessagesProvider>) -> Self {
        self.messages_provider = Some(provider);
        self
    }

    #[must_use = "This method returns a new ValidateOptions and does not modify self"]
    pub fn with_error_reporter<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> Box<dyn ErrorReporter> + Send + Sync + 'static,
    {
        self.error_reporter = Some(Arc::new(factory));
        self
    }
}

impl fmt::Debug for ValidateOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidateOptions")
            .field("meta", &self.meta)
            .field("custom_messages_provider", &self.messages_provider.is_some())
            .field("custom_error_reporter", &self.error_reporter.is_some())
            .finish()
    }
}

// ============================================================================
// Validator
// ============================================================================

/// A compiled schema. `O` is the typed output of a successful pass.
pub struct Validator<O> {
    root: Arc<RootNode>,
    refs: Arc<RefsStore>,
    validate_fn: ValidateFn,
    config: Arc<VineConfig>,
    messages_provider: Arc<dyn MessagesProvider>,
    meta_validator: Option<MetaValidatorFn>,
    _output: PhantomData<fn() -> O>,
}

impl<O> Clone for Validator<O> {
    fn clone(&self) -> Self {
        Self {
            root: Arc::clone(&self.root),
            refs: Arc::clone(&self.refs),
            validate_fn: Arc::clone(&self.validate_fn),
            config: Arc::clone(&self.config),
            messages_provider: Arc::clone(&self.messages_provider),
            meta_validator: self.meta_validator.clone(),
            _output: PhantomData,
        }
    }
}

impl<O> fmt::Debug for Validator<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator")
            .field("root", &self.root.schema.node_type())
            .field("refs", &self.refs.len())
            .field("meta_validator", &self.meta_validator.is_some())
            .finish_non_exhaustive()
    }
}

impl<O: DeserializeOwned> Validator<O> {
    /// Assemble a validator from compiled parts.
    pub fn from_parts(
        root: RootNode,
        refs: RefsStore,
        validate_fn: ValidateFn,
        config: Arc<VineConfig>,
    ) -> Self {
        let messages_provider = config.resolve_messages_provider();
        Self {
            root: Arc::new(root),
            refs: Arc::new(refs),
            validate_fn,
            config,
            messages_provider,
            meta_validator: None,
            _output: PhantomData,
        }
    }

    /// Reject passes whose metadata bag fails `check`.
    #[must_use = "This method returns a new Validator and does not modify self"]
    pub fn with_meta_validator<F>(mut self, check: F) -> Self
    where
        F: Fn(&Map<String, Value>) -> Result<(), String> + Send + Sync + 'static,
    {
        self.meta_validator = Some(Arc::new(check));
        self
    }

    /// The compiled tree.
    pub fn root(&self) -> &RootNode {
        &self.root
    }

    /// Callbacks the tree refers to.
    pub fn refs(&self) -> &RefsStore {
        &self.refs
    }

    /// JSON form of the compiled tree.
    pub fn to_json(&self) -> VineResult<Value> {
        self.root.to_json().map_err(VineError::Output)
    }

    /// Validate `data`, failing with [`VineError::Validation`] when any
    /// field is invalid.
    pub async fn validate(&self, data: Value) -> VineResult<O> {
        self.validate_with(data, ValidateOptions::default()).await
    }

    /// [`validate`](Self::validate) with per-pass options.
    pub async fn validate_with(&self, data: Value, options: ValidateOptions) -> VineResult<O> {
        Ok(self.try_validate(data, options).await??)
    }

    /// Validate `data`, returning field failures as a value.
    ///
    /// The outer result carries fatal errors only.
    pub async fn try_validate(
        &self,
        data: Value,
        options: ValidateOptions,
    ) -> VineResult<Result<O, ValidationError>> {
        self.execute(data, options, false).await
    }

    /// Validate on the current thread. Fails with a runtime error when the
    /// schema uses an async rule.
    pub fn validate_sync(&self, data: Value) -> VineResult<O> {
        Ok(self.try_validate_sync(data, ValidateOptions::default())??)
    }

    pub fn try_validate_sync(
        &self,
        data: Value,
        options: ValidateOptions,
    ) -> VineResult<Result<O, ValidationError>> {
        futures::executor::block_on(self.execute(data, options, true))
    }

    async fn execute(
        &self,
        data: Value,
        options: ValidateOptions,
        sync_only: bool,
    ) -> VineResult<Result<O, ValidationError>> {
        let ValidateOptions {
            meta,
            messages_provider,
            error_reporter,
        } = options;

        if let Some(check) = &self.meta_validator {
            check(&meta).map_err(VineError::InvalidMetadata)?;
        }

        let reporter = match error_reporter {
            Some(factory) => factory(),
            None => (self.config.error_reporter)(),
        };
        let reporter = share_reporter(reporter);

        let input = ExecutionInput {
            data,
            meta,
            refs: Arc::clone(&self.refs),
            messages_provider: messages_provider
                .unwrap_or_else(|| Arc::clone(&self.messages_provider)),
            error_reporter: Arc::clone(&reporter),
            sync_only,
        };
        let output = (self.validate_fn)(input).await?;

        let failure = with_reporter(&reporter, |reporter| {
            reporter.has_errors().then(|| reporter.create_error())
        });
        if let Some(error) = failure {
            let fields = error.fields();
            debug!(
                error_count = error.len(),
                fields = ?fields,
                "Validation failed"
            );
            return Ok(Err(error));
        }

        let output = serde_json::from_value(output).map_err(VineError::Output)?;
        Ok(Ok(output))
    }
}
