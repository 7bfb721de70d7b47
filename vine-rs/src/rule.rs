//! Rule units
//!
//! A rule is a validator function plus two flags: whether it is async and
//! whether it is implicit (runs on undefined fields). [`create_rule`] and
//! [`create_async_rule`] wrap a typed validator into a [`RuleFactory`];
//! calling the factory with options yields a [`Validation`] that can be
//! attached to any schema with `use_rule`.
//!
//! # Example
//! ```rust
//! use vine_rs::{create_rule, RuleMetadata, Vine};
//! use serde_json::json;
//!
//! let multiple_of = create_rule(
//!     "multipleOf",
//!     |divisor: &i64, field| {
//!         if let Some(n) = field.value().and_then(|v| v.as_i64()) {
//!             if n % divisor != 0 {
//!                 field.report(
//!                     "The {{ field }} field must be a multiple of {{ divisor }}",
//!                     "multipleOf",
//!                     Some(json!({ "divisor": divisor })),
//!                 );
//!             }
//!         }
//!         Ok(())
//!     },
//!     RuleMetadata::default(),
//! );
//!
//! let vine = Vine::new();
//! let schema = vine.number().use_rule(multiple_of.call(5));
//! # let _ = schema;
//! ```

use futures::FutureExt;
use futures::future::BoxFuture;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use vine_rs_compiler::{FieldContext, Rule, RuleFn, RuntimeError, RuntimeResult, ValidationRef};

/// A rule applied with one set of options.
pub type Validation = ValidationRef;

/// Flags of a rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RuleMetadata {
    /// Overrides the async flag derived from the constructor
    pub is_async: Option<bool>,
    /// Run the rule even when the field is undefined
    pub implicit: bool,
}

impl RuleMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the rule implicit.
    #[must_use = "This method returns a new RuleMetadata and does not modify self"]
    pub fn implicit(mut self) -> Self {
        self.implicit = true;
        self
    }

    /// Force the async flag.
    #[must_use = "This method returns a new RuleMetadata and does not modify self"]
    pub fn with_async(mut self, is_async: bool) -> Self {
        self.is_async = Some(is_async);
        self
    }
}

/// Builds [`Validation`]s for one rule. `O` is the options type.
pub struct RuleFactory<O> {
    rule: Arc<Rule>,
    _options: PhantomData<fn(O)>,
}

impl<O> Clone for RuleFactory<O> {
    fn clone(&self) -> Self {
        Self {
            rule: Arc::clone(&self.rule),
            _options: PhantomData,
        }
    }
}

impl<O> fmt::Debug for RuleFactory<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RuleFactory").field(&self.rule).finish()
    }
}

impl<O: Send + Sync + 'static> RuleFactory<O> {
    /// Apply the rule with `options`.
    pub fn call(&self, options: O) -> Validation {
        Validation {
            rule: Arc::clone(&self.rule),
            options: Arc::new(options),
        }
    }

    /// The underlying rule unit.
    pub fn rule(&self) -> &Arc<Rule> {
        &self.rule
    }

    pub fn name(&self) -> &str {
        &self.rule.name
    }

    pub fn is_async(&self) -> bool {
        self.rule.is_async
    }

    pub fn is_implicit(&self) -> bool {
        self.rule.implicit
    }
}

impl RuleFactory<()> {
    /// Apply a rule that takes no options.
    pub fn build(&self) -> Validation {
        self.call(())
    }
}

fn options_error(rule: &str) -> RuntimeError {
    RuntimeError::InvalidRuleOptions {
        rule: rule.to_string(),
    }
}

/// Create a synchronous rule.
pub fn create_rule<O, F>(
    name: impl Into<String>,
    validator: F,
    metadata: RuleMetadata,
) -> RuleFactory<O>
where
    O: Send + Sync + 'static,
    F: Fn(&O, &mut FieldContext) -> RuntimeResult<()> + Send + Sync + 'static,
{
    let name = name.into();
    let rule_name = name.clone();
    let validator = RuleFn::from_sync(move |options, field| {
        let options = options
            .downcast_ref::<O>()
            .ok_or_else(|| options_error(&rule_name))?;
        validator(options, field)
    });

    RuleFactory {
        rule: Arc::new(Rule {
            name,
            validator,
            is_async: metadata.is_async.unwrap_or(false),
            implicit: metadata.implicit,
        }),
        _options: PhantomData,
    }
}

/// Create an asynchronous rule. The validator returns a boxed future that may
/// borrow its options and the field.
///
/// # Example
/// ```rust
/// use futures::FutureExt;
/// use vine_rs::{create_async_rule, RuleMetadata};
///
/// let unique = create_async_rule(
///     "unique",
///     |table: &String, field| {
///         async move {
///             let taken = field.value().and_then(|v| v.as_str()) == Some("taken");
///             if taken {
///                 field.report("The {{ field }} is already in use", "unique", None);
///             }
///             let _ = table;
///             Ok(())
///         }
///         .boxed()
///     },
///     RuleMetadata::default(),
/// );
/// assert!(unique.is_async());
/// ```
pub fn create_async_rule<O, F>(
    name: impl Into<String>,
    validator: F,
    metadata: RuleMetadata,
) -> RuleFactory<O>
where
    O: Send + Sync + 'static,
    F: for<'a> Fn(&'a O, &'a mut FieldContext) -> BoxFuture<'a, RuntimeResult<()>>
        + Send
        + Sync
        + 'static,
{
    let name = name.into();
    let rule_name = name.clone();
    let validator = RuleFn::from_async(move |options, field| match options.downcast_ref::<O>() {
        Some(options) => validator(options, field),
        None => futures::future::ready(Err(options_error(&rule_name))).boxed(),
    });

    RuleFactory {
        rule: Arc::new(Rule {
            name,
            validator,
            is_async: metadata.is_async.unwrap_or(true),
            implicit: metadata.implicit,
        }),
        _options: PhantomData,
    }
}
