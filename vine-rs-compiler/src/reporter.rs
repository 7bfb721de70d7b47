//! Error reporter and messages provider contracts.
//!
//! Backends never build error entries themselves. Field failures go through
//! [`FieldContext::report`](crate::FieldContext::report), which resolves the
//! message with a [`MessagesProvider`] and hands the result to the pass's
//! [`ErrorReporter`].

use crate::error::ValidationError;
use crate::field::FieldContext;
use serde_json::Value;

/// Collects field failures for one validation pass.
pub trait ErrorReporter: Send {
    /// Whether anything was reported.
    fn has_errors(&self) -> bool;

    /// Record a failure. `message` is already resolved.
    fn report(&mut self, message: &str, rule: &str, field: &FieldContext, args: Option<&Value>);

    /// Build the aggregate error from everything reported so far.
    fn create_error(&mut self) -> ValidationError;
}

/// Resolves the final text of a failure message.
pub trait MessagesProvider: Send + Sync {
    /// `message` is the raw fallback text supplied by the rule.
    fn get_message(
        &self,
        message: &str,
        rule: &str,
        field: &FieldContext,
        args: Option<&Value>,
    ) -> String;
}

/// Builds a fresh reporter for every pass.
pub type ErrorReporterFactory = std::sync::Arc<dyn Fn() -> Box<dyn ErrorReporter> + Send + Sync>;
