//! Error types for validation runs
//!
//! Two families of failure exist during a run:
//!
//! - **Field failures** are expected. They are collected by an
//!   [`ErrorReporter`](crate::ErrorReporter) as [`ErrorEntry`] values and
//!   surface together as one [`ValidationError`] at the end of the pass.
//! - **Fatal failures** ([`RuntimeError`]) mean the schema or a rule was
//!   misused. They abort the pass immediately and never reach the reporter.
//!
//! # Example
//! ```rust
//! use vine_rs_compiler::{ErrorEntry, ValidationError};
//!
//! let error = ValidationError::new(vec![
//!     ErrorEntry::new("The username field must be a string", "username", "string"),
//! ]);
//! assert_eq!(error.code, ValidationError::CODE);
//! assert_eq!(error.status, 422);
//! ```

use crate::refs::RefId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Result type alias for fatal runtime failures.
pub type RuntimeResult<T> = Result<T, RuntimeError>;

/// Fatal error raised while executing a compiled schema.
///
/// These indicate programmer errors (bad refs, rule misuse), not invalid
/// input. They propagate out of the backend and abort the run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum RuntimeError {
    /// The IR points at a ref id that was never tracked.
    #[error("No ref is registered under id {0}")]
    MissingRef(RefId),

    /// The IR points at a ref of the wrong kind.
    #[error("Ref {id} is a {found}, expected a {expected}")]
    RefKindMismatch {
        id: RefId,
        expected: &'static str,
        found: &'static str,
    },

    /// A rule received options it cannot interpret.
    #[error("Rule '{rule}' received options of an unexpected type")]
    InvalidRuleOptions { rule: String },

    /// A rule was applied in a way it does not support.
    #[error("Invalid use of rule '{rule}': {message}")]
    InvalidRuleUsage { rule: String, message: String },

    /// An async rule was reached through a synchronous entry point.
    #[error("Rule '{rule}' is async and cannot run through a synchronous validation entry point")]
    AsyncRuleInSyncMode { rule: String },
}

impl RuntimeError {
    /// Create an [`RuntimeError::InvalidRuleUsage`] error.
    pub fn invalid_usage(rule: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidRuleUsage {
            rule: rule.into(),
            message: message.into(),
        }
    }
}

/// A single field failure.
///
/// Produced only through [`FieldContext::report`](crate::FieldContext::report)
/// and immutable once recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorEntry {
    /// Resolved, human-readable message
    pub message: String,
    /// Concrete field path (array indices included)
    pub field: String,
    /// Name of the rule that failed
    pub rule: String,
    /// Element index when the field is an array member
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    /// Structured arguments the rule reported with
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Value>,
}

impl ErrorEntry {
    /// Create a new entry without index or meta.
    pub fn new(
        message: impl Into<String>,
        field: impl Into<String>,
        rule: impl Into<String>,
    ) -> Self {
        Self {
            message: message.into(),
            field: field.into(),
            rule: rule.into(),
            index: None,
            meta: None,
        }
    }

    /// Set the array index.
    pub fn with_index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    /// Set the structured meta.
    pub fn with_meta(mut self, meta: serde_json::Value) -> Self {
        self.meta = Some(meta);
        self
    }
}

/// Aggregate error raised when a validation pass recorded field failures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
#[error("Validation failure")]
pub struct ValidationError {
    /// Machine-readable error code
    pub code: String,
    /// HTTP-style status hint
    pub status: u16,
    /// Field failures in arrival order
    pub messages: Vec<ErrorEntry>,
}

impl ValidationError {
    /// Error code carried by every validation error.
    pub const CODE: &'static str = "E_VALIDATION_ERROR";

    /// Create a validation error from collected entries.
    pub fn new(messages: Vec<ErrorEntry>) -> Self {
        Self {
            code: Self::CODE.to_string(),
            status: 422,
            messages,
        }
    }

    /// Number of recorded failures.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether no failure was recorded.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Field paths in arrival order (duplicates kept).
    pub fn fields(&self) -> Vec<&str> {
        self.messages.iter().map(|e| e.field.as_str()).collect()
    }

    /// Group entries by field path for easier lookup
    pub fn errors_by_field(&self) -> HashMap<String, Vec<&ErrorEntry>> {
        let mut map: HashMap<String, Vec<&ErrorEntry>> = HashMap::new();
        for entry in &self.messages {
            map.entry(entry.field.clone()).or_default().push(entry);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_entry_skips_empty_optionals_when_serialized() {
        let entry = ErrorEntry::new("bad", "name", "string");
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value, json!({"message": "bad", "field": "name", "rule": "string"}));

        let entry = entry.with_index(2).with_meta(json!({"min": 3}));
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["index"], json!(2));
        assert_eq!(value["meta"]["min"], json!(3));
    }

    #[test]
    fn test_errors_by_field_groups_in_order() {
        let error = ValidationError::new(vec![
            ErrorEntry::new("a", "tags.0", "string"),
            ErrorEntry::new("b", "name", "required"),
            ErrorEntry::new("c", "tags.0", "min_length"),
        ]);
        let grouped = error.errors_by_field();
        assert_eq!(grouped["tags.0"].len(), 2);
        assert_eq!(grouped["tags.0"][1].rule, "min_length");
        assert_eq!(error.fields(), vec!["tags.0", "name", "tags.0"]);
    }

    #[test]
    fn test_runtime_error_messages() {
        let err = RuntimeError::invalid_usage("after", "expected a date");
        assert_eq!(err.to_string(), "Invalid use of rule 'after': expected a date");
        let err = RuntimeError::MissingRef(RefId::new(7));
        assert_eq!(err.to_string(), "No ref is registered under id 7");
    }
}
