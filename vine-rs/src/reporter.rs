//! Default error reporter.

use serde_json::Value;
use vine_rs_compiler::{ErrorEntry, ErrorReporter, FieldContext, ValidationError};

/// Collects every reported failure in arrival order.
///
/// `index` is filled in for array members and `meta` carries the rule's
/// arguments.
#[derive(Debug, Default)]
pub struct SimpleErrorReporter {
    has_errors: bool,
    errors: Vec<ErrorEntry>,
}

impl SimpleErrorReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries recorded so far.
    pub fn errors(&self) -> &[ErrorEntry] {
        &self.errors
    }
}

impl ErrorReporter for SimpleErrorReporter {
    fn has_errors(&self) -> bool {
        self.has_errors
    }

    fn report(&mut self, message: &str, rule: &str, field: &FieldContext, args: Option<&Value>) {
        self.has_errors = true;

        let mut entry = ErrorEntry::new(message, field.field_path(), rule);
        if let Some(index) = field.index() {
            entry = entry.with_index(index);
        }
        if let Some(args) = args {
            entry = entry.with_meta(args.clone());
        }
        self.errors.push(entry);
    }

    fn create_error(&mut self) -> ValidationError {
        ValidationError::new(self.errors.clone())
    }
}
