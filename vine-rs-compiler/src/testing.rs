//! Minimal reporter and provider used by unit tests.

use crate::error::{ErrorEntry, ValidationError};
use crate::field::FieldContext;
use crate::reporter::{ErrorReporter, MessagesProvider};
use serde_json::Value;

#[derive(Debug, Default)]
pub struct VecReporter {
    entries: Vec<ErrorEntry>,
}

impl ErrorReporter for VecReporter {
    fn has_errors(&self) -> bool {
        !self.entries.is_empty()
    }

    fn report(&mut self, message: &str, rule: &str, field: &FieldContext, args: Option<&Value>) {
        let mut entry = ErrorEntry::new(message, field.field_path(), rule);
        entry.index = field.index();
        entry.meta = args.cloned();
        self.entries.push(entry);
    }

    fn create_error(&mut self) -> ValidationError {
        ValidationError::new(self.entries.clone())
    }
}

/// Returns the raw message untouched.
#[derive(Debug, Default)]
pub struct RawMessages;

impl MessagesProvider for RawMessages {
    fn get_message(&self, message: &str, _: &str, _: &FieldContext, _: Option<&Value>) -> String {
        message.to_string()
    }
}
