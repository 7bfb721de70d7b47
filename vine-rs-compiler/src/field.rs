//! Field context
//!
//! A [`FieldContext`] is created for every field visited during a validation
//! pass and handed to every rule attached to that field. It carries the
//! working value, where the field lives in the document, and the two
//! operations rules use to talk back to the engine: [`FieldContext::mutate`]
//! and [`FieldContext::report`].

use crate::reporter::{ErrorReporter, MessagesProvider};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::trace;

/// Reporter handle shared by every field context of one pass.
///
/// The lock is only held for the duration of a single `report` call and
/// never across an `.await`.
pub type SharedReporter = Arc<Mutex<Box<dyn ErrorReporter>>>;

/// Wrap a reporter so field contexts can share it.
pub fn share_reporter(reporter: Box<dyn ErrorReporter>) -> SharedReporter {
    Arc::new(Mutex::new(reporter))
}

/// Run `f` with exclusive access to a shared reporter.
pub fn with_reporter<T>(
    reporter: &SharedReporter,
    f: impl FnOnce(&mut dyn ErrorReporter) -> T,
) -> T {
    let mut guard = reporter.lock().unwrap_or_else(PoisonError::into_inner);
    f(guard.as_mut())
}

/// Per-pass state every field context of that pass points at.
#[derive(Clone)]
pub struct FieldScope {
    pub data: Arc<Value>,
    pub meta: Arc<Map<String, Value>>,
    pub messages: Arc<dyn MessagesProvider>,
    pub reporter: SharedReporter,
}

/// Address of a field inside the input document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldLocation {
    /// Last path segment (`"email"`, `"0"`, a record key)
    pub name: String,
    /// Dotted path with `*` for array elements (`contacts.*.type`)
    pub wildcard_path: String,
    /// Dotted path with concrete indices (`contacts.0.type`)
    pub field_path: String,
    /// Whether the field is an element of an array or tuple
    pub is_array_member: bool,
}

impl FieldLocation {
    /// Location of the root value.
    pub fn root() -> Self {
        Self::default()
    }

    /// Location of a child of this field.
    ///
    /// `name` is the concrete segment, `wildcard` the segment used in the
    /// wildcard path (`*` for array and record members).
    pub fn child(&self, name: &str, wildcard: &str, is_array_member: bool) -> Self {
        Self {
            name: name.to_string(),
            wildcard_path: join(&self.wildcard_path, wildcard),
            field_path: join(&self.field_path, name),
            is_array_member,
        }
    }
}

fn join(base: &str, segment: &str) -> String {
    if base.is_empty() {
        segment.to_string()
    } else {
        format!("{base}.{segment}")
    }
}

/// Per-field execution record.
pub struct FieldContext {
    value: Option<Value>,
    parent: Arc<Value>,
    location: FieldLocation,
    is_valid: bool,
    scope: FieldScope,
}

impl FieldContext {
    /// Create a context for one field. `None` means the value is undefined.
    pub fn new(
        value: Option<Value>,
        parent: Arc<Value>,
        location: FieldLocation,
        scope: &FieldScope,
    ) -> Self {
        Self {
            value,
            parent,
            location,
            is_valid: true,
            scope: scope.clone(),
        }
    }

    /// Current working value; `None` when undefined.
    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    /// Take the working value out of the context.
    pub fn into_value(self) -> Option<Value> {
        self.value
    }

    /// Replace the working value.
    pub fn mutate(&mut self, value: Value) {
        self.value = Some(value);
    }

    /// Make the field undefined.
    pub fn remove(&mut self) {
        self.value = None;
    }

    /// True when the value is present and not `null`.
    pub fn is_defined(&self) -> bool {
        !matches!(self.value, None | Some(Value::Null))
    }

    /// False once any rule reported on this field.
    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    pub fn name(&self) -> &str {
        &self.location.name
    }

    pub fn wildcard_path(&self) -> &str {
        &self.location.wildcard_path
    }

    pub fn field_path(&self) -> &str {
        &self.location.field_path
    }

    pub fn is_array_member(&self) -> bool {
        self.location.is_array_member
    }

    /// Element index when the field is an array member.
    pub fn index(&self) -> Option<usize> {
        if self.location.is_array_member {
            self.location.name.parse().ok()
        } else {
            None
        }
    }

    pub fn location(&self) -> &FieldLocation {
        &self.location
    }

    /// Read-only snapshot of the container holding this field.
    pub fn parent(&self) -> &Value {
        &self.parent
    }

    /// Root input document.
    pub fn data(&self) -> &Value {
        &self.scope.data
    }

    /// Metadata bag of the current pass.
    pub fn meta(&self) -> &Map<String, Value> {
        &self.scope.meta
    }

    /// Scope shared with the other fields of this pass.
    pub fn scope(&self) -> &FieldScope {
        &self.scope
    }

    /// Report a failure for this field.
    ///
    /// The message is resolved through the messages provider, recorded by
    /// the reporter, and the field is marked invalid.
    pub fn report(&mut self, message: &str, rule: &str, args: Option<Value>) {
        let resolved = self
            .scope
            .messages
            .get_message(message, rule, self, args.as_ref());

        trace!(
            field = %self.location.field_path,
            rule = %rule,
            "Field failed validation"
        );

        let this = &*self;
        with_reporter(&this.scope.reporter, |reporter| {
            reporter.report(&resolved, rule, this, args.as_ref())
        });
        self.is_valid = false;
    }
}

impl fmt::Debug for FieldContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldContext")
            .field("value", &self.value)
            .field("location", &self.location)
            .field("is_valid", &self.is_valid)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{RawMessages, VecReporter};
    use serde_json::json;

    fn scope() -> (FieldScope, SharedReporter) {
        let reporter = share_reporter(Box::new(VecReporter::default()));
        let scope = FieldScope {
            data: Arc::new(json!({})),
            meta: Arc::new(Map::new()),
            messages: Arc::new(RawMessages),
            reporter: reporter.clone(),
        };
        (scope, reporter)
    }

    #[test]
    fn test_child_locations() {
        let contacts = FieldLocation::root().child("contacts", "contacts", false);
        let first = contacts.child("0", "*", true);
        let kind = first.child("type", "type", false);
        assert_eq!(kind.wildcard_path, "contacts.*.type");
        assert_eq!(kind.field_path, "contacts.0.type");
        assert_eq!(first.name, "0");
        assert!(first.is_array_member);
    }

    #[test]
    fn test_is_defined_tracks_mutation() {
        let (scope, _) = scope();
        let mut field = FieldContext::new(None, Arc::new(json!({})), FieldLocation::root(), &scope);
        assert!(!field.is_defined());
        field.mutate(Value::Null);
        assert!(!field.is_defined());
        field.mutate(json!("x"));
        assert!(field.is_defined());
        field.remove();
        assert!(field.value().is_none());
    }

    #[test]
    fn test_report_marks_invalid_and_records_index() {
        let (scope, reporter) = scope();
        let location = FieldLocation::root()
            .child("tags", "tags", false)
            .child("2", "*", true);
        let mut field = FieldContext::new(Some(json!(1)), Arc::new(json!([])), location, &scope);
        field.report("must be a string", "string", None);
        assert!(!field.is_valid());

        let error = with_reporter(&reporter, |r| r.create_error());
        assert_eq!(error.messages[0].field, "tags.2");
        assert_eq!(error.messages[0].index, Some(2));
    }
}
