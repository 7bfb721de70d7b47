//! Configuration for the [`Vine`](crate::Vine) root builder.
//!
//! [`VineConfig`] holds everything that used to be process-wide state in
//! other validation libraries: the message overrides, the display names of
//! fields, the reporter to use and the empty-string policy. A config is
//! handed to [`Vine::with_config`](crate::Vine::with_config) once and is
//! never mutated afterwards.
//!
//! # Example
//! ```rust
//! use vine_rs::VineConfig;
//!
//! let config = VineConfig::new()
//!     .with_message("required", "{{ field }} is missing")
//!     .with_message("email.email", "Enter a valid email address")
//!     .with_field_name("first_name", "first name")
//!     .with_convert_empty_strings_to_null(true);
//! assert!(config.validate().is_ok());
//! ```

use crate::messages::SimpleMessagesProvider;
use crate::reporter::SimpleErrorReporter;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use vine_rs_compiler::{ErrorReporter, ErrorReporterFactory, MessagesProvider};

/// Errors returned by [`VineConfig::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigValidationError {
    /// A message override was registered under an empty key
    EmptyMessageKey,
    /// A display name was registered under an empty field path
    EmptyFieldPath,
    /// A message template opens a `{{` placeholder it never closes
    UnclosedPlaceholder(String),
}

impl fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyMessageKey => write!(f, "message keys must not be empty"),
            Self::EmptyFieldPath => write!(f, "field name keys must not be empty"),
            Self::UnclosedPlaceholder(key) => {
                write!(f, "message '{}' has an unclosed placeholder", key)
            }
        }
    }
}

impl std::error::Error for ConfigValidationError {}

/// Settings shared by every schema compiled through one [`Vine`](crate::Vine).
///
/// # Fields
///
/// * `messages` - Message overrides keyed by rule name (`"minLength"`) or by
///   wildcard path and rule name (`"contacts.*.email.email"`). Default: empty.
///
/// * `field_names` - Display names for `{{ field }}`, keyed by wildcard path.
///   Default: empty.
///
/// * `messages_provider` - Replaces the provider built from `messages` and
///   `field_names`. Default: none.
///
/// * `error_reporter` - Builds the reporter for every pass. Default:
///   [`SimpleErrorReporter`].
///
/// * `convert_empty_strings_to_null` - Treat `""` as `null` before any rule
///   runs. Default: false.
#[derive(Clone)]
pub struct VineConfig {
    pub messages: HashMap<String, String>,
    pub field_names: HashMap<String, String>,
    pub messages_provider: Option<Arc<dyn MessagesProvider>>,
    pub error_reporter: ErrorReporterFactory,
    pub convert_empty_strings_to_null: bool,
}

impl Default for VineConfig {
    fn default() -> Self {
        Self {
            messages: HashMap::new(),
            field_names: HashMap::new(),
            messages_provider: None,
            error_reporter: Arc::new(|| {
                Box::new(SimpleErrorReporter::new()) as Box<dyn ErrorReporter>
            }),
            convert_empty_strings_to_null: false,
        }
    }
}

impl fmt::Debug for VineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VineConfig")
            .field("messages", &self.messages)
            .field("field_names", &self.field_names)
            .field("custom_messages_provider", &self.messages_provider.is_some())
            .field(
                "convert_empty_strings_to_null",
                &self.convert_empty_strings_to_null,
            )
            .finish_non_exhaustive()
    }
}

impl VineConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the configuration.
    ///
    /// Returns an error if any setting is invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.messages.keys().any(|key| key.is_empty()) {
            return Err(ConfigValidationError::EmptyMessageKey);
        }
        if self.field_names.keys().any(|key| key.is_empty()) {
            return Err(ConfigValidationError::EmptyFieldPath);
        }
        for (key, template) in &self.messages {
            if has_unclosed_placeholder(template) {
                return Err(ConfigValidationError::UnclosedPlaceholder(key.clone()));
            }
        }
        Ok(())
    }

    /// Override one message.
    #[must_use = "This method returns a new VineConfig and does not modify self"]
    pub fn with_message(mut self, key: impl Into<String>, message: impl Into<String>) -> Self {
        self.messages.insert(key.into(), message.into());
        self
    }

    /// Replace the whole message override table.
    #[must_use = "This method returns a new VineConfig and does not modify self"]
    pub fn with_messages(mut self, messages: HashMap<String, String>) -> Self {
        self.messages = messages;
        self
    }

    /// Set the display name of a field.
    #[must_use = "This method returns a new VineConfig and does not modify self"]
    pub fn with_field_name(mut self, path: impl Into<String>, name: impl Into<String>) -> Self {
        self.field_names.insert(path.into(), name.into());
        self
    }

    /// Use a custom messages provider instead of the built-in one.
    #[must_use = "This method returns a new VineConfig and does not modify self"]
    pub fn with_messages_provider(mut self, provider: Arc<dyn MessagesProvider>) -> Self {
        self.messages_provider = Some(provider);
        self
    }

    /// Use a custom error reporter for every pass.
    #[must_use = "This method returns a new VineConfig and does not modify self"]
    pub fn with_error_reporter<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> Box<dyn ErrorReporter> + Send + Sync + 'static,
    {
        self.error_reporter = Arc::new(factory);
        self
    }

    /// Enable or disable empty-string normalization.
    #[must_use = "This method returns a new VineConfig and does not modify self"]
    pub fn with_convert_empty_strings_to_null(mut self, enabled: bool) -> Self {
        self.convert_empty_strings_to_null = enabled;
        self
    }

    /// The provider passes should use: the custom one when set, otherwise a
    /// [`SimpleMessagesProvider`] over `messages` and `field_names`.
    pub fn resolve_messages_provider(&self) -> Arc<dyn MessagesProvider> {
        match &self.messages_provider {
            Some(provider) => Arc::clone(provider),
            None => Arc::new(SimpleMessagesProvider::new(
                self.messages.clone(),
                self.field_names.clone(),
            )),
        }
    }
}

fn has_unclosed_placeholder(template: &str) -> bool {
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        match rest[start + 2..].find("}}") {
            Some(end) => rest = &rest[start + 2 + end + 2..],
            None => return true,
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = VineConfig::default();
        assert!(config.validate().is_ok());
        assert!(!config.convert_empty_strings_to_null);
        assert!(!(config.error_reporter)().has_errors());
    }

    #[test]
    fn test_empty_keys_are_rejected() {
        let config = VineConfig::new().with_message("", "x");
        assert_eq!(config.validate(), Err(ConfigValidationError::EmptyMessageKey));

        let config = VineConfig::new().with_field_name("", "x");
        assert_eq!(config.validate(), Err(ConfigValidationError::EmptyFieldPath));
    }

    #[test]
    fn test_unclosed_placeholder_is_rejected() {
        let config = VineConfig::new().with_message("minLength", "at least {{ min");
        assert_eq!(
            config.validate(),
            Err(ConfigValidationError::UnclosedPlaceholder("minLength".into()))
        );
        assert!(!has_unclosed_placeholder("{{ a }} and {{ b }}"));
    }
}
