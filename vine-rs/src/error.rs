//! Error types for vine-rs
//!
//! [`VineError`] is what the validator facade returns. Field failures arrive
//! as [`VineError::Validation`]; every other variant is fatal and means the
//! pass could not run to completion.
//!
//! # Example
//! ```rust,ignore
//! match validator.validate(data, ValidateOptions::default()).await {
//!     Ok(output) => println!("{output:?}"),
//!     Err(VineError::Validation(error)) => println!("{:?}", error.messages),
//!     Err(fatal) => return Err(fatal.into()),
//! }
//! ```

use crate::config::ConfigValidationError;
use thiserror::Error;
use vine_rs_compiler::{RuntimeError, ValidationError};

/// Result type alias for facade operations.
pub type VineResult<T> = Result<T, VineError>;

/// Error returned by [`Validator`](crate::Validator) and [`Vine`](crate::Vine).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum VineError {
    /// One or more fields failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A rule or ref was misused; the pass was aborted.
    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    /// The metadata validator rejected the metadata bag.
    #[error("Invalid validation metadata: {0}")]
    InvalidMetadata(String),

    /// The validated output does not fit the declared output type.
    #[error("Validated output does not match the declared type: {0}")]
    Output(#[source] serde_json::Error),

    /// The configuration handed to [`Vine`](crate::Vine) is invalid.
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigValidationError),
}

impl VineError {
    /// Whether this is a field validation failure rather than a fatal error.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// The validation error, when this is one.
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            Self::Validation(error) => Some(error),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vine_rs_compiler::ErrorEntry;

    #[test]
    fn test_validation_errors_are_not_fatal() {
        let error: VineError =
            ValidationError::new(vec![ErrorEntry::new("bad", "name", "string")]).into();
        assert!(error.is_validation());
        assert_eq!(error.as_validation().map(|e| e.len()), Some(1));
        assert_eq!(error.to_string(), "Validation failure");
    }

    #[test]
    fn test_runtime_errors_are_fatal() {
        let error: VineError = RuntimeError::invalid_usage("after", "bad date").into();
        assert!(!error.is_validation());
        assert!(error.as_validation().is_none());
    }
}
