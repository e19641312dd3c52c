//! Error types for the semantic core
//!
//! Every failure in this crate is terminal for the current evaluation step
//! and is handed back to the caller, which maps it onto its own abrupt
//! completion mechanism.

use thiserror::Error;

/// Main error type for the engine
#[derive(Debug, Clone, PartialEq, Error)]
pub enum JsError {
    #[error("TypeError: {message}")]
    TypeError { message: String },

    #[error("ReferenceError: {name}")]
    ReferenceError { name: String },

    #[error("RangeError: {message}")]
    RangeError { message: String },

    /// Broken engine invariant (cyclic prototype chain, runaway scope chain).
    /// Never mapped onto a language-level error kind.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl JsError {
    pub fn type_error(message: impl Into<String>) -> Self {
        JsError::TypeError {
            message: message.into(),
        }
    }

    /// `ReferenceError: <name> is not defined`
    pub fn reference_error(name: impl Into<String>) -> Self {
        JsError::ReferenceError {
            name: format!("{} is not defined", name.into()),
        }
    }

    pub fn reference_error_with_message(
        name: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        JsError::ReferenceError {
            name: format!("'{}': {}", name.into(), message.into()),
        }
    }

    pub fn range_error(message: impl Into<String>) -> Self {
        JsError::RangeError {
            message: message.into(),
        }
    }

    /// Create an internal error for broken engine invariants.
    /// These should never happen with well-formed object graphs.
    pub fn internal_error(message: impl Into<String>) -> Self {
        JsError::Internal(message.into())
    }

    /// Name of the error constructor the exception layer should use
    pub fn kind(&self) -> &'static str {
        match self {
            JsError::TypeError { .. } => "TypeError",
            JsError::ReferenceError { .. } => "ReferenceError",
            JsError::RangeError { .. } => "RangeError",
            JsError::Internal(_) => "InternalError",
        }
    }

    pub fn is_type_error(&self) -> bool {
        matches!(self, JsError::TypeError { .. })
    }

    pub fn is_reference_error(&self) -> bool {
        matches!(self, JsError::ReferenceError { .. })
    }

    pub fn is_internal(&self) -> bool {
        matches!(self, JsError::Internal(_))
    }
}
