//! Unified error handling for Weft Core.
//!
//! This module provides a unified error type that wraps domain and application
//! errors, with rich context and user-actionable suggestions.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

/// Root error type for Weft Core operations.
#[derive(Debug, Error, Clone)]
pub enum WeftError {
    /// Errors from the domain layer (spec, graph, mapping, emission rules).
    #[error("{0}")]
    Domain(#[from] DomainError),

    /// A domain error raised while generating one spec through one treadle.
    #[error("{spec} via {treadle}: {source}")]
    Generation {
        spec: String,
        treadle: String,
        #[source]
        source: DomainError,
    },

    /// Errors from the application layer (orchestration failures).
    #[error("{0}")]
    Application(#[from] ApplicationError),

    /// Configuration or setup errors.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Unexpected internal errors (bugs).
    #[error("Internal error: {message}. This is a bug, please report it.")]
    Internal { message: String },
}

impl WeftError {
    /// The underlying domain error, if any.
    pub fn domain(&self) -> Option<&DomainError> {
        match self {
            Self::Domain(e) | Self::Generation { source: e, .. } => Some(e),
            _ => None,
        }
    }

    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) | Self::Generation { source: e, .. } => e.suggestions(),
            Self::Application(e) => e.suggestions(),
            Self::Configuration { message } => vec![
                format!("Configuration issue: {}", message),
                "Check weft.toml and your config file".into(),
            ],
            Self::Internal { .. } => vec![
                "This appears to be a bug in Weft".into(),
                "Please report this issue at: https://github.com/cosecruz/weft/issues".into(),
            ],
        }
    }

    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) | Self::Generation { source: e, .. } => match e.category() {
                crate::domain::ErrorCategory::Discovery => ErrorCategory::Discovery,
                crate::domain::ErrorCategory::Validation => ErrorCategory::Validation,
                crate::domain::ErrorCategory::TypeMapping => ErrorCategory::TypeMapping,
                crate::domain::ErrorCategory::Emission => ErrorCategory::Emission,
            },
            Self::Application(e) => e.category(),
            Self::Configuration { .. } => ErrorCategory::Configuration,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }
}

/// Error categories for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Discovery,
    Validation,
    TypeMapping,
    Emission,
    NotFound,
    Configuration,
    Internal,
}

/// Convenient result type alias.
pub type WeftResult<T> = Result<T, WeftError>;
