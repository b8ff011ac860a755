//! Application layer errors.
//!
//! These errors represent failures in orchestration, not generation rules.
//! Rule violations are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// No workspace manifest at the given root.
    #[error("No workspace found at {path}")]
    WorkspaceNotFound { path: PathBuf },

    /// A treadle names a template the renderer does not know.
    #[error("Template '{name}' is not registered")]
    TemplateMissing { name: String },

    /// Template rendering failed.
    #[error("Template '{template}' failed to render: {reason}")]
    RenderingFailed { template: String, reason: String },

    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// Shared state lock poisoned by a panicking thread.
    #[error("Lock poisoned: {resource}")]
    LockPoisoned { resource: &'static str },
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::WorkspaceNotFound { path } => vec![
                format!("Expected a weft.toml in {}", path.display()),
                "Pass the workspace directory as an argument".into(),
            ],
            Self::TemplateMissing { name } => vec![
                format!("Register '{}' with the renderer", name),
                "Check the treadle's output declarations".into(),
            ],
            Self::RenderingFailed { template, .. } => vec![
                format!("Inspect the template '{}'", template),
                "Undefined variables are errors in strict mode".into(),
            ],
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
            ],
            Self::LockPoisoned { .. } => vec!["Re-run the command".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::WorkspaceNotFound { .. } => ErrorCategory::NotFound,
            Self::TemplateMissing { .. } => ErrorCategory::Configuration,
            Self::RenderingFailed { .. } => ErrorCategory::Emission,
            Self::FilesystemError { .. } | Self::LockPoisoned { .. } => ErrorCategory::Internal,
        }
    }
}
