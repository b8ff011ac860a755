// ============================================================================
// domain/error.rs - GENERATION ERROR DOMAIN
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (errors cross rayon workers during rendering)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Discovery Errors
    // ========================================================================
    #[error("Malformed specification '{source_name}': {reason}")]
    MalformedSpec { source_name: String, reason: String },

    #[error("Duplicate management '{name}' in {reach} reach")]
    DuplicateManagement { name: String, reach: String },

    #[error("Management '{spec}' method '{method}' references undeclared type '{type_name}'")]
    UndeclaredType {
        spec: String,
        method: String,
        type_name: String,
    },

    // ========================================================================
    // Validation Errors
    // ========================================================================
    #[error(
        "Treadle '{treadle}' rejected {current} <- {previous} for '{spec}': {reason}"
    )]
    Validation {
        treadle: String,
        spec: String,
        current: String,
        previous: String,
        reason: String,
    },

    #[error("Invalid ring graph: {0}")]
    InvalidGraph(String),

    #[error("Invalid {kind} '{value}'")]
    InvalidValue { kind: &'static str, value: String },

    #[error("Required field missing: {field}")]
    MissingRequiredField { field: &'static str },

    // ========================================================================
    // Type Mapping Errors
    // ========================================================================
    #[error("Type '{type_name}' has no mapping for language '{language}'")]
    UnmappedType { type_name: String, language: String },

    #[error("Type '{type_name}' is already mapped for language '{language}'")]
    DuplicateTypeMapping { type_name: String, language: String },

    // ========================================================================
    // Emission Errors
    // ========================================================================
    #[error("Output collision at {path}: written by both {first} and {second}")]
    OutputCollision {
        path: String,
        first: String,
        second: String,
    },

    #[error("Hookup '{marker}' in {descriptor} already present with different content")]
    HookupConflict { descriptor: String, marker: String },

    #[error("Hookup anchor '{anchor}' not found in {descriptor}")]
    HookupAnchorMissing { descriptor: String, anchor: String },

    #[error("Hookup descriptor {descriptor} does not exist")]
    HookupDescriptorMissing { descriptor: String },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::MalformedSpec { source_name, reason } => vec![
                format!("Fix the specification source: {}", source_name),
                format!("Details: {}", reason),
            ],
            Self::DuplicateManagement { name, reach } => vec![
                format!("Two specifications declare '{}' with {} reach", name, reach),
                "Rename one of them or change its reach".into(),
            ],
            Self::UndeclaredType { type_name, .. } => vec![
                format!("Declare '{}' under [[entities]] in weft.toml", type_name),
                "Or use a built-in type: string, bool, i32, i64, f64, id, url, timestamp, bytes, void"
                    .into(),
            ],
            Self::Validation { reason, .. } => vec![
                "Check the [core] and spiraler definitions in weft.toml".into(),
                format!("Details: {}", reason),
            ],
            Self::UnmappedType {
                type_name,
                language,
            } => vec![
                format!("'{}' cannot be expressed in {}", type_name, language),
                format!(
                    "Add '{}' to the entity's languages list, or remove the {} spiraler",
                    language, language
                ),
                "Try: weft types --lang <language> to see the mapping table".into(),
            ],
            Self::OutputCollision { path, .. } => vec![
                format!("Two generators target {}", path),
                "Give the spiralers distinct package paths".into(),
            ],
            Self::HookupConflict { descriptor, marker } => vec![
                format!("The block '{}' in {} was edited or is stale", marker, descriptor),
                "Delete the fenced weft block and re-run generation".into(),
            ],
            Self::HookupAnchorMissing { descriptor, anchor } => vec![
                format!("Add a line containing '{}' to {}", anchor, descriptor),
            ],
            Self::HookupDescriptorMissing { descriptor } => vec![
                format!("Create {} before generating", descriptor),
            ],
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::MalformedSpec { .. }
            | Self::DuplicateManagement { .. }
            | Self::UndeclaredType { .. } => ErrorCategory::Discovery,
            Self::Validation { .. }
            | Self::InvalidGraph(_)
            | Self::InvalidValue { .. }
            | Self::MissingRequiredField { .. } => ErrorCategory::Validation,
            Self::UnmappedType { .. } | Self::DuplicateTypeMapping { .. } => {
                ErrorCategory::TypeMapping
            }
            Self::OutputCollision { .. }
            | Self::HookupConflict { .. }
            | Self::HookupAnchorMissing { .. }
            | Self::HookupDescriptorMissing { .. } => ErrorCategory::Emission,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Discovery,
    Validation,
    TypeMapping,
    Emission,
}
