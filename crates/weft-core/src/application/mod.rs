//! Application layer for Weft.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (GenerationService, WorkspaceService)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! generation rules itself. All rules live in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;
pub mod workspace;

// Re-export main services
pub use services::{GenerateOptions, GenerationService, TreadleExecutor, WorkspaceService};

// Re-export port traits (for adapter implementation)
pub use ports::{Filesystem, SpecCollector, TemplateRenderer};

pub use error::ApplicationError;
pub use workspace::Workspace;
