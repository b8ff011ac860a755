//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `weft-adapters` crate provides implementations.

use std::path::Path;

use serde_json::Value;

use crate::application::workspace::Workspace;
use crate::error::WeftResult;

/// Port for workspace discovery.
///
/// Implemented by:
/// - `weft_adapters::TomlWorkspaceCollector` (weft.toml + spec directory)
///
/// Collection is a pure read. The returned workspace has already passed the
/// discovery checks (duplicates, undeclared types).
#[cfg_attr(test, mockall::automock)]
pub trait SpecCollector: Send + Sync {
    fn collect(&self, root: &Path) -> WeftResult<Workspace>;
}

/// Port for filesystem operations.
///
/// Implemented by:
/// - `weft_adapters::filesystem::LocalFilesystem` (production)
/// - `weft_adapters::filesystem::MemoryFilesystem` (testing)
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> WeftResult<()>;

    /// Write content to a file, replacing it.
    fn write_file(&self, path: &Path, content: &str) -> WeftResult<()>;

    /// Read a whole file as UTF-8.
    fn read_file(&self, path: &Path) -> WeftResult<String>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;
}

/// Port for template rendering.
///
/// Implemented by:
/// - `weft_adapters::renderer::HandlebarsRenderer`
///
/// Renderers are shared across render workers, so they must be `Sync` and
/// must not mutate state while rendering.
#[cfg_attr(test, mockall::automock)]
pub trait TemplateRenderer: Send + Sync {
    /// Render a registered template by name.
    fn render(&self, template: &str, context: &Value) -> WeftResult<String>;

    /// Render a one-off template string (output paths, markers).
    fn render_inline(&self, source: &str, context: &Value) -> WeftResult<String>;

    fn has_template(&self, name: &str) -> bool;
}
