//! Infrastructure adapters for Weft.
//!
//! This crate implements the ports defined in `weft-core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod builtin_treadles;
pub mod filesystem;
pub mod renderer;
pub mod workspace_loader;

// Re-export commonly used adapters
pub use builtin_treadles::{builtin_registry, builtin_renderer};
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use renderer::HandlebarsRenderer;
pub use workspace_loader::{MANIFEST_FILE, TomlWorkspaceCollector};
