//! Command handlers, one module per subcommand.

pub mod completions;
pub mod generate;
pub mod graph;
pub mod list;
pub mod types;

use weft_adapters::TomlWorkspaceCollector;

use crate::config::AppConfig;

/// Collector honouring the configured manifest name.
pub(crate) fn collector(config: &AppConfig) -> Box<TomlWorkspaceCollector> {
    Box::new(TomlWorkspaceCollector::new().with_manifest(config.workspace.manifest.clone()))
}
