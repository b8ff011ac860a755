//! Implementation of the `weft graph` command.

use weft_core::application::WorkspaceService;
use weft_core::domain::Ring;
use weft_core::error::WeftError;

use crate::{
    cli::{GraphArgs, GraphFormat},
    commands::collector,
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

pub fn execute(args: GraphArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let root = config.workspace_root(args.workspace.as_deref());
    let (_, graph) = WorkspaceService::new(collector(&config)).graph(&root)?;

    if output.is_json() || matches!(args.format, GraphFormat::Json) {
        output.json(&graph)?;
        return Ok(());
    }

    for spiral in graph.spirals() {
        output.header(&spiral.spec)?;
        let mut chain = Vec::with_capacity(spiral.rings.len());
        for id in &spiral.rings {
            chain.push(describe(graph.get(*id).map_err(WeftError::from)?));
        }
        output.print(&format!("  {}", chain.join(" -> ")))?;
    }
    output.print("")?;
    output.info(&format!(
        "{} ring(s), {} pair(s)",
        graph.rings().len(),
        graph.pairs().len()
    ))?;
    Ok(())
}

fn describe(ring: &Ring) -> String {
    format!("{}[{}:{}]", ring.key, ring.role_tag, ring.language)
}
