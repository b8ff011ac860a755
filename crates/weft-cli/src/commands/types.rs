//! Implementation of the `weft types` command.

use weft_core::application::WorkspaceService;
use weft_core::domain::{Language, TypeMappingEntry};

use crate::{
    cli::TypesArgs, commands::collector, config::AppConfig, error::CliResult,
    output::OutputManager,
};

pub fn execute(args: TypesArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let language: Option<Language> = args.language.map(Into::into);

    let rows = match args.workspace.as_deref() {
        Some(dir) => {
            let workspace = WorkspaceService::new(collector(&config)).load(dir)?;
            WorkspaceService::workspace_types(&workspace, language)
        }
        None => WorkspaceService::builtin_types(language),
    };

    if output.is_json() {
        output.json(&rows)?;
        return Ok(());
    }

    let mut current: Option<Language> = None;
    for row in &rows {
        if current != Some(row.language) {
            current = Some(row.language);
            output.header(&format!("{}:", row.language))?;
        }
        output.print(&format_row(row))?;
    }
    Ok(())
}

fn format_row(row: &TypeMappingEntry) -> String {
    format!(
        "  {:<14} {:<22} {:<16} {}",
        row.abstract_type, row.target_type, row.strategy, row.error_sentinel
    )
}
