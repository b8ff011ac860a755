//! Implementation of the `weft list` command.

use weft_core::application::WorkspaceService;
use weft_core::domain::{CrudTag, ManagementSpec};

use crate::{
    cli::{ListArgs, ListFormat},
    commands::collector,
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

pub fn execute(args: ListArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let root = config.workspace_root(args.workspace.as_deref());
    let workspace = WorkspaceService::new(collector(&config)).load(&root)?;
    let catalog = &workspace.catalog;

    let crud: Option<CrudTag> = args.crud.map(Into::into);
    let keep = |spec: &&ManagementSpec| crud.map_or(true, |tag| spec.has_crud(tag));

    let specs: Vec<&ManagementSpec> = match args.reach {
        Some(reach) => catalog.filter_by_reach(reach.into()),
        None => catalog.specs().iter().collect(),
    }
    .into_iter()
    .filter(keep)
    .collect();

    let format = if output.is_json() { ListFormat::Json } else { args.format };

    match format {
        ListFormat::Table if args.group => {
            // Widest reach first.
            for (reach, group) in catalog.group_by_reach().into_iter().rev() {
                let group: Vec<_> = group
                    .into_iter()
                    .filter(|s| specs.iter().any(|k| k.name() == s.name()))
                    .collect();
                if group.is_empty() {
                    continue;
                }
                output.header(&format!("{reach}:"))?;
                for spec in group {
                    output.print(&row(spec))?;
                }
            }
        }
        ListFormat::Table => {
            output.header(&format!("Management specs in {}:", workspace.name))?;
            if specs.is_empty() {
                output.warning("No management specs match")?;
            }
            for spec in &specs {
                output.print(&row(spec))?;
            }
        }
        ListFormat::Json => {
            output.json(&specs)?;
        }
        ListFormat::List => {
            for spec in &specs {
                output.print(spec.name())?;
            }
        }
        ListFormat::Csv => {
            output.print("name,reach,methods")?;
            for spec in &specs {
                output.print(&format!(
                    "{},{},{}",
                    spec.name(),
                    spec.reach(),
                    spec.methods().len()
                ))?;
            }
        }
    }

    Ok(())
}

fn row(spec: &ManagementSpec) -> String {
    let methods: Vec<&str> = spec.methods().iter().map(|m| m.name.as_str()).collect();
    format!(
        "  {:<20} {:<9} {}",
        spec.name(),
        spec.reach().to_string(),
        methods.join(", ")
    )
}
