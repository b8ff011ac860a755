//! Implementation of the `weft generate` command.

use tracing::info;

use weft_adapters::{LocalFilesystem, builtin_registry, builtin_renderer};
use weft_core::application::{GenerateOptions, GenerationService};
use weft_core::domain::GenerationReport;

use crate::{
    cli::GenerateArgs, commands::collector, config::AppConfig, error::CliResult,
    output::OutputManager,
};

pub fn execute(args: GenerateArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let root = config.workspace_root(args.workspace.as_deref());
    let options = GenerateOptions {
        dry_run: args.dry_run,
        parallel: args.parallel || config.generation.parallel,
    };

    let service = GenerationService::new(
        collector(&config),
        Box::new(builtin_renderer()?),
        Box::new(LocalFilesystem::new()),
        builtin_registry()?,
    );

    info!(root = %root.display(), ?options, "Generating");
    let report = service.generate(&root, options)?;

    if output.is_json() {
        output.json(&report)?;
        return Ok(());
    }
    print_report(&report, &output)?;
    Ok(())
}

fn print_report(report: &GenerationReport, output: &OutputManager) -> std::io::Result<()> {
    if report.dry_run {
        output.header("Dry run, nothing written:")?;
    } else {
        output.header("Generated:")?;
    }
    for file in &report.files {
        output.detail(file)?;
    }

    output.print("")?;
    output.info(&format!(
        "{} spec(s), {} pair(s) woven, {} skipped",
        report.specs, report.pairs_visited, report.pairs_skipped
    ))?;

    if report.dry_run {
        output.success(&format!(
            "{} file(s) and {} hookup(s) would change",
            report.files_written, report.hookups_applied
        ))
    } else if report.files_written == 0 && report.hookups_applied == 0 {
        output.success("Everything up to date")
    } else {
        output.success(&format!(
            "{} file(s) written, {} unchanged, {} hookup(s) applied",
            report.files_written, report.files_unchanged, report.hookups_applied
        ))
    }
}
