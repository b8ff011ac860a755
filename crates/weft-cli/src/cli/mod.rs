//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use weft_core::domain::{CrudTag, Language, Reach};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "weft",
    bin_name = "weft",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Multi-target adaptor generator",
    long_about = "Weft reads management specifications and weaves them through \
                  a chain of language rings, emitting a TypeScript port, a Kotlin \
                  binding, a Rust JNI layer and an IPC descriptor per spec.",
    after_help = "EXAMPLES:\n\
        \x20 weft generate ./app\n\
        \x20 weft generate ./app --dry-run\n\
        \x20 weft list ./app --reach public\n\
        \x20 weft graph ./app --format json\n\
        \x20 weft types --lang kotlin\n\
        \x20 weft completions bash > /usr/share/bash-completion/completions/weft",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate every target for a workspace.
    #[command(
        visible_alias = "gen",
        about = "Generate adaptors for a workspace",
        after_help = "EXAMPLES:\n\
            \x20 weft generate\n\
            \x20 weft generate ./app --dry-run\n\
            \x20 weft generate ./app --parallel"
    )]
    Generate(GenerateArgs),

    /// List collected management specs.
    #[command(
        visible_alias = "ls",
        about = "List management specs",
        after_help = "EXAMPLES:\n\
            \x20 weft list\n\
            \x20 weft list ./app --reach public\n\
            \x20 weft list --crud delete --format csv\n\
            \x20 weft list --group"
    )]
    List(ListArgs),

    /// Show the ring graph.
    #[command(
        about = "Show the ring graph",
        after_help = "EXAMPLES:\n\
            \x20 weft graph ./app\n\
            \x20 weft graph ./app --format json"
    )]
    Graph(GraphArgs),

    /// Show the type-mapping table.
    #[command(
        about = "Show the type-mapping table",
        after_help = "EXAMPLES:\n\
            \x20 weft types\n\
            \x20 weft types --lang rust\n\
            \x20 weft types --workspace ./app"
    )]
    Types(TypesArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 weft completions bash > ~/.local/share/bash-completion/completions/weft\n\
            \x20 weft completions zsh  > ~/.zfunc/_weft\n\
            \x20 weft completions fish > ~/.config/fish/completions/weft.fish"
    )]
    Completions(CompletionsArgs),
}

// ── generate ──────────────────────────────────────────────────────────────────

/// Arguments for `weft generate`.
#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Workspace root; defaults to `workspace.root` from config.
    #[arg(value_name = "WORKSPACE", help = "Workspace root containing weft.toml")]
    pub workspace: Option<PathBuf>,

    /// Render and validate everything, write nothing.
    #[arg(long = "dry-run", help = "Show what would be written without writing")]
    pub dry_run: bool,

    /// Render pairs across worker threads.
    #[arg(long = "parallel", help = "Render ring pairs in parallel")]
    pub parallel: bool,
}

// ── list ──────────────────────────────────────────────────────────────────────

/// Arguments for `weft list`.
#[derive(Debug, Args)]
pub struct ListArgs {
    #[arg(value_name = "WORKSPACE", help = "Workspace root containing weft.toml")]
    pub workspace: Option<PathBuf>,

    /// Keep specs with exactly this reach.
    #[arg(short = 'r', long = "reach", value_enum, help = "Filter by reach")]
    pub reach: Option<ReachArg>,

    /// Keep specs declaring at least one method with this CRUD tag.
    #[arg(long = "crud", value_enum, help = "Filter by CRUD tag")]
    pub crud: Option<CrudArg>,

    /// Group the table by reach.
    #[arg(short = 'g', long = "group", help = "Group specs by reach")]
    pub group: bool,

    /// Output format.
    #[arg(
        long = "format",
        value_enum,
        default_value = "table",
        help = "Output format"
    )]
    pub format: ListFormat,
}

/// Output format for the `list` command.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ListFormat {
    /// Human-readable table.
    Table,
    /// One name per line.
    List,
    /// JSON array.
    Json,
    /// CSV rows.
    Csv,
}

// ── graph ─────────────────────────────────────────────────────────────────────

/// Arguments for `weft graph`.
#[derive(Debug, Args)]
pub struct GraphArgs {
    #[arg(value_name = "WORKSPACE", help = "Workspace root containing weft.toml")]
    pub workspace: Option<PathBuf>,

    #[arg(
        long = "format",
        value_enum,
        default_value = "tree",
        help = "Output format"
    )]
    pub format: GraphFormat,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum GraphFormat {
    /// One line per spiral.
    Tree,
    /// Rings, spirals and pairs as JSON.
    Json,
}

// ── types ─────────────────────────────────────────────────────────────────────

/// Arguments for `weft types`.
#[derive(Debug, Args)]
pub struct TypesArgs {
    /// Only rows for this language.
    #[arg(short = 'l', long = "lang", value_enum, help = "Filter by language")]
    pub language: Option<LanguageArg>,

    /// Include the entities a workspace declares.
    #[arg(
        short = 'w',
        long = "workspace",
        value_name = "DIR",
        help = "Include entities declared by this workspace"
    )]
    pub workspace: Option<PathBuf>,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `weft completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── value enums ───────────────────────────────────────────────────────────────

/// Target languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum LanguageArg {
    /// Also accepted as `ts`.
    #[value(alias = "ts")]
    TypeScript,
    #[value(alias = "kt")]
    Kotlin,
    #[value(alias = "rs")]
    Rust,
    #[value(alias = "ipc")]
    Json,
}

impl From<LanguageArg> for Language {
    fn from(arg: LanguageArg) -> Self {
        match arg {
            LanguageArg::TypeScript => Language::TypeScript,
            LanguageArg::Kotlin => Language::Kotlin,
            LanguageArg::Rust => Language::Rust,
            LanguageArg::Json => Language::Json,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum ReachArg {
    Private,
    Internal,
    Public,
}

impl From<ReachArg> for Reach {
    fn from(arg: ReachArg) -> Self {
        match arg {
            ReachArg::Private => Reach::Private,
            ReachArg::Internal => Reach::Internal,
            ReachArg::Public => Reach::Public,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum CrudArg {
    Create,
    Read,
    Update,
    Delete,
    List,
}

impl From<CrudArg> for CrudTag {
    fn from(arg: CrudArg) -> Self {
        match arg {
            CrudArg::Create => CrudTag::Create,
            CrudArg::Read => CrudTag::Read,
            CrudArg::Update => CrudTag::Update,
            CrudArg::Delete => CrudTag::Delete,
            CrudArg::List => CrudTag::List,
        }
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{CommandFactory, Parser};

    #[test]
    fn verify_cli_structure() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_generate_command() {
        let cli = Cli::parse_from(["weft", "generate", "./app", "--dry-run"]);
        match cli.command {
            Commands::Generate(args) => {
                assert_eq!(args.workspace, Some(PathBuf::from("./app")));
                assert!(args.dry_run);
                assert!(!args.parallel);
            }
            other => panic!("expected Generate, got {other:?}"),
        }
    }

    #[test]
    fn language_aliases() {
        let cli = Cli::parse_from(["weft", "types", "--lang", "kt"]);
        if let Commands::Types(args) = cli.command {
            assert_eq!(args.language.map(Language::from), Some(Language::Kotlin));
        } else {
            panic!("expected Types command");
        }
    }

    #[test]
    fn list_filters_convert_to_domain() {
        let cli = Cli::parse_from(["weft", "ls", "--reach", "public", "--crud", "delete"]);
        if let Commands::List(args) = cli.command {
            assert_eq!(args.reach.map(Reach::from), Some(Reach::Public));
            assert_eq!(args.crud.map(CrudTag::from), Some(CrudTag::Delete));
        } else {
            panic!("expected List command");
        }
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        let result = Cli::try_parse_from(["weft", "--quiet", "--verbose", "list"]);
        assert!(result.is_err());
    }
}
