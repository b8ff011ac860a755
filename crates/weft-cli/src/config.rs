//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. `WEFT_*` environment variables, `__` between sections
//!    (`WEFT_GENERATION__PARALLEL=true`); `.env` is loaded first by `main`
//! 3. Config file: `--config FILE`, else the platform config dir
//! 4. Built-in defaults (always present)

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use weft_adapters::MANIFEST_FILE;

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub workspace: WorkspaceConfig,
    pub generation: GenerationConfig,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceConfig {
    /// Used when a command is given no workspace argument.
    pub root: PathBuf,
    /// Manifest file name inside the workspace root.
    pub manifest: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub parallel: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub no_color: bool,
    pub format: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Also write logs to this file.
    pub file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            workspace: WorkspaceConfig {
                root: PathBuf::from("."),
                manifest: MANIFEST_FILE.into(),
            },
            generation: GenerationConfig { parallel: false },
            output: OutputConfig {
                no_color: false,
                format: "auto".into(),
            },
            logging: LoggingConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration, starting from defaults.
    ///
    /// An explicit `config_file` must exist; the platform default is optional.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        let mut builder = config::Config::builder()
            .add_source(config::Config::try_from(&AppConfig::default())?);

        builder = match config_file {
            Some(path) => builder.add_source(config::File::from(path.as_path()).required(true)),
            None => builder.add_source(config::File::from(Self::config_path()).required(false)),
        };

        builder = builder.add_source(
            config::Environment::with_prefix("WEFT")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        builder
            .build()
            .and_then(|c| c.try_deserialize())
            .with_context(|| match config_file {
                Some(path) => format!("reading {}", path.display()),
                None => "reading configuration".into(),
            })
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.weft.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("dev", "weft", "weft")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".weft.toml"))
    }

    /// Workspace argument, or the configured root.
    pub fn workspace_root(&self, arg: Option<&Path>) -> PathBuf {
        arg.map(Path::to_path_buf)
            .unwrap_or_else(|| self.workspace.root.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn defaults_point_at_current_directory() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.workspace.root, PathBuf::from("."));
        assert_eq!(cfg.workspace.manifest, "weft.toml");
        assert!(!cfg.generation.parallel);
    }

    #[test]
    fn file_overrides_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("weft-config.toml");
        fs::write(
            &path,
            "[generation]\nparallel = true\n\n[logging]\nfile = \"weft.log\"\n",
        )
        .unwrap();

        let cfg = AppConfig::load(Some(&path)).unwrap();
        assert!(cfg.generation.parallel);
        assert_eq!(cfg.logging.file, Some(PathBuf::from("weft.log")));
        assert_eq!(cfg.workspace.manifest, "weft.toml");
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("absent.toml");
        assert!(AppConfig::load(Some(&missing)).is_err());
    }

    #[test]
    fn workspace_argument_wins() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.workspace_root(None), PathBuf::from("."));
        assert_eq!(
            cfg.workspace_root(Some(Path::new("app"))),
            PathBuf::from("app")
        );
    }
}
