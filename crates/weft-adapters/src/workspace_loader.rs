//! TOML workspace collector.
//!
//! Reads the workspace manifest and every spec source under the declared
//! specs directory, then hands the result to the domain constructors so the
//! discovery checks run exactly once.
//!
//! # Directory layout expected
//!
//! ```text
//! app/
//! ├── weft.toml              ← manifest (required)
//! └── managements/
//!     ├── bookmark.toml      ← one spec per file
//!     └── media/
//!         └── media.toml
//! ```
//!
//! # `weft.toml` format
//!
//! ```toml
//! [workspace]
//! name  = "app"
//! specs = "managements"
//!
//! [[entities]]
//! name      = "Bookmark"
//! strategy  = "struct"                    # struct | opaque
//! languages = ["typescript", "kotlin"]    # optional
//!
//! [core]
//! language = "typescript"
//! package  = "@app/core"
//! path     = "packages/core"
//!
//! [[core.spiralers]]
//! key               = "front"
//! role              = "front-domain"
//! language          = "typescript"
//! previous_language = "typescript"
//! package           = "@app/front"
//! path              = "packages/front"
//! min_reach         = "public"            # optional
//! ```
//!
//! Spiralers nest: `[[core.spiralers.spiralers]]` wraps the spiraler above.

use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use serde::Deserialize;
use tracing::{debug, instrument};
use walkdir::WalkDir;

use weft_core::{
    application::{ApplicationError, Workspace, ports::SpecCollector},
    domain::{
        CoreDef, CrudTag, DomainError, EntityDecl, Language, LoomPlan, ManagementCatalog,
        ManagementSpec, MethodSpec, ParamSpec, Reach, RelativePath, RoleTag,
        SerializationStrategy, SpiralerDef, TypeMappingTable,
    },
    error::WeftResult,
};

/// Default manifest file name.
pub const MANIFEST_FILE: &str = "weft.toml";

const DEFAULT_SPECS_DIR: &str = "managements";

// ── Manifest types ────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct Manifest {
    workspace: WorkspaceSection,
    #[serde(default)]
    entities: Vec<EntitySection>,
    core: CoreSection,
}

#[derive(Debug, Deserialize)]
struct WorkspaceSection {
    name: String,
    specs: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EntitySection {
    name: String,
    strategy: String,
    languages: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct CoreSection {
    role: Option<String>,
    language: String,
    package: String,
    path: String,
    #[serde(default)]
    spiralers: Vec<SpiralerSection>,
}

#[derive(Debug, Deserialize)]
struct SpiralerSection {
    key: String,
    role: String,
    language: String,
    previous_language: String,
    package: String,
    path: String,
    min_reach: Option<String>,
    #[serde(default)]
    spiralers: Vec<SpiralerSection>,
}

// ── Spec source types ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct SpecSource {
    name: String,
    reach: String,
    #[serde(default)]
    methods: Vec<MethodSource>,
}

#[derive(Debug, Deserialize)]
struct MethodSource {
    name: String,
    #[serde(default = "void")]
    returns: String,
    crud: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    params: Vec<ParamSource>,
    doc: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ParamSource {
    name: String,
    #[serde(rename = "type")]
    ty: String,
    #[serde(default)]
    optional: bool,
}

fn void() -> String {
    "void".into()
}

// ── Collector ─────────────────────────────────────────────────────────────────

/// Collects a [`Workspace`] from `weft.toml` and a directory of spec files.
#[derive(Debug, Clone)]
pub struct TomlWorkspaceCollector {
    manifest: String,
}

impl TomlWorkspaceCollector {
    pub fn new() -> Self {
        Self {
            manifest: MANIFEST_FILE.into(),
        }
    }

    /// Use a manifest file name other than `weft.toml`.
    pub fn with_manifest(mut self, manifest: impl Into<String>) -> Self {
        self.manifest = manifest.into();
        self
    }

    fn read(path: &Path) -> WeftResult<String> {
        fs::read_to_string(path).map_err(|e| {
            ApplicationError::FilesystemError {
                path: path.to_path_buf(),
                reason: format!("Failed to read file: {}", e),
            }
            .into()
        })
    }

    /// Every `*.toml` below `dir`, sorted by path for a stable catalog order.
    fn spec_files(dir: &Path) -> WeftResult<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in WalkDir::new(dir).sort_by_file_name() {
            let entry = entry.map_err(|e| malformed(dir, format!("directory walk error: {e}")))?;
            let path = entry.path();
            if entry.file_type().is_file() && path.extension().is_some_and(|ext| ext == "toml") {
                files.push(path.to_path_buf());
            }
        }
        Ok(files)
    }
}

impl Default for TomlWorkspaceCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl SpecCollector for TomlWorkspaceCollector {
    #[instrument(skip(self), fields(root = %root.display()))]
    fn collect(&self, root: &Path) -> WeftResult<Workspace> {
        let manifest_path = root.join(&self.manifest);
        if !manifest_path.is_file() {
            return Err(ApplicationError::WorkspaceNotFound {
                path: root.to_path_buf(),
            }
            .into());
        }

        let raw = Self::read(&manifest_path)?;
        let manifest: Manifest =
            toml::from_str(&raw).map_err(|e| malformed(&manifest_path, e.to_string()))?;

        let entities = manifest
            .entities
            .iter()
            .map(|e| parse_entity(e).map_err(|err| within(&manifest_path, err)))
            .collect::<Result<Vec<_>, _>>()?;

        let mut types = TypeMappingTable::with_builtins();
        for entity in &entities {
            types.register_entity(entity)?;
        }

        let plan = parse_plan(&manifest.core).map_err(|err| within(&manifest_path, err))?;

        let specs_dir = root.join(
            manifest
                .workspace
                .specs
                .as_deref()
                .unwrap_or(DEFAULT_SPECS_DIR),
        );
        if !specs_dir.is_dir() {
            return Err(malformed(
                &manifest_path,
                format!("specs directory {} does not exist", specs_dir.display()),
            )
            .into());
        }

        let mut specs = Vec::new();
        for file in Self::spec_files(&specs_dir)? {
            let raw = Self::read(&file)?;
            let source: SpecSource =
                toml::from_str(&raw).map_err(|e| malformed(&file, e.to_string()))?;
            let spec = parse_spec(source).map_err(|err| within(&file, err))?;
            debug!(spec = spec.name(), file = %file.display(), "collected spec");
            specs.push(spec);
        }

        let catalog = ManagementCatalog::new(specs, &types)?;
        debug!(
            specs = catalog.len(),
            entities = entities.len(),
            "workspace collected"
        );

        Ok(Workspace {
            name: manifest.workspace.name,
            root: root.to_path_buf(),
            entities,
            types,
            catalog,
            plan,
        })
    }
}

// ── Conversion ────────────────────────────────────────────────────────────────

fn parse_entity(section: &EntitySection) -> Result<EntityDecl, DomainError> {
    let strategy = SerializationStrategy::from_str(&section.strategy)?;
    let entity = EntityDecl::new(&section.name, strategy);
    match &section.languages {
        None => Ok(entity),
        Some(langs) => {
            let languages = langs
                .iter()
                .map(|l| Language::from_str(l))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(entity.restricted_to(languages))
        }
    }
}

fn parse_plan(core: &CoreSection) -> Result<LoomPlan, DomainError> {
    if let Some(role) = &core.role {
        if RoleTag::new(role.as_str())? != RoleTag::CORE {
            return Err(DomainError::InvalidGraph(format!(
                "core ring must have role 'core', found '{}'",
                role
            )));
        }
    }

    let mut def = CoreDef::new(
        Language::from_str(&core.language)?,
        &core.package,
        RelativePath::try_new(&core.path)?,
    );
    for spiraler in &core.spiralers {
        def = def.wrapped_by(parse_spiraler(spiraler)?);
    }
    LoomPlan::new(def)
}

fn parse_spiraler(section: &SpiralerSection) -> Result<SpiralerDef, DomainError> {
    let mut def = SpiralerDef::new(
        &section.key,
        RoleTag::new(section.role.as_str())?,
        Language::from_str(&section.language)?,
        Language::from_str(&section.previous_language)?,
        &section.package,
        RelativePath::try_new(&section.path)?,
    );
    if let Some(reach) = &section.min_reach {
        def = def.min_reach(Reach::from_str(reach)?);
    }
    for child in &section.spiralers {
        def = def.wrapped_by(parse_spiraler(child)?);
    }
    Ok(def)
}

fn parse_spec(source: SpecSource) -> Result<ManagementSpec, DomainError> {
    let reach = Reach::from_str(&source.reach)?;
    let methods = source
        .methods
        .into_iter()
        .map(parse_method)
        .collect::<Result<Vec<_>, _>>()?;
    ManagementSpec::new(source.name, reach, methods)
}

fn parse_method(source: MethodSource) -> Result<MethodSpec, DomainError> {
    let mut method = MethodSpec::new(source.name, source.returns);
    if let Some(crud) = &source.crud {
        method = method.crud(CrudTag::from_str(crud)?);
    }
    for tag in source.tags {
        method = method.tag(tag);
    }
    if let Some(doc) = source.doc {
        method = method.doc(doc);
    }
    for p in source.params {
        let param = ParamSpec::new(p.name, p.ty);
        method = method.param(if p.optional { param.optional() } else { param });
    }
    Ok(method)
}

fn malformed(path: &Path, reason: String) -> DomainError {
    DomainError::MalformedSpec {
        source_name: path.display().to_string(),
        reason,
    }
}

/// Attribute a value-level error to the file it came from.
fn within(path: &Path, err: DomainError) -> DomainError {
    match err {
        DomainError::InvalidValue { .. }
        | DomainError::MissingRequiredField { .. }
        | DomainError::InvalidGraph(_) => malformed(path, err.to_string()),
        other => other,
    }
}
