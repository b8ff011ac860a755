//! Generation Service - main application orchestrator.
//!
//! This service coordinates the entire generation workflow:
//! 1. Collect the workspace (specs, entities, plan)
//! 2. Assemble the ring graph and walk its pairs
//! 3. Select and execute a treadle per pair into a [`GenerationPlan`]
//! 4. Validate the plan (path uniqueness, hookup application)
//! 5. Write files, then apply hookups, as a single writer
//!
//! Nothing touches the disk until steps 1-4 have succeeded, so any hard error
//! leaves the workspace as it was.

use std::collections::BTreeMap;
use std::path::Path;

use rayon::prelude::*;
use tracing::{info, info_span, instrument};
use uuid::Uuid;

use crate::{
    application::{
        ports::{Filesystem, SpecCollector, TemplateRenderer},
        services::treadle_executor::TreadleExecutor,
        workspace::Workspace,
    },
    domain::{
        DomainError, GenerationPlan, GenerationReport, HookupOutcome, RelativePath, RingGraph,
        RingPair, TreadleOutput, TreadleRegistry, select_treadle,
    },
    error::{WeftError, WeftResult},
};

/// Run options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerateOptions {
    /// Plan and validate only; write nothing.
    pub dry_run: bool,
    /// Render pairs on the rayon pool.
    pub parallel: bool,
}

/// Main generation service.
pub struct GenerationService {
    collector: Box<dyn SpecCollector>,
    renderer: Box<dyn TemplateRenderer>,
    filesystem: Box<dyn Filesystem>,
    registry: TreadleRegistry,
}

impl GenerationService {
    /// Create a new generation service with the given adapters.
    pub fn new(
        collector: Box<dyn SpecCollector>,
        renderer: Box<dyn TemplateRenderer>,
        filesystem: Box<dyn Filesystem>,
        registry: TreadleRegistry,
    ) -> Self {
        Self {
            collector,
            renderer,
            filesystem,
            registry,
        }
    }

    pub fn registry(&self) -> &TreadleRegistry {
        &self.registry
    }

    /// Generate every matched pair of the workspace at `root`.
    #[instrument(skip_all, fields(root = %root.as_ref().display(), dry_run = options.dry_run))]
    pub fn generate(
        &self,
        root: impl AsRef<Path>,
        options: GenerateOptions,
    ) -> WeftResult<GenerationReport> {
        let run_id = Uuid::new_v4().to_string();
        let _run = info_span!("run", %run_id).entered();

        let workspace = self.collector.collect(root.as_ref())?;
        info!(
            workspace = %workspace.name,
            specs = workspace.catalog.len(),
            "Workspace collected"
        );

        let plan = self.plan(&workspace, options.parallel)?;
        plan.validate()?;
        let descriptors = self.stage_hookups(&workspace.root, &plan)?;

        let present: usize = descriptors.values().map(|d| d.present).sum();
        let mut report = GenerationReport {
            run_id,
            specs: workspace.catalog.len(),
            pairs_visited: plan.pairs_visited(),
            pairs_skipped: plan.pairs_skipped(),
            hookups_applied: plan.hookups().len() - present,
            hookups_present: present,
            dry_run: options.dry_run,
            files: plan.artifacts().iter().map(|a| a.path.to_string()).collect(),
            ..GenerationReport::default()
        };

        if options.dry_run {
            info!(files = report.files.len(), "Dry run, nothing written");
            return Ok(report);
        }

        for artifact in plan.artifacts() {
            let full = workspace.root.join(artifact.path.as_path());
            if self.unchanged(&full, &artifact.content)? {
                report.files_unchanged += 1;
                continue;
            }
            self.write(&full, &artifact.content)?;
            report.files_written += 1;
        }

        for (path, staged) in descriptors.iter().filter(|(_, d)| d.changed) {
            self.write(&workspace.root.join(path.as_path()), &staged.text)?;
        }

        info!(
            written = report.files_written,
            unchanged = report.files_unchanged,
            hookups = report.hookups_applied,
            "Generation completed"
        );
        Ok(report)
    }

    /// Render every pair of the workspace without writing.
    ///
    /// Results come back in traversal order whether or not `parallel` is set.
    #[instrument(skip_all, fields(workspace = %workspace.name, parallel = parallel))]
    pub fn plan(&self, workspace: &Workspace, parallel: bool) -> WeftResult<GenerationPlan> {
        let graph = RingGraph::assemble(&workspace.catalog, &workspace.plan)?;
        let pairs = graph.pairs();
        info!(
            rings = graph.rings().len(),
            spirals = graph.spirals().len(),
            pairs = pairs.len(),
            "Ring graph assembled"
        );

        let executor = TreadleExecutor::new(self.renderer.as_ref(), &workspace.types);
        let run = |pair: &RingPair| self.process(&executor, &graph, workspace, *pair);

        let outputs: Vec<Option<TreadleOutput>> = if parallel {
            pairs.par_iter().map(run).collect::<WeftResult<_>>()?
        } else {
            pairs.iter().map(run).collect::<WeftResult<_>>()?
        };

        let mut plan = GenerationPlan::new();
        for output in outputs {
            match output {
                Some(output) => plan.push(output),
                None => plan.skip(),
            }
        }
        Ok(plan)
    }

    fn process(
        &self,
        executor: &TreadleExecutor<'_>,
        graph: &RingGraph,
        workspace: &Workspace,
        pair: RingPair,
    ) -> WeftResult<Option<TreadleOutput>> {
        let current = graph.get(pair.current)?;
        let previous = graph.get(pair.previous)?;

        let Some(treadle) = select_treadle(current, previous, &self.registry)? else {
            return Ok(None);
        };

        let spec = workspace
            .catalog
            .specs()
            .get(current.spec_index)
            .ok_or_else(|| WeftError::Internal {
                message: format!("ring {} points at a missing spec", current.id),
            })?;

        executor
            .execute(treadle, current, previous, spec)
            .map(Some)
    }

    /// Apply every hookup in memory, in plan order, one descriptor at a time.
    fn stage_hookups(
        &self,
        root: &Path,
        plan: &GenerationPlan,
    ) -> WeftResult<BTreeMap<RelativePath, StagedDescriptor>> {
        let mut staged: BTreeMap<RelativePath, StagedDescriptor> = BTreeMap::new();

        for pending in plan.hookups() {
            let hookup = &pending.hookup;
            if !staged.contains_key(&hookup.descriptor) {
                let full = root.join(hookup.descriptor.as_path());
                let text = if self.filesystem.exists(&full) {
                    self.filesystem.read_file(&full)?
                } else if hookup.create_if_missing {
                    String::new()
                } else {
                    return Err(WeftError::Generation {
                        spec: pending.spec.clone(),
                        treadle: pending.treadle.clone(),
                        source: DomainError::HookupDescriptorMissing {
                            descriptor: hookup.descriptor.to_string(),
                        },
                    });
                };
                staged.insert(
                    hookup.descriptor.clone(),
                    StagedDescriptor {
                        text,
                        changed: false,
                        present: 0,
                    },
                );
            }

            let entry = staged
                .get_mut(&hookup.descriptor)
                .ok_or_else(|| WeftError::Internal {
                    message: "staged descriptor vanished".into(),
                })?;

            match hookup.apply(&entry.text).map_err(|source| WeftError::Generation {
                spec: pending.spec.clone(),
                treadle: pending.treadle.clone(),
                source,
            })? {
                HookupOutcome::Applied(text) => {
                    entry.text = text;
                    entry.changed = true;
                }
                HookupOutcome::AlreadyPresent => entry.present += 1,
            }
        }

        Ok(staged)
    }

    fn unchanged(&self, path: &Path, content: &str) -> WeftResult<bool> {
        Ok(self.filesystem.exists(path) && self.filesystem.read_file(path)? == content)
    }

    fn write(&self, path: &Path, content: &str) -> WeftResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            self.filesystem.create_dir_all(parent)?;
        }
        self.filesystem.write_file(path, content)
    }
}

/// A descriptor after all of this run's hookups were applied in memory.
#[derive(Debug, Clone)]
struct StagedDescriptor {
    text: String,
    changed: bool,
    present: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use crate::application::ports::output::{MockFilesystem, MockSpecCollector, MockTemplateRenderer};
    use crate::domain::{
        Anchor, CoreDef, EntityDecl, HookupSpec, Language, LoomPlan, ManagementCatalog,
        ManagementSpec, MethodSpec, OutputSpec, ParamSpec, Reach, RolePattern, RoleTag,
        SerializationStrategy, SpiralerDef, Treadle, TypeMappingTable,
    };

    fn workspace() -> Workspace {
        let mut types = TypeMappingTable::with_builtins();
        let bookmark = EntityDecl::new("Bookmark", SerializationStrategy::StructByValue);
        types.register_entity(&bookmark).unwrap();

        let spec = ManagementSpec::new(
            "Bookmark",
            Reach::Public,
            vec![MethodSpec::new("delete", "bool").param(ParamSpec::new("id", "id"))],
        )
        .unwrap();
        let catalog = ManagementCatalog::new(vec![spec], &types).unwrap();

        let front = SpiralerDef::new(
            "front",
            RoleTag::new(RoleTag::FRONT_DOMAIN).unwrap(),
            Language::TypeScript,
            Language::TypeScript,
            "@app/front",
            RelativePath::try_new("front").unwrap(),
        );
        let plan = LoomPlan::new(
            CoreDef::new(Language::TypeScript, "@app/core", RelativePath::try_new("core").unwrap())
                .wrapped_by(front),
        )
        .unwrap();

        Workspace {
            name: "app".into(),
            root: PathBuf::from("/ws"),
            entities: vec![bookmark],
            types,
            catalog,
            plan,
        }
    }

    fn registry(with_hookup: bool) -> TreadleRegistry {
        let mut builder = Treadle::builder("front-port")
            .matching(
                RolePattern::parse(RoleTag::FRONT_DOMAIN).unwrap(),
                RolePattern::parse(RoleTag::CORE).unwrap(),
            )
            .output(OutputSpec::new("port", "src/port.ts", Language::TypeScript));
        if with_hookup {
            builder = builder.hookup(HookupSpec {
                descriptor: "src/index.ts".into(),
                marker: "front-port:Bookmark".into(),
                comment_prefix: "//".into(),
                anchor: Anchor::End,
                block_template: "export".into(),
                create_if_missing: true,
            });
        }
        let mut registry = TreadleRegistry::new();
        registry.register(builder.build().unwrap()).unwrap();
        registry
    }

    fn renderer() -> MockTemplateRenderer {
        let mut renderer = MockTemplateRenderer::new();
        renderer
            .expect_render_inline()
            .returning(|source, _| Ok(source.to_string()));
        renderer
            .expect_render()
            .returning(|name, _| Ok(format!("<{name}>")));
        renderer
    }

    fn collector() -> MockSpecCollector {
        let mut collector = MockSpecCollector::new();
        collector.expect_collect().returning(|_| Ok(workspace()));
        collector
    }

    #[test]
    fn dry_run_never_writes() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().returning(|_| false);
        fs.expect_write_file().never();
        fs.expect_create_dir_all().never();

        let service = GenerationService::new(
            Box::new(collector()),
            Box::new(renderer()),
            Box::new(fs),
            registry(true),
        );
        let report = service
            .generate(
                "/ws",
                GenerateOptions {
                    dry_run: true,
                    parallel: false,
                },
            )
            .unwrap();

        assert!(report.dry_run);
        assert_eq!(report.files, vec!["front/src/port.ts".to_string()]);
        assert_eq!(report.pairs_visited, 1);
        assert_eq!(report.hookups_applied, 1);
    }

    #[test]
    fn writes_files_then_hookups() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().returning(|_| false);
        fs.expect_create_dir_all().returning(|_| Ok(()));
        fs.expect_write_file()
            .withf(|path, _| path == Path::new("/ws/front/src/port.ts"))
            .times(1)
            .returning(|_, _| Ok(()));
        fs.expect_write_file()
            .withf(|path, content| {
                path == Path::new("/ws/front/src/index.ts")
                    && content.contains("// weft:begin front-port:Bookmark")
            })
            .times(1)
            .returning(|_, _| Ok(()));

        let service = GenerationService::new(
            Box::new(collector()),
            Box::new(renderer()),
            Box::new(fs),
            registry(true),
        );
        let report = service.generate("/ws", GenerateOptions::default()).unwrap();

        assert_eq!(report.files_written, 1);
        assert_eq!(report.hookups_applied, 1);
        assert_eq!(report.hookups_present, 0);
    }

    #[test]
    fn identical_content_is_reported_unchanged() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().returning(|_| true);
        fs.expect_read_file().returning(|_| Ok("<port>".into()));
        fs.expect_write_file().never();

        let service = GenerationService::new(
            Box::new(collector()),
            Box::new(renderer()),
            Box::new(fs),
            registry(false),
        );
        let report = service.generate("/ws", GenerateOptions::default()).unwrap();
        assert_eq!(report.files_written, 0);
        assert_eq!(report.files_unchanged, 1);
    }

    #[test]
    fn parallel_plan_matches_sequential() {
        let service = GenerationService::new(
            Box::new(collector()),
            Box::new(renderer()),
            Box::new(MockFilesystem::new()),
            registry(false),
        );
        let ws = workspace();
        let seq = service.plan(&ws, false).unwrap();
        let par = service.plan(&ws, true).unwrap();
        assert_eq!(seq.artifacts(), par.artifacts());
    }

    #[test]
    fn missing_descriptor_is_an_error_when_not_creatable() {
        let mut registry = TreadleRegistry::new();
        registry
            .register(
                Treadle::builder("front-port")
                    .matching(RolePattern::Any, RolePattern::Any)
                    .output(OutputSpec::new("port", "src/port.ts", Language::TypeScript))
                    .hookup(HookupSpec {
                        descriptor: "build.gradle.kts".into(),
                        marker: "m".into(),
                        comment_prefix: "//".into(),
                        anchor: Anchor::End,
                        block_template: "b".into(),
                        create_if_missing: false,
                    })
                    .build()
                    .unwrap(),
            )
            .unwrap();

        let mut fs = MockFilesystem::new();
        fs.expect_exists().returning(|_| false);
        fs.expect_write_file().never();

        let service =
            GenerationService::new(Box::new(collector()), Box::new(renderer()), Box::new(fs), registry);
        let err = service.generate("/ws", GenerateOptions::default()).unwrap_err();
        assert!(matches!(
            err.domain(),
            Some(DomainError::HookupDescriptorMissing { .. })
        ));
    }
}
