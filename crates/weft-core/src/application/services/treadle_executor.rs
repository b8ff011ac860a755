//! Treadle execution: filter → pipeline → shape → render.
//!
//! The executor never touches the filesystem. It turns one ring pair into
//! rendered [`Artifact`]s and at most one [`PendingHookup`]; writing is the
//! generation service's single-writer phase.

use serde_json::{Value, json};
use tracing::{debug, instrument};

use crate::{
    application::ports::TemplateRenderer,
    domain::{
        Artifact, DomainError, Hookup, Language, ManagementSpec, MethodSpec, PendingHookup,
        RelativePath, RenderContext, Ring, ShapeInput, Treadle, TreadleOutput, TypeMappingTable,
        conversion_helper, type_mapping::VOID,
    },
    error::{WeftError, WeftResult},
};

/// Executes treadles against ring pairs.
///
/// Borrows the renderer and type table; both are read-only for the run.
pub struct TreadleExecutor<'a> {
    renderer: &'a dyn TemplateRenderer,
    types: &'a TypeMappingTable,
}

impl<'a> TreadleExecutor<'a> {
    pub fn new(renderer: &'a dyn TemplateRenderer, types: &'a TypeMappingTable) -> Self {
        Self { renderer, types }
    }

    /// Execute `treadle` for `(current, previous)` over `spec`.
    ///
    /// # Errors
    ///
    /// Domain errors (unmapped types, bad output paths) are wrapped in
    /// [`WeftError::Generation`] with the spec and treadle attached.
    #[instrument(
        skip_all,
        fields(spec = spec.name(), treadle = treadle.name(), current = %current.key)
    )]
    pub fn execute(
        &self,
        treadle: &Treadle,
        current: &Ring,
        previous: &Ring,
        spec: &ManagementSpec,
    ) -> WeftResult<TreadleOutput> {
        let in_context = |source: DomainError| WeftError::Generation {
            spec: spec.name().to_string(),
            treadle: treadle.name().to_string(),
            source,
        };

        let methods = treadle.prepare_methods(spec);
        debug!(kept = methods.len(), total = spec.methods().len(), "methods prepared");

        let shaped = treadle.shape(&ShapeInput {
            spec,
            methods: &methods,
            current,
            previous,
        });

        let mut artifacts = Vec::with_capacity(treadle.outputs().len());
        for output in treadle.outputs() {
            let context = self
                .language_context(&shaped, &methods, output.language)
                .map_err(in_context)?;

            let relative = self.renderer.render_inline(&output.path, &context)?;
            let path = current
                .metadata
                .path
                .join(relative.trim())
                .map_err(in_context)?;
            let content = self.renderer.render(&output.template, &context)?;

            debug!(path = %path, bytes = content.len(), "output rendered");
            artifacts.push(Artifact {
                path,
                content,
                language: output.language,
                treadle: treadle.name().to_string(),
                spec: spec.name().to_string(),
            });
        }

        let hookup = match treadle.hookup() {
            None => None,
            Some(decl) => {
                let context = self
                    .language_context(&shaped, &methods, current.language)
                    .map_err(in_context)?;
                let descriptor = self.renderer.render_inline(&decl.descriptor, &context)?;
                let descriptor: RelativePath = current
                    .metadata
                    .path
                    .join(descriptor.trim())
                    .map_err(in_context)?;

                Some(PendingHookup {
                    hookup: Hookup {
                        descriptor,
                        marker: self
                            .renderer
                            .render_inline(&decl.marker, &context)?
                            .trim()
                            .to_string(),
                        comment_prefix: decl.comment_prefix.clone(),
                        anchor: decl.anchor.clone(),
                        block: self.renderer.render(&decl.block_template, &context)?,
                        create_if_missing: decl.create_if_missing,
                    },
                    treadle: treadle.name().to_string(),
                    spec: spec.name().to_string(),
                })
            }
        };

        Ok(TreadleOutput { artifacts, hookup })
    }

    /// Shaped context plus `language` and language-resolved `methods`.
    fn language_context(
        &self,
        shaped: &RenderContext,
        methods: &[MethodSpec],
        language: Language,
    ) -> Result<Value, DomainError> {
        let mut context = shaped.clone();
        context.insert("language", language.as_str());
        context.insert("methods", self.method_views(methods, language)?);
        Ok(context.into_value())
    }

    /// Resolve every parameter and return type of `methods` for `language`.
    pub fn method_views(
        &self,
        methods: &[MethodSpec],
        language: Language,
    ) -> Result<Value, DomainError> {
        let views = methods
            .iter()
            .map(|m| self.method_view(m, language))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Value::Array(views))
    }

    fn method_view(&self, method: &MethodSpec, language: Language) -> Result<Value, DomainError> {
        let params = method
            .params
            .iter()
            .map(|p| {
                let mut view = self.type_view(&p.abstract_type, language, p.optional)?;
                view["name"] = json!(p.name);
                view["optional"] = json!(p.optional);
                Ok(view)
            })
            .collect::<Result<Vec<_>, DomainError>>()?;

        let mut returns = self.type_view(&method.return_type, language, false)?;
        returns["is_void"] = json!(method.return_type == VOID);
        returns["sentinel"] = json!(self.types.error_sentinel(&method.return_type, language)?);

        Ok(json!({
            "name": method.name,
            "crud": method.crud.as_str(),
            "doc": method.doc,
            "tags": method.tags,
            "params": params,
            "returns": returns,
        }))
    }

    fn type_view(
        &self,
        abstract_type: &str,
        language: Language,
        optional: bool,
    ) -> Result<Value, DomainError> {
        let entry = self.types.resolve(abstract_type, language)?;
        let helper = conversion_helper(language, entry.strategy);

        Ok(json!({
            "abstract": abstract_type,
            "type": self.types.declared_type(abstract_type, language, optional)?,
            "strategy": entry.strategy.as_str(),
            "is_primitive": entry.is_primitive,
            "needs_conversion": helper.is_some(),
            "decode": helper.map(|h| h.decode),
            "encode": helper.map(|h| h.encode),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::output::MockTemplateRenderer;
    use crate::domain::{
        Anchor, CrudTag, EntityDecl, HookupOutcome, HookupSpec, OutputSpec, ParamSpec, Reach,
        RingId, RingMetadata, RingRole, RolePattern, RoleTag, SerializationStrategy,
    };

    fn types() -> TypeMappingTable {
        let mut t = TypeMappingTable::with_builtins();
        t.register_entity(&EntityDecl::new("Bookmark", SerializationStrategy::StructByValue))
            .unwrap();
        t
    }

    fn ring(id: usize, key: &str, language: Language) -> Ring {
        Ring {
            id: RingId(id),
            spec: "Bookmark".into(),
            spec_index: 0,
            key: key.into(),
            role_tag: RoleTag::new(key).unwrap(),
            language,
            metadata: RingMetadata {
                package: key.into(),
                path: RelativePath::try_new(format!("packages/{key}")).unwrap(),
            },
            role: if id == 0 {
                RingRole::Core
            } else {
                RingRole::Spiraler {
                    wraps: RingId(0),
                    core: RingId(0),
                    previous_language: Language::TypeScript,
                }
            },
        }
    }

    fn spec(return_type: &str) -> ManagementSpec {
        ManagementSpec::new(
            "Bookmark",
            Reach::Public,
            vec![
                MethodSpec::new("delete", return_type)
                    .param(ParamSpec::new("id", "id"))
                    .crud(CrudTag::Delete),
            ],
        )
        .unwrap()
    }

    fn treadle() -> Treadle {
        Treadle::builder("mobile")
            .matching(RolePattern::Any, RolePattern::Any)
            .output(OutputSpec::new("mobile.kt", "src/{{name_pascal}}.kt", Language::Kotlin))
            .build()
            .unwrap()
    }

    #[test]
    fn resolves_types_for_output_language() {
        let types = types();
        let mut renderer = MockTemplateRenderer::new();
        renderer
            .expect_render_inline()
            .returning(|_, _| Ok("src/Bookmark.kt".into()));
        renderer.expect_render().returning(|_, ctx| {
            let method = &ctx["methods"][0];
            Ok(format!(
                "{}:{}:{}",
                method["returns"]["type"].as_str().unwrap_or_default(),
                method["params"][0]["type"].as_str().unwrap_or_default(),
                ctx["language"].as_str().unwrap_or_default(),
            ))
        });

        let executor = TreadleExecutor::new(&renderer, &types);
        let out = executor
            .execute(
                &treadle(),
                &ring(1, "mobile-binding", Language::Kotlin),
                &ring(0, "core", Language::TypeScript),
                &spec("bool"),
            )
            .unwrap();

        assert_eq!(out.artifacts.len(), 1);
        assert_eq!(
            out.artifacts[0].path.to_string(),
            "packages/mobile-binding/src/Bookmark.kt"
        );
        assert_eq!(out.artifacts[0].content, "Boolean:Long:kotlin");
        assert!(out.hookup.is_none());
    }

    #[test]
    fn unmapped_type_is_reported_with_spec_and_treadle() {
        let mut types = TypeMappingTable::with_builtins();
        types
            .register_entity(
                &EntityDecl::new("Geo", SerializationStrategy::StructByValue)
                    .restricted_to(vec![Language::TypeScript]),
            )
            .unwrap();
        let mut renderer = MockTemplateRenderer::new();
        renderer.expect_render_inline().never();
        renderer.expect_render().never();

        let executor = TreadleExecutor::new(&renderer, &types);
        let err = executor
            .execute(
                &treadle(),
                &ring(1, "mobile-binding", Language::Kotlin),
                &ring(0, "core", Language::TypeScript),
                &spec("Geo"),
            )
            .unwrap_err();

        match err {
            WeftError::Generation { spec, treadle, source } => {
                assert_eq!(spec, "Bookmark");
                assert_eq!(treadle, "mobile");
                assert_eq!(
                    source,
                    DomainError::UnmappedType {
                        type_name: "Geo".into(),
                        language: "kotlin".into()
                    }
                );
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn method_views_carry_conversion_helpers() {
        let types = types();
        let renderer = MockTemplateRenderer::new();
        let executor = TreadleExecutor::new(&renderer, &types);

        let views = executor
            .method_views(
                &[MethodSpec::new("create", "Bookmark").param(ParamSpec::new("url", "url"))],
                Language::Rust,
            )
            .unwrap();

        assert_eq!(views[0]["params"][0]["type"], "jstring");
        assert_eq!(views[0]["params"][0]["decode"], "decode_string");
        assert_eq!(views[0]["returns"]["encode"], "encode_struct");
        assert_eq!(views[0]["returns"]["sentinel"], "std::ptr::null_mut()");
    }

    #[test]
    fn rendered_marker_is_trimmed_so_reruns_find_it() {
        let types = types();
        let mut renderer = MockTemplateRenderer::new();
        renderer.expect_render_inline().returning(|source, _| {
            Ok(match source {
                "lib:{{name_snake}}" => "lib:bookmark  \n".into(),
                "src/lib.rs" => "src/lib.rs".into(),
                _ => "src/Bookmark.kt".into(),
            })
        });
        renderer
            .expect_render()
            .returning(|_, _| Ok("pub mod bookmark;".into()));

        let treadle = Treadle::builder("mobile")
            .matching(RolePattern::Any, RolePattern::Any)
            .output(OutputSpec::new("mobile.kt", "src/{{name_pascal}}.kt", Language::Kotlin))
            .hookup(HookupSpec {
                descriptor: "src/lib.rs".into(),
                marker: "lib:{{name_snake}}".into(),
                comment_prefix: "//".into(),
                anchor: Anchor::End,
                block_template: "lib-mod".into(),
                create_if_missing: true,
            })
            .build()
            .unwrap();

        let executor = TreadleExecutor::new(&renderer, &types);
        let out = executor
            .execute(
                &treadle,
                &ring(1, "mobile-binding", Language::Kotlin),
                &ring(0, "core", Language::TypeScript),
                &spec("bool"),
            )
            .unwrap();

        let hookup = out.hookup.unwrap().hookup;
        assert_eq!(hookup.marker, "lib:bookmark");

        let HookupOutcome::Applied(text) = hookup.apply("").unwrap() else {
            panic!("first apply must insert the block");
        };
        assert_eq!(hookup.apply(&text).unwrap(), HookupOutcome::AlreadyPresent);
    }
}
