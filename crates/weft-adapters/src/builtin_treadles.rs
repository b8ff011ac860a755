//! Treadles and templates that ship with Weft.
//!
//! | Treadle | Current ← previous | Output | Hookup |
//! |---------|--------------------|--------|--------|
//! | `front-port` | front-domain ← core | `src/ports/<name>.port.ts` | `src/index.ts` export |
//! | `mobile-binding` | mobile-binding ← any | `src/main/kotlin/<Name>Binding.kt` | none |
//! | `native-binding` | native-binding ← mobile-binding | `src/<name>_jni.rs` | `src/lib.rs` module |
//! | `ipc-descriptor` | ipc-descriptor ← any | `<name>.ipc.json` | none |
//!
//! Registration order is the selection order, so a workspace that wants its
//! own rule for a pair registers it ahead of these.

use std::collections::BTreeSet;

use serde_json::Value;
use tracing::debug;

use weft_core::{
    domain::{
        Anchor, HookupSpec, Language, OutputSpec, RenderContext, RolePattern, RoleTag,
        ShapeInput, Treadle, TreadleRegistry, default_shaper, filters, transforms,
        type_mapping::{LIST_SUFFIX, find_builtin},
        validators,
    },
    error::WeftResult,
};

use crate::renderer::HandlebarsRenderer;

/// `(name, source)` of every built-in template.
pub const TEMPLATES: &[(&str, &str)] = &[
    ("front/port.ts", include_str!("../templates/front/port.ts.hbs")),
    (
        "front/index-export.ts",
        include_str!("../templates/front/index-export.ts.hbs"),
    ),
    ("mobile/binding.kt", include_str!("../templates/mobile/binding.kt.hbs")),
    ("native/jni.rs", include_str!("../templates/native/jni.rs.hbs")),
    ("native/lib-mod.rs", include_str!("../templates/native/lib-mod.rs.hbs")),
    ("ipc/descriptor.json", include_str!("../templates/ipc/descriptor.json.hbs")),
];

/// Methods carrying this tag never reach the front port.
pub const INTERNAL_TAG: &str = "internal";

/// Renderer with every built-in template registered.
pub fn builtin_renderer() -> WeftResult<HandlebarsRenderer> {
    let mut renderer = HandlebarsRenderer::new();
    for (name, source) in TEMPLATES {
        renderer.register(name, source)?;
    }
    debug!(templates = TEMPLATES.len(), "built-in templates registered");
    Ok(renderer)
}

/// Registry holding the built-in treadles, in selection order.
pub fn builtin_registry() -> WeftResult<TreadleRegistry> {
    let mut registry = TreadleRegistry::new();
    for treadle in builtin_treadles()? {
        registry.register(treadle)?;
    }
    Ok(registry)
}

/// The built-in treadles, unregistered.
pub fn builtin_treadles() -> WeftResult<Vec<Treadle>> {
    Ok(vec![
        front_port()?,
        mobile_binding()?,
        native_binding()?,
        ipc_descriptor()?,
    ])
}

fn role(tag: &str) -> WeftResult<RolePattern> {
    Ok(RolePattern::parse(tag)?)
}

fn front_port() -> WeftResult<Treadle> {
    Ok(Treadle::builder("front-port")
        .matching(role(RoleTag::FRONT_DOMAIN)?, role(RoleTag::CORE)?)
        .validate(validators::previous_language)
        .filter(filters::not_tagged(INTERNAL_TAG))
        .transform(transforms::camel_case_names())
        .shaper(with_imports)
        .output(OutputSpec::new(
            "front/port.ts",
            "src/ports/{{name_kebab}}.port.ts",
            Language::TypeScript,
        ))
        .hookup(HookupSpec {
            descriptor: "src/index.ts".into(),
            marker: "front-port:{{name_kebab}}".into(),
            comment_prefix: "//".into(),
            anchor: Anchor::End,
            block_template: "front/index-export.ts".into(),
            create_if_missing: true,
        })
        .build()?)
}

fn mobile_binding() -> WeftResult<Treadle> {
    Ok(Treadle::builder("mobile-binding")
        .matching(role(RoleTag::MOBILE_BINDING)?, RolePattern::Any)
        .validate(validators::previous_language)
        .transform(transforms::infer_crud())
        .transform(transforms::camel_case_names())
        .output(OutputSpec::new(
            "mobile/binding.kt",
            "src/main/kotlin/{{name_pascal}}Binding.kt",
            Language::Kotlin,
        ))
        .build()?)
}

fn native_binding() -> WeftResult<Treadle> {
    Ok(Treadle::builder("native-binding")
        .matching(role(RoleTag::NATIVE_BINDING)?, role(RoleTag::MOBILE_BINDING)?)
        .validate(validators::wraps(RoleTag::MOBILE_BINDING))
        .transform(transforms::snake_case_names())
        .output(OutputSpec::new(
            "native/jni.rs",
            "src/{{name_snake}}_jni.rs",
            Language::Rust,
        ))
        .hookup(HookupSpec {
            descriptor: "src/lib.rs".into(),
            marker: "native-binding:{{name_snake}}".into(),
            comment_prefix: "//".into(),
            anchor: Anchor::End,
            block_template: "native/lib-mod.rs".into(),
            create_if_missing: false,
        })
        .build()?)
}

fn ipc_descriptor() -> WeftResult<Treadle> {
    Ok(Treadle::builder("ipc-descriptor")
        .matching(role(RoleTag::IPC_DESCRIPTOR)?, RolePattern::Any)
        .validate(validators::previous_language)
        .transform(transforms::infer_crud())
        .output(OutputSpec::new(
            "ipc/descriptor.json",
            "{{name_kebab}}.ipc.json",
            Language::Json,
        ))
        .build()?)
}

/// Default context plus `imports`: entity names the kept methods mention.
fn with_imports(input: &ShapeInput<'_>) -> RenderContext {
    let imports: BTreeSet<&str> = input
        .methods
        .iter()
        .flat_map(|m| m.referenced_types())
        .map(|t| t.strip_suffix(LIST_SUFFIX).unwrap_or(t))
        .filter(|t| find_builtin(t).is_none())
        .collect();

    default_shaper(input).with(
        "imports",
        Value::Array(imports.into_iter().map(Value::from).collect()),
    )
}
