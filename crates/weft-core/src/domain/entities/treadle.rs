//! Treadles: declarative transform-and-emit rules.
//!
//! A [`Treadle`] is a plain record plus closures. It is registered once,
//! holds no per-run state, and is shared read-only across render workers.
//!
//! ```text
//!   (current, previous) ──matches?──► validate ──► filter ──► pipeline
//!                                                                │
//!         outputs[(template, path, language)] ◄── shape ◄────────┘
//!         hookup?
//! ```
//!
//! Rendering and writing are driven by the application layer; everything in
//! this module is pure.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde_json::json;

use crate::domain::{
    entities::{
        context::RenderContext,
        hookup::Anchor,
        management::{ManagementSpec, MethodSpec, ParamSpec},
        ring::Ring,
    },
    error::DomainError,
    naming::{to_camel_case, to_snake_case},
    validation::DomainValidator,
    value_objects::{CrudTag, Language, RoleTag},
};

// ── Matching ─────────────────────────────────────────────────────────────────

/// Role pattern of one side of a match predicate. `Any` is a wildcard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum RolePattern {
    Any,
    Tag(RoleTag),
}

impl RolePattern {
    pub fn matches(&self, tag: &RoleTag) -> bool {
        match self {
            Self::Any => true,
            Self::Tag(expected) => expected == tag,
        }
    }

    /// `"*"` is the wildcard; anything else must be a valid role tag.
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        if s == "*" {
            Ok(Self::Any)
        } else {
            RoleTag::new(s).map(Self::Tag)
        }
    }
}

impl fmt::Display for RolePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("*"),
            Self::Tag(tag) => write!(f, "{tag}"),
        }
    }
}

/// `(current role, previous role)` pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchPredicate {
    pub current: RolePattern,
    pub previous: RolePattern,
}

impl MatchPredicate {
    pub fn matches(&self, current: &Ring, previous: &Ring) -> bool {
        self.current.matches(&current.role_tag) && self.previous.matches(&previous.role_tag)
    }
}

// ── Closures ─────────────────────────────────────────────────────────────────

pub type Validator = Arc<dyn Fn(&Ring, &Ring) -> Result<(), String> + Send + Sync>;
pub type MethodFilter = Arc<dyn Fn(&MethodSpec) -> bool + Send + Sync>;
pub type MethodTransform = Arc<dyn Fn(MethodSpec) -> MethodSpec + Send + Sync>;
pub type DataShaper = Arc<dyn Fn(&ShapeInput<'_>) -> RenderContext + Send + Sync>;

/// Everything a shaper may read. Rings are borrowed immutably.
#[derive(Debug, Clone, Copy)]
pub struct ShapeInput<'a> {
    pub spec: &'a ManagementSpec,
    pub methods: &'a [MethodSpec],
    pub current: &'a Ring,
    pub previous: &'a Ring,
}

// ── Outputs ──────────────────────────────────────────────────────────────────

/// One `(template, path, language)` triple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputSpec {
    /// Name under which the renderer knows the content template.
    pub template: String,
    /// Inline template for the output path, relative to the package root.
    pub path: String,
    pub language: Language,
}

impl OutputSpec {
    pub fn new(template: impl Into<String>, path: impl Into<String>, language: Language) -> Self {
        Self {
            template: template.into(),
            path: path.into(),
            language,
        }
    }
}

/// Declaration of a build-descriptor patch; rendered per pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HookupSpec {
    /// Inline template for the descriptor path, relative to the package root.
    pub descriptor: String,
    /// Inline template for the unique block marker.
    pub marker: String,
    pub comment_prefix: String,
    pub anchor: Anchor,
    /// Name of the block template.
    pub block_template: String,
    pub create_if_missing: bool,
}

// ── Treadle ──────────────────────────────────────────────────────────────────

/// A registered transform-and-emit rule.
#[derive(Clone)]
pub struct Treadle {
    name: String,
    predicates: Vec<MatchPredicate>,
    validator: Option<Validator>,
    filter: Option<MethodFilter>,
    pipeline: Vec<MethodTransform>,
    shaper: DataShaper,
    outputs: Vec<OutputSpec>,
    hookup: Option<HookupSpec>,
}

impl fmt::Debug for Treadle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Treadle")
            .field("name", &self.name)
            .field("predicates", &self.predicates)
            .field("validates", &self.validator.is_some())
            .field("pipeline_len", &self.pipeline.len())
            .field("outputs", &self.outputs)
            .field("hookup", &self.hookup)
            .finish()
    }
}

impl Treadle {
    pub fn builder(name: impl Into<String>) -> TreadleBuilder {
        TreadleBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn predicates(&self) -> &[MatchPredicate] {
        &self.predicates
    }

    pub fn outputs(&self) -> &[OutputSpec] {
        &self.outputs
    }

    pub fn hookup(&self) -> Option<&HookupSpec> {
        self.hookup.as_ref()
    }

    /// Structural match: any predicate accepts the pair's role tags.
    pub fn matches(&self, current: &Ring, previous: &Ring) -> bool {
        self.predicates.iter().any(|p| p.matches(current, previous))
    }

    /// Run the validator, if any.
    ///
    /// # Errors
    ///
    /// `Validation` carrying treadle, spec, both rings and the reason.
    pub fn validate(&self, current: &Ring, previous: &Ring) -> Result<(), DomainError> {
        let Some(validator) = &self.validator else {
            return Ok(());
        };
        validator(current, previous).map_err(|reason| DomainError::Validation {
            treadle: self.name.clone(),
            spec: current.spec.clone(),
            current: format!("{} ({})", current.key, current.role_tag),
            previous: format!("{} ({})", previous.key, previous.role_tag),
            reason,
        })
    }

    /// Filter then pipeline. Surviving methods keep declaration order.
    pub fn prepare_methods(&self, spec: &ManagementSpec) -> Vec<MethodSpec> {
        spec.methods()
            .iter()
            .filter(|m| self.filter.as_ref().map_or(true, |f| f(*m)))
            .cloned()
            .map(|m| self.pipeline.iter().fold(m, |acc, step| step(acc)))
            .collect()
    }

    pub fn shape(&self, input: &ShapeInput<'_>) -> RenderContext {
        (self.shaper)(input)
    }
}

/// Fluent construction of a [`Treadle`].
pub struct TreadleBuilder {
    name: String,
    predicates: Vec<MatchPredicate>,
    validator: Option<Validator>,
    filter: Option<MethodFilter>,
    pipeline: Vec<MethodTransform>,
    shaper: Option<DataShaper>,
    outputs: Vec<OutputSpec>,
    hookup: Option<HookupSpec>,
}

impl TreadleBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            predicates: Vec::new(),
            validator: None,
            filter: None,
            pipeline: Vec::new(),
            shaper: None,
            outputs: Vec::new(),
            hookup: None,
        }
    }

    pub fn matching(mut self, current: RolePattern, previous: RolePattern) -> Self {
        self.predicates.push(MatchPredicate { current, previous });
        self
    }

    pub fn validate<F>(mut self, f: F) -> Self
    where
        F: Fn(&Ring, &Ring) -> Result<(), String> + Send + Sync + 'static,
    {
        self.validator = Some(Arc::new(f));
        self
    }

    pub fn filter(mut self, filter: MethodFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn transform(mut self, step: MethodTransform) -> Self {
        self.pipeline.push(step);
        self
    }

    pub fn shaper<F>(mut self, f: F) -> Self
    where
        F: Fn(&ShapeInput<'_>) -> RenderContext + Send + Sync + 'static,
    {
        self.shaper = Some(Arc::new(f));
        self
    }

    pub fn output(mut self, output: OutputSpec) -> Self {
        self.outputs.push(output);
        self
    }

    pub fn hookup(mut self, hookup: HookupSpec) -> Self {
        self.hookup = Some(hookup);
        self
    }

    /// # Errors
    ///
    /// `MissingRequiredField` without a name, a predicate, or an output.
    pub fn build(self) -> Result<Treadle, DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::MissingRequiredField { field: "name" });
        }
        if self.predicates.is_empty() {
            return Err(DomainError::MissingRequiredField {
                field: "match predicate",
            });
        }
        if self.outputs.is_empty() {
            return Err(DomainError::MissingRequiredField { field: "outputs" });
        }

        Ok(Treadle {
            name: self.name,
            predicates: self.predicates,
            validator: self.validator,
            filter: self.filter,
            pipeline: self.pipeline,
            shaper: self.shaper.unwrap_or_else(|| Arc::new(default_shaper)),
            outputs: self.outputs,
            hookup: self.hookup,
        })
    }
}

// ── Registry ─────────────────────────────────────────────────────────────────

/// Treadles in registration order. Order is the first-match tie-break.
#[derive(Debug, Clone, Default)]
pub struct TreadleRegistry {
    treadles: Vec<Treadle>,
}

impl TreadleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// # Errors
    ///
    /// `InvalidValue` when the name is already registered.
    pub fn register(&mut self, treadle: Treadle) -> Result<(), DomainError> {
        if self.get(treadle.name()).is_some() {
            return Err(DomainError::InvalidValue {
                kind: "duplicate treadle",
                value: treadle.name,
            });
        }
        self.treadles.push(treadle);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Treadle> {
        self.treadles.iter().find(|t| t.name() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Treadle> {
        self.treadles.iter()
    }

    pub fn len(&self) -> usize {
        self.treadles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.treadles.is_empty()
    }
}

// ── Stock shaper, filters, transforms, validators ───────────────────────────

fn ring_value(ring: &Ring) -> serde_json::Value {
    json!({
        "key": ring.key,
        "role": ring.role_tag.as_str(),
        "language": ring.language.as_str(),
        "package": ring.metadata.package,
        "path": ring.metadata.path.to_string(),
    })
}

/// Spec names plus both rings' identities.
pub fn default_shaper(input: &ShapeInput<'_>) -> RenderContext {
    RenderContext::named(input.spec.name())
        .with("reach", input.spec.reach().as_str())
        .with("current", ring_value(input.current))
        .with("previous", ring_value(input.previous))
}

pub mod filters {
    use super::*;

    /// Keep methods carrying `tag`.
    pub fn tagged(tag: &str) -> MethodFilter {
        let tag = tag.to_string();
        Arc::new(move |m: &MethodSpec| m.has_tag(&tag))
    }

    /// Drop methods carrying `tag`.
    pub fn not_tagged(tag: &str) -> MethodFilter {
        let tag = tag.to_string();
        Arc::new(move |m: &MethodSpec| !m.has_tag(&tag))
    }

    pub fn crud_in(tags: &[CrudTag]) -> MethodFilter {
        let tags = tags.to_vec();
        Arc::new(move |m: &MethodSpec| tags.contains(&m.crud))
    }
}

pub mod transforms {
    use super::*;

    pub fn camel_case_names() -> MethodTransform {
        Arc::new(|mut m: MethodSpec| {
            m.name = to_camel_case(&m.name);
            for p in &mut m.params {
                p.name = to_camel_case(&p.name);
            }
            m
        })
    }

    pub fn snake_case_names() -> MethodTransform {
        Arc::new(|mut m: MethodSpec| {
            m.name = to_snake_case(&m.name);
            for p in &mut m.params {
                p.name = to_snake_case(&p.name);
            }
            m
        })
    }

    pub fn rename(from: &str, to: &str) -> MethodTransform {
        let (from, to) = (from.to_string(), to.to_string());
        Arc::new(move |mut m: MethodSpec| {
            if m.name == from {
                m.name = to.clone();
            }
            m
        })
    }

    /// Prepend a parameter unless one with the same name exists.
    pub fn inject_param(param: ParamSpec) -> MethodTransform {
        Arc::new(move |mut m: MethodSpec| {
            if !m.params.iter().any(|p| p.name == param.name) {
                m.params.insert(0, param.clone());
            }
            m
        })
    }

    /// Fill in a CRUD tag from the method name when none was declared.
    pub fn infer_crud() -> MethodTransform {
        Arc::new(|mut m: MethodSpec| {
            if m.crud == CrudTag::None {
                m.crud = CrudTag::infer_from_name(&m.name);
            }
            m
        })
    }
}

pub mod validators {
    use super::*;

    /// Wrapped ring language must match the spiraler's declared previous language.
    pub fn previous_language(current: &Ring, previous: &Ring) -> Result<(), String> {
        DomainValidator::is_adjacent(current, previous)?;
        DomainValidator::previous_language_matches(current, previous)
    }

    /// As [`previous_language`], and the wrapped ring must play `role`.
    pub fn wraps(role: &'static str) -> impl Fn(&Ring, &Ring) -> Result<(), String> {
        move |current, previous| {
            previous_language(current, previous)?;
            let expected = RoleTag::new(role).map_err(|e| e.to_string())?;
            DomainValidator::wraps_role(current, previous, &expected)
        }
    }
}
