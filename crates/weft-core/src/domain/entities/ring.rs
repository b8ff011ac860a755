//! Rings, spirals and the ring graph.
//!
//! # Design
//!
//! Rings live in an arena ([`RingGraph`]) and refer to each other by
//! [`RingId`]. A spiraler's "wraps" link is a parent index, so the graph has
//! no reference cycles and serializes directly for debug dumps.
//!
//! ```text
//!   Core(Bookmark, typescript)
//!     ├── front-domain (typescript)
//!     │     └── mobile-binding (kotlin)        spiral: [core, front, mobile]
//!     └── ipc-descriptor (json)                spiral: [core, ipc]
//! ```
//!
//! A [`LoomPlan`] declares that shape once per workspace; assembly stamps it
//! out for every collected spec.

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

use crate::domain::{
    entities::{
        common::RelativePath,
        management::{ManagementCatalog, ManagementSpec},
    },
    error::DomainError,
    value_objects::{Language, Reach, RoleTag},
};

/// Index of a ring inside a [`RingGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RingId(pub usize);

impl fmt::Display for RingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Package identity of a ring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RingMetadata {
    /// Package name as the target ecosystem knows it (`@app/front`).
    pub package: String,
    /// Package root relative to the workspace root.
    pub path: RelativePath,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum RingRole {
    Core,
    Spiraler {
        wraps: RingId,
        core: RingId,
        /// Language this spiraler expects the wrapped ring to be written in.
        previous_language: Language,
    },
}

/// One language-specific layer over a management spec.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ring {
    pub id: RingId,
    pub spec: String,
    #[serde(skip)]
    pub spec_index: usize,
    /// Plan key of the spiraler that produced this ring; `core` for cores.
    pub key: String,
    pub role_tag: RoleTag,
    pub language: Language,
    pub metadata: RingMetadata,
    pub role: RingRole,
}

impl Ring {
    pub fn is_core(&self) -> bool {
        matches!(self.role, RingRole::Core)
    }

    pub fn wraps(&self) -> Option<RingId> {
        match self.role {
            RingRole::Core => None,
            RingRole::Spiraler { wraps, .. } => Some(wraps),
        }
    }

    pub fn previous_language(&self) -> Option<Language> {
        match self.role {
            RingRole::Core => None,
            RingRole::Spiraler {
                previous_language, ..
            } => Some(previous_language),
        }
    }
}

// ── Plan ─────────────────────────────────────────────────────────────────────

/// Declaration of one spiraler and the spiralers that wrap it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpiralerDef {
    pub key: String,
    pub role: RoleTag,
    pub language: Language,
    pub previous_language: Language,
    pub package: String,
    pub path: RelativePath,
    /// Specs with a narrower reach are not projected through this spiraler.
    pub min_reach: Reach,
    pub spiralers: Vec<SpiralerDef>,
}

impl SpiralerDef {
    pub fn new(
        key: impl Into<String>,
        role: RoleTag,
        language: Language,
        previous_language: Language,
        package: impl Into<String>,
        path: RelativePath,
    ) -> Self {
        Self {
            key: key.into(),
            role,
            language,
            previous_language,
            package: package.into(),
            path,
            min_reach: Reach::Private,
            spiralers: Vec::new(),
        }
    }

    pub fn min_reach(mut self, reach: Reach) -> Self {
        self.min_reach = reach;
        self
    }

    pub fn wrapped_by(mut self, spiraler: SpiralerDef) -> Self {
        self.spiralers.push(spiraler);
        self
    }

    fn accepts(&self, spec: &ManagementSpec) -> bool {
        spec.reach() >= self.min_reach
    }
}

/// Declaration of the core ring every spec starts from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoreDef {
    pub role: RoleTag,
    pub language: Language,
    pub package: String,
    pub path: RelativePath,
    pub spiralers: Vec<SpiralerDef>,
}

impl CoreDef {
    pub fn new(language: Language, package: impl Into<String>, path: RelativePath) -> Self {
        Self {
            role: RoleTag::core(),
            language,
            package: package.into(),
            path,
            spiralers: Vec::new(),
        }
    }

    pub fn wrapped_by(mut self, spiraler: SpiralerDef) -> Self {
        self.spiralers.push(spiraler);
        self
    }

    /// Direct spiralers keyed by target key, in declaration order.
    pub fn spiralers(&self) -> Vec<(&str, &SpiralerDef)> {
        self.spiralers.iter().map(|s| (s.key.as_str(), s)).collect()
    }
}

/// The workspace's wrap shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoomPlan {
    pub core: CoreDef,
}

impl LoomPlan {
    /// Create a plan.
    ///
    /// # Errors
    ///
    /// `InvalidGraph` when a spiraler key is empty or used twice.
    pub fn new(core: CoreDef) -> Result<Self, DomainError> {
        fn visit<'a>(
            defs: &'a [SpiralerDef],
            seen: &mut HashSet<&'a str>,
        ) -> Result<(), DomainError> {
            for def in defs {
                if def.key.trim().is_empty() {
                    return Err(DomainError::InvalidGraph("spiraler with empty key".into()));
                }
                if def.key == RoleTag::CORE || !seen.insert(def.key.as_str()) {
                    return Err(DomainError::InvalidGraph(format!(
                        "spiraler key '{}' is not unique",
                        def.key
                    )));
                }
                visit(&def.spiralers, seen)?;
            }
            Ok(())
        }

        visit(&core.spiralers, &mut HashSet::new())?;
        Ok(Self { core })
    }
}

// ── Graph ────────────────────────────────────────────────────────────────────

/// Ordered chain of rings for one spec along one plan path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Spiral {
    pub spec: String,
    pub rings: Vec<RingId>,
}

impl Spiral {
    pub fn core(&self) -> RingId {
        self.rings[0]
    }
}

/// An adjacent `(current, previous)` pair of a spiral.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct RingPair {
    pub current: RingId,
    pub previous: RingId,
}

/// Arena of rings plus the spirals threading through them.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RingGraph {
    rings: Vec<Ring>,
    spirals: Vec<Spiral>,
}

impl RingGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp the plan out for every spec of the catalog, in catalog order.
    pub fn assemble(catalog: &ManagementCatalog, plan: &LoomPlan) -> Result<Self, DomainError> {
        let mut graph = Self::new();

        for (index, spec) in catalog.specs().iter().enumerate() {
            let core = graph.add_core(spec.name(), index, &plan.core);
            let mut chain = vec![core];
            let before = graph.spirals.len();

            graph.grow(spec, &plan.core.spiralers, &mut chain)?;

            if graph.spirals.len() == before {
                graph.push_spiral(chain)?;
            }
        }

        Ok(graph)
    }

    fn grow(
        &mut self,
        spec: &ManagementSpec,
        defs: &[SpiralerDef],
        chain: &mut Vec<RingId>,
    ) -> Result<(), DomainError> {
        let previous = *chain
            .last()
            .ok_or_else(|| DomainError::InvalidGraph("empty chain".into()))?;

        for def in defs.iter().filter(|d| d.accepts(spec)) {
            let id = self.wrap(previous, def)?;
            chain.push(id);

            if def.spiralers.iter().any(|d| d.accepts(spec)) {
                self.grow(spec, &def.spiralers, chain)?;
            } else {
                self.push_spiral(chain.clone())?;
            }

            chain.pop();
        }
        Ok(())
    }

    /// Add a core ring for a spec.
    pub fn add_core(&mut self, spec: &str, spec_index: usize, def: &CoreDef) -> RingId {
        let id = RingId(self.rings.len());
        self.rings.push(Ring {
            id,
            spec: spec.to_string(),
            spec_index,
            key: RoleTag::CORE.to_string(),
            role_tag: def.role.clone(),
            language: def.language,
            metadata: RingMetadata {
                package: def.package.clone(),
                path: def.path.clone(),
            },
            role: RingRole::Core,
        });
        id
    }

    /// Wrap `previous` with a new spiraler ring.
    ///
    /// # Errors
    ///
    /// `InvalidGraph` if `previous` is not in this graph.
    pub fn wrap(&mut self, previous: RingId, def: &SpiralerDef) -> Result<RingId, DomainError> {
        let wrapped = self.get(previous)?;
        let core = match wrapped.role {
            RingRole::Core => previous,
            RingRole::Spiraler { core, .. } => core,
        };
        let spec = wrapped.spec.clone();
        let spec_index = wrapped.spec_index;

        let id = RingId(self.rings.len());
        self.rings.push(Ring {
            id,
            spec,
            spec_index,
            key: def.key.clone(),
            role_tag: def.role.clone(),
            language: def.language,
            metadata: RingMetadata {
                package: def.package.clone(),
                path: def.path.clone(),
            },
            role: RingRole::Spiraler {
                wraps: previous,
                core,
                previous_language: def.previous_language,
            },
        });
        Ok(id)
    }

    /// Register a spiral.
    ///
    /// # Errors
    ///
    /// `InvalidGraph` unless the chain starts at a core and every later ring
    /// wraps its predecessor.
    pub fn push_spiral(&mut self, rings: Vec<RingId>) -> Result<(), DomainError> {
        let first = rings
            .first()
            .ok_or_else(|| DomainError::InvalidGraph("empty spiral".into()))?;
        let core = self.get(*first)?;
        if !core.is_core() {
            return Err(DomainError::InvalidGraph(format!(
                "spiral must start at a core ring, found {}",
                first
            )));
        }
        let spec = core.spec.clone();

        for window in rings.windows(2) {
            if self.get(window[1])?.wraps() != Some(window[0]) {
                return Err(DomainError::InvalidGraph(format!(
                    "ring {} does not wrap {}",
                    window[1], window[0]
                )));
            }
        }

        self.spirals.push(Spiral { spec, rings });
        Ok(())
    }

    pub fn get(&self, id: RingId) -> Result<&Ring, DomainError> {
        self.rings
            .get(id.0)
            .ok_or_else(|| DomainError::InvalidGraph(format!("unknown ring {}", id)))
    }

    pub fn rings(&self) -> &[Ring] {
        &self.rings
    }

    pub fn spirals(&self) -> &[Spiral] {
        &self.spirals
    }

    /// Rings directly wrapping `id`, in creation order.
    pub fn children(&self, id: RingId) -> Vec<&Ring> {
        self.rings.iter().filter(|r| r.wraps() == Some(id)).collect()
    }

    pub fn cores(&self) -> impl Iterator<Item = &Ring> {
        self.rings.iter().filter(|r| r.is_core())
    }

    /// Every adjacent pair across every spiral, once, in spiral order.
    pub fn pairs(&self) -> Vec<RingPair> {
        let mut seen = HashSet::new();
        let mut pairs = Vec::new();
        for spiral in &self.spirals {
            for window in spiral.rings.windows(2) {
                let pair = RingPair {
                    current: window[1],
                    previous: window[0],
                };
                if seen.insert(pair) {
                    pairs.push(pair);
                }
            }
        }
        pairs
    }
}
