pub mod common;
pub mod context;
pub mod generation;
pub mod hookup;
pub mod management;
pub mod ring;
pub mod treadle;

pub use crate::domain::DomainError;
pub use context::RenderContext;
pub use generation::{Artifact, GenerationPlan, GenerationReport, PendingHookup, TreadleOutput};
pub use hookup::{Anchor, Hookup, HookupOutcome};
pub use management::{EntityDecl, ManagementCatalog, ManagementSpec, MethodSpec, ParamSpec};
pub use ring::{CoreDef, LoomPlan, Ring, RingGraph, RingId, RingPair, RingRole, Spiral, SpiralerDef};
pub use treadle::{HookupSpec, OutputSpec, RolePattern, ShapeInput, Treadle, TreadleRegistry};
