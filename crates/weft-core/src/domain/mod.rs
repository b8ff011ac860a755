// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for Weft.
//!
//! This module contains pure generation logic. All I/O and templating
//! concerns are handled via ports (traits) defined in the application layer.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No async**: Domain logic is synchronous
//! - **No I/O**: No filesystem, network, or external calls
//! - **Immutable inputs**: Specs, rings and treadles are read-only once built
//! - **Rich domain model**: Behavior lives in entities, not services
//!
// Public API - what the world sees
pub mod entities;
pub mod error;
pub mod heddles;
pub mod naming;
pub mod type_mapping;
pub mod value_objects;

mod validation;

// Re-exports for convenience
pub use entities::{
    common::RelativePath,
    context::RenderContext,
    generation::{Artifact, GenerationPlan, GenerationReport, PendingHookup, TreadleOutput},
    hookup::{Anchor, Hookup, HookupOutcome},
    management::{EntityDecl, ManagementCatalog, ManagementSpec, MethodSpec, ParamSpec},
    ring::{
        CoreDef, LoomPlan, Ring, RingGraph, RingId, RingMetadata, RingPair, RingRole, Spiral,
        SpiralerDef,
    },
    treadle::{
        DataShaper, HookupSpec, MatchPredicate, MethodFilter, MethodTransform, OutputSpec,
        RolePattern, ShapeInput, Treadle, TreadleBuilder, TreadleRegistry, Validator,
        default_shaper, filters, transforms, validators,
    },
};

pub use error::{DomainError, ErrorCategory};
pub use heddles::select_treadle;
pub use type_mapping::{ConversionHelper, TypeMappingEntry, TypeMappingTable, conversion_helper};
pub use validation::DomainValidator;

pub use value_objects::{CrudTag, Language, Reach, RoleTag, SerializationStrategy};
