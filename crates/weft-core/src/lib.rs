//! Weft Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for the Weft
//! multi-target adaptor generator, following hexagonal (ports and adapters)
//! architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │             weft-cli (CLI)              │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │ (GenerationService, WorkspaceService)   │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │       Application Ports (Traits)        │
//! │ (SpecCollector, Filesystem, Renderer)   │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │     weft-adapters (Infrastructure)      │
//! └─────────────────────────────────────────┘
//!
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │  specs · rings · heddles · treadles ·   │
//! │  type mapping · hookups                 │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use weft_core::application::{GenerateOptions, GenerationService};
//!
//! let service = GenerationService::new(collector, renderer, filesystem, registry);
//! let report = service.generate("./workspace", GenerateOptions::default())?;
//! println!("{} files written", report.files_written);
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        GenerateOptions, GenerationService, Workspace, WorkspaceService,
        ports::{Filesystem, SpecCollector, TemplateRenderer},
    };
    pub use crate::domain::{
        CrudTag, Language, ManagementCatalog, ManagementSpec, Reach, RingGraph, RoleTag, Treadle,
        TreadleRegistry, TypeMappingTable,
    };
    pub use crate::error::{WeftError, WeftResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
