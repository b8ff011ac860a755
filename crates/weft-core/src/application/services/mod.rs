//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! high-level use cases like "generate a workspace" or "dump the graph".

pub mod generation_service;
pub mod treadle_executor;
pub mod workspace_service;

pub use generation_service::{GenerateOptions, GenerationService};
pub use treadle_executor::TreadleExecutor;
pub use workspace_service::WorkspaceService;
