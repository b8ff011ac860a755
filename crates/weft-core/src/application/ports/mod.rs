//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `weft-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `SpecCollector`: Workspace discovery
//!   - `Filesystem`: File operations
//!   - `TemplateRenderer`: Template rendering
//!
//! - **Driving (Input) Ports**: Called by external world, implemented by services
//!   - (Defined in CLI layer, implemented by services)

pub mod output;

pub use output::{Filesystem, SpecCollector, TemplateRenderer};
