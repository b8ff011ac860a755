use std::path::PathBuf;

use crate::domain::{EntityDecl, LoomPlan, ManagementCatalog, TypeMappingTable};

/// Everything discovery produced for one workspace.
#[derive(Debug, Clone)]
pub struct Workspace {
    pub name: String,
    pub root: PathBuf,
    pub entities: Vec<EntityDecl>,
    /// Builtins plus every entity, frozen before generation starts.
    pub types: TypeMappingTable,
    pub catalog: ManagementCatalog,
    pub plan: LoomPlan,
}
