//! Workspace Service - read-only views over a collected workspace.
//!
//! Backs the `list`, `graph` and `types` commands. Nothing here renders or
//! writes.

use std::path::Path;

use tracing::{debug, instrument};

use crate::{
    application::{ports::SpecCollector, workspace::Workspace},
    domain::{Language, RingGraph, TypeMappingEntry, TypeMappingTable},
    error::WeftResult,
};

pub struct WorkspaceService {
    collector: Box<dyn SpecCollector>,
}

impl WorkspaceService {
    pub fn new(collector: Box<dyn SpecCollector>) -> Self {
        Self { collector }
    }

    /// Collect specs, entities and plan.
    #[instrument(skip_all, fields(root = %root.as_ref().display()))]
    pub fn load(&self, root: impl AsRef<Path>) -> WeftResult<Workspace> {
        let workspace = self.collector.collect(root.as_ref())?;
        debug!(specs = workspace.catalog.len(), "Workspace loaded");
        Ok(workspace)
    }

    /// Collect and assemble the ring graph.
    pub fn graph(&self, root: impl AsRef<Path>) -> WeftResult<(Workspace, RingGraph)> {
        let workspace = self.load(root)?;
        let graph = RingGraph::assemble(&workspace.catalog, &workspace.plan)?;
        Ok((workspace, graph))
    }

    /// Builtin mapping rows, optionally for one language.
    pub fn builtin_types(language: Option<Language>) -> Vec<TypeMappingEntry> {
        Self::rows(&TypeMappingTable::with_builtins(), language)
    }

    /// Mapping rows of a collected workspace, entities included.
    pub fn workspace_types(
        workspace: &Workspace,
        language: Option<Language>,
    ) -> Vec<TypeMappingEntry> {
        Self::rows(&workspace.types, language)
    }

    fn rows(table: &TypeMappingTable, language: Option<Language>) -> Vec<TypeMappingEntry> {
        let languages = match language {
            Some(l) => vec![l],
            None => Language::ALL.to_vec(),
        };
        languages
            .into_iter()
            .flat_map(|l| table.entries_for(l).into_iter().cloned())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::type_mapping::BUILTIN_TYPES;

    #[test]
    fn builtin_rows_cover_every_language() {
        let all = WorkspaceService::builtin_types(None);
        assert_eq!(all.len(), BUILTIN_TYPES.len() * Language::ALL.len());

        let kotlin = WorkspaceService::builtin_types(Some(Language::Kotlin));
        assert_eq!(kotlin.len(), BUILTIN_TYPES.len());
        assert!(kotlin.iter().all(|e| e.language == Language::Kotlin));
    }
}
