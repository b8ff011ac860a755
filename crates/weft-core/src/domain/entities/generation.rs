//! Output of one generation run, before and after it reaches the disk.

use std::collections::HashMap;

use serde::Serialize;

use crate::domain::{
    entities::{common::RelativePath, hookup::Hookup},
    error::DomainError,
    value_objects::Language,
};

/// One rendered file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Artifact {
    /// Path relative to the workspace root.
    pub path: RelativePath,
    #[serde(skip)]
    pub content: String,
    pub language: Language,
    pub treadle: String,
    pub spec: String,
}

impl Artifact {
    /// `treadle/spec`, used to name both writers in a collision.
    pub fn origin(&self) -> String {
        format!("{}/{}", self.treadle, self.spec)
    }
}

/// A rendered hookup waiting for the single-writer phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingHookup {
    pub hookup: Hookup,
    pub treadle: String,
    pub spec: String,
}

impl PendingHookup {
    /// `treadle/spec (hookup)`.
    pub fn origin(&self) -> String {
        format!("{}/{} (hookup)", self.treadle, self.spec)
    }
}

/// Everything one treadle execution produced for one pair.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreadleOutput {
    pub artifacts: Vec<Artifact>,
    pub hookup: Option<PendingHookup>,
}

/// All artifacts and hookups of a run, in traversal order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GenerationPlan {
    artifacts: Vec<Artifact>,
    hookups: Vec<PendingHookup>,
    pairs_visited: usize,
    pairs_skipped: usize,
}

impl GenerationPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a matched pair's output.
    pub fn push(&mut self, output: TreadleOutput) {
        self.pairs_visited += 1;
        self.artifacts.extend(output.artifacts);
        self.hookups.extend(output.hookup);
    }

    /// Record a pair no treadle applies to.
    pub fn skip(&mut self) {
        self.pairs_visited += 1;
        self.pairs_skipped += 1;
    }

    /// Path uniqueness across the whole run.
    ///
    /// A hookup descriptor may be shared by several hookups but never by a
    /// rendered artifact.
    ///
    /// # Errors
    ///
    /// `OutputCollision` naming the path and both writers.
    pub fn validate(&self) -> Result<(), DomainError> {
        let mut owners: HashMap<&RelativePath, &Artifact> = HashMap::new();
        for artifact in &self.artifacts {
            if let Some(first) = owners.insert(&artifact.path, artifact) {
                return Err(DomainError::OutputCollision {
                    path: artifact.path.to_string(),
                    first: first.origin(),
                    second: artifact.origin(),
                });
            }
        }

        for pending in &self.hookups {
            if let Some(artifact) = owners.get(&pending.hookup.descriptor) {
                return Err(DomainError::OutputCollision {
                    path: pending.hookup.descriptor.to_string(),
                    first: artifact.origin(),
                    second: pending.origin(),
                });
            }
        }
        Ok(())
    }

    pub fn artifacts(&self) -> &[Artifact] {
        &self.artifacts
    }

    pub fn hookups(&self) -> &[PendingHookup] {
        &self.hookups
    }

    pub fn pairs_visited(&self) -> usize {
        self.pairs_visited
    }

    pub fn pairs_skipped(&self) -> usize {
        self.pairs_skipped
    }
}

/// Counters reported at the end of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GenerationReport {
    pub run_id: String,
    pub specs: usize,
    pub pairs_visited: usize,
    pub pairs_skipped: usize,
    pub files_written: usize,
    pub files_unchanged: usize,
    pub hookups_applied: usize,
    pub hookups_present: usize,
    pub dry_run: bool,
    /// Every artifact path, workspace relative.
    pub files: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::hookup::Anchor;

    fn artifact(path: &str, treadle: &str) -> Artifact {
        Artifact {
            path: RelativePath::try_new(path).unwrap(),
            content: String::new(),
            language: Language::TypeScript,
            treadle: treadle.into(),
            spec: "Bookmark".into(),
        }
    }

    #[test]
    fn detects_duplicate_paths() {
        let mut plan = GenerationPlan::new();
        plan.push(TreadleOutput {
            artifacts: vec![artifact("front/src/a.ts", "front-port")],
            hookup: None,
        });
        plan.push(TreadleOutput {
            artifacts: vec![artifact("front/src/a.ts", "shadow")],
            hookup: None,
        });

        assert_eq!(
            plan.validate().unwrap_err(),
            DomainError::OutputCollision {
                path: "front/src/a.ts".into(),
                first: "front-port/Bookmark".into(),
                second: "shadow/Bookmark".into(),
            }
        );
    }

    fn hookup(descriptor: &str, treadle: &str) -> PendingHookup {
        PendingHookup {
            hookup: Hookup {
                descriptor: RelativePath::try_new(descriptor).unwrap(),
                marker: format!("{treadle}:bookmark"),
                comment_prefix: "//".into(),
                anchor: Anchor::End,
                block: "export".into(),
                create_if_missing: true,
            },
            treadle: treadle.into(),
            spec: "Bookmark".into(),
        }
    }

    #[test]
    fn descriptor_sharing_an_artifact_path_collides() {
        let mut plan = GenerationPlan::new();
        plan.push(TreadleOutput {
            artifacts: vec![artifact("front/src/index.ts", "shadow")],
            hookup: None,
        });
        plan.push(TreadleOutput {
            artifacts: vec![artifact("front/src/ports/bookmark.port.ts", "front-port")],
            hookup: Some(hookup("front/src/index.ts", "front-port")),
        });

        assert_eq!(
            plan.validate().unwrap_err(),
            DomainError::OutputCollision {
                path: "front/src/index.ts".into(),
                first: "shadow/Bookmark".into(),
                second: "front-port/Bookmark (hookup)".into(),
            }
        );
    }

    #[test]
    fn hookups_may_share_a_descriptor() {
        let mut plan = GenerationPlan::new();
        plan.push(TreadleOutput {
            artifacts: vec![artifact("front/src/ports/a.port.ts", "front-port")],
            hookup: Some(hookup("front/src/index.ts", "front-port")),
        });
        plan.push(TreadleOutput {
            artifacts: vec![artifact("front/src/ports/b.port.ts", "front-port")],
            hookup: Some(hookup("front/src/index.ts", "other")),
        });
        assert!(plan.validate().is_ok());
    }

    #[test]
    fn counts_pairs() {
        let mut plan = GenerationPlan::new();
        plan.push(TreadleOutput::default());
        plan.skip();
        assert_eq!(plan.pairs_visited(), 2);
        assert_eq!(plan.pairs_skipped(), 1);
        assert!(plan.validate().is_ok());
    }
}
