//! Idempotent build-descriptor patches.
//!
//! A hookup is a fenced text block inserted into an existing build file:
//!
//! ```text
//! // weft:begin native-binding:Bookmark
//! pub mod bookmark_binding;
//! // weft:end native-binding:Bookmark
//! ```
//!
//! Application is "find marker, no-op if present; else insert at anchor".
//! The same block present twice is impossible by construction; a block that
//! was edited since the last run is a conflict, not a silent overwrite.

use serde::Serialize;

use crate::domain::{entities::common::RelativePath, error::DomainError};

/// Where a new block goes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "lowercase")]
pub enum Anchor {
    /// Append at the end of the descriptor.
    End,
    /// Insert after the first line containing the text.
    After(String),
}

/// A rendered hookup ready to be applied to one descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hookup {
    /// Descriptor path relative to the workspace root.
    pub descriptor: RelativePath,
    pub marker: String,
    pub comment_prefix: String,
    pub anchor: Anchor,
    pub block: String,
    pub create_if_missing: bool,
}

/// Result of applying a hookup to descriptor text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookupOutcome {
    /// The descriptor changed; new full text.
    Applied(String),
    /// An identical block is already there.
    AlreadyPresent,
}

impl Hookup {
    pub fn begin_line(&self) -> String {
        format!("{} weft:begin {}", self.comment_prefix, self.marker)
    }

    pub fn end_line(&self) -> String {
        format!("{} weft:end {}", self.comment_prefix, self.marker)
    }

    /// The block with its fences, newline terminated.
    pub fn fenced(&self) -> String {
        format!(
            "{}\n{}\n{}\n",
            self.begin_line(),
            self.block.trim_end_matches('\n'),
            self.end_line()
        )
    }

    /// Apply to the current descriptor text. Pure.
    ///
    /// # Errors
    ///
    /// - `HookupConflict` when the marker exists with different content
    /// - `HookupAnchorMissing` when the anchor line is not found
    pub fn apply(&self, existing: &str) -> Result<HookupOutcome, DomainError> {
        let begin = self.begin_line();
        let end = self.end_line();
        let lines: Vec<(usize, &str)> = line_offsets(existing);

        if let Some(start) = lines.iter().position(|(_, l)| l.trim_end() == begin) {
            let inner_end = lines[start + 1..]
                .iter()
                .position(|(_, l)| l.trim_end() == end)
                .map(|i| start + 1 + i)
                .ok_or_else(|| self.conflict())?;

            let current: Vec<&str> = lines[start + 1..inner_end]
                .iter()
                .map(|(_, l)| l.trim_end_matches(['\n', '\r']))
                .collect();
            let wanted: Vec<&str> = self.block.trim_end_matches('\n').lines().collect();

            return if current == wanted {
                Ok(HookupOutcome::AlreadyPresent)
            } else {
                Err(self.conflict())
            };
        }

        let insert_at = match &self.anchor {
            Anchor::End => existing.len(),
            Anchor::After(text) => {
                let (offset, line) = lines
                    .iter()
                    .find(|(_, l)| l.contains(text.as_str()))
                    .ok_or_else(|| DomainError::HookupAnchorMissing {
                        descriptor: self.descriptor.to_string(),
                        anchor: text.clone(),
                    })?;
                offset + line.len()
            }
        };

        let (head, tail) = existing.split_at(insert_at);
        let mut out = String::with_capacity(existing.len() + self.block.len() + 64);
        out.push_str(head);
        if !head.is_empty() && !head.ends_with('\n') {
            out.push('\n');
        }
        out.push_str(&self.fenced());
        out.push_str(tail);

        Ok(HookupOutcome::Applied(out))
    }

    fn conflict(&self) -> DomainError {
        DomainError::HookupConflict {
            descriptor: self.descriptor.to_string(),
            marker: self.marker.clone(),
        }
    }
}

/// Lines with their byte offsets; each line keeps its terminator.
fn line_offsets(text: &str) -> Vec<(usize, &str)> {
    let mut offset = 0;
    text.split_inclusive('\n')
        .map(|line| {
            let start = offset;
            offset += line.len();
            (start, line)
        })
        .collect()
}
