//! File edit records.
//!
//! A [`FileEdit`] captures one agent-proposed mutation to a single file:
//! the content before any mutation in the session, the content after, which
//! tool produced it, and where it sits in the accept/undo lifecycle.
//!
//! Two copies of these records exist at runtime with different mutability:
//! the live ledger entry (status changes as the user accepts or undoes) and
//! the snapshot attached to a conversation turn (frozen at execution time).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Which edit operation produced a record.
///
/// Reversal dispatch is driven entirely by this kind; unknown operations map
/// to [`EditToolKind::Other`], whose forward and reverse are deliberate
/// no-ops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditToolKind {
    /// The file did not exist before this session; reverse deletes it.
    CreateFile,
    /// Whole-file content replacement; reverse restores the original text.
    InsertOrReplace,
    /// Tracked for bookkeeping only; no forward/reverse effect.
    Other,
}

/// Accept/undo lifecycle of a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditStatus {
    /// On disk, awaiting a user decision.
    #[default]
    Pending,
    /// Permanently accepted; no further filesystem effect possible.
    Kept,
    /// Reverted on disk; the record remains for redo bookkeeping.
    Undone,
}

/// One agent-proposed mutation to a single file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEdit {
    path: PathBuf,
    original_content: String,
    modified_content: String,
    tool: EditToolKind,
    #[serde(default)]
    status: EditStatus,
}

impl FileEdit {
    #[must_use]
    pub fn new(
        path: impl Into<PathBuf>,
        original_content: impl Into<String>,
        modified_content: impl Into<String>,
        tool: EditToolKind,
    ) -> Self {
        Self {
            path: path.into(),
            original_content: original_content.into(),
            modified_content: modified_content.into(),
            tool,
            status: EditStatus::Pending,
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn original_content(&self) -> &str {
        &self.original_content
    }

    #[must_use]
    pub fn modified_content(&self) -> &str {
        &self.modified_content
    }

    #[must_use]
    pub fn tool(&self) -> EditToolKind {
        self.tool
    }

    #[must_use]
    pub fn status(&self) -> EditStatus {
        self.status
    }

    pub fn set_status(&mut self, status: EditStatus) {
        self.status = status;
    }

    /// Fold a newer edit to the same path into this record.
    ///
    /// The pre-session baseline (`original_content`) and the first edit's
    /// `tool` are preserved so reversal always restores the true starting
    /// point; only `modified_content` advances. The merged record is back in
    /// `Pending` regardless of any earlier keep/undo decision, since new
    /// content is on disk again.
    pub fn merge(&mut self, newer: FileEdit) {
        debug_assert_eq!(self.path, newer.path, "merge requires matching paths");
        self.modified_content = newer.modified_content;
        self.status = EditStatus::Pending;
    }
}
