//! The file-edit ledger: the session's working set.
//!
//! An insertion-ordered mapping from file path to its edit record - the
//! single source of truth for "what has this session changed, and what is
//! its accept/undo state". At most one record exists per path; repeat edits
//! merge into the existing record (see [`FileEdit::merge`]).
//!
//! All operations are synchronous and must run on the session's single
//! logical owner. Undo/keep/discard are safe to call repeatedly: requests
//! against entries not in the expected status are silent no-ops.

use std::path::Path;

use waypoint_types::{EditStatus, FileEdit};

use crate::error::EditError;
use crate::fs::WorkspaceFs;
use crate::tool;

/// Ordered working set of in-flight file edits.
///
/// The working set stays small (files touched by one agent session), so
/// lookups scan the insertion-ordered entries directly.
#[derive(Debug, Default)]
pub struct FileEditLedger {
    entries: Vec<FileEdit>,
}

impl FileEditLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn entries(&self) -> &[FileEdit] {
        &self.entries
    }

    #[must_use]
    pub fn get(&self, path: &Path) -> Option<&FileEdit> {
        self.entries.iter().find(|e| e.path() == path)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Cheap clone of the current entries, in insertion order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<FileEdit> {
        self.entries.clone()
    }

    /// Track a new edit, merging into an existing record for the same path.
    pub fn record(&mut self, edit: FileEdit) {
        match self.entries.iter_mut().find(|e| e.path() == edit.path()) {
            Some(existing) => existing.merge(edit),
            None => self.entries.push(edit),
        }
    }

    /// Mark a pending edit as permanently accepted.
    ///
    /// No filesystem effect - the modification is already on disk. Silent
    /// no-op for untracked paths or entries not in `Pending`.
    pub fn keep(&mut self, path: &Path) {
        if let Some(entry) = self
            .entries
            .iter_mut()
            .find(|e| e.path() == path && e.status() == EditStatus::Pending)
        {
            entry.set_status(EditStatus::Kept);
        }
    }

    /// Reverse a pending edit on disk and mark it `Undone`.
    ///
    /// Silent no-op for untracked paths or entries not in `Pending`. A failed
    /// reversal propagates the error and leaves the entry `Pending` so the
    /// caller can retry.
    pub fn undo(&mut self, fs: &dyn WorkspaceFs, path: &Path) -> Result<(), EditError> {
        let Some(entry) = self
            .entries
            .iter_mut()
            .find(|e| e.path() == path && e.status() == EditStatus::Pending)
        else {
            return Ok(());
        };

        tool::reverse(fs, entry)?;
        entry.set_status(EditStatus::Undone);
        Ok(())
    }

    /// Undo a pending edit, then drop the entry from the ledger.
    ///
    /// The entry is removed even when the reversal fails - discard means
    /// "stop tracking this file" regardless of what could be restored on
    /// disk. The reversal error is still propagated after removal.
    pub fn discard(&mut self, fs: &dyn WorkspaceFs, path: &Path) -> Result<(), EditError> {
        let result = self.undo(fs, path);
        self.entries.retain(|e| e.path() != path);
        result
    }

    /// Drop every entry without touching the filesystem.
    pub fn reset(&mut self) {
        self.entries.clear();
    }
}
