//! Working-set views: diff-view reconciliation and display entries.
//!
//! Whenever the ledger changes, an open comparison view must be kept
//! consistent with it. [`reconcile`] is the pure decision function: given
//! the previous and new ledger snapshots and the file currently on display,
//! it says whether the view stays, refreshes, or closes.

use std::path::Path;

use waypoint_types::{EditStatus, EditToolKind, FileEdit};
use waypoint_utils::{DiffStats, compute_diff_stats};

/// What the comparison view should do after a ledger change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffViewAction {
    /// Nothing relevant changed; leave the view alone.
    Keep,
    /// The displayed file's edit changed; reload the view with this record.
    Refresh(FileEdit),
    /// The displayed file is no longer diffable; close the view.
    Close,
}

/// Decide how an open comparison view reacts to a ledger change.
///
/// - empty working set: close;
/// - displayed file dropped from the ledger: close;
/// - displayed edit became `Undone` for a created file: close (the file no
///   longer exists to diff);
/// - displayed edit otherwise changed: refresh with the new record;
/// - anything else: keep.
#[must_use]
pub fn reconcile(
    previous: &[FileEdit],
    current: &[FileEdit],
    displayed: Option<&Path>,
) -> DiffViewAction {
    let Some(displayed) = displayed else {
        return DiffViewAction::Keep;
    };

    if current.is_empty() {
        return DiffViewAction::Close;
    }

    let Some(updated) = current.iter().find(|e| e.path() == displayed) else {
        return DiffViewAction::Close;
    };

    let known = previous.iter().find(|e| e.path() == displayed);
    if known == Some(updated) {
        return DiffViewAction::Keep;
    }

    if updated.status() == EditStatus::Undone && updated.tool() == EditToolKind::CreateFile {
        return DiffViewAction::Close;
    }

    DiffViewAction::Refresh(updated.clone())
}

/// One row of the working-set display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkingSetEntry {
    pub edit: FileEdit,
    pub stats: DiffStats,
}

/// Build display rows for a ledger snapshot, with per-file diff stats.
#[must_use]
pub fn working_set(snapshot: &[FileEdit]) -> Vec<WorkingSetEntry> {
    snapshot
        .iter()
        .map(|edit| WorkingSetEntry {
            stats: compute_diff_stats(edit.original_content(), edit.modified_content()),
            edit: edit.clone(),
        })
        .collect()
}
