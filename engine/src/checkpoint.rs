//! Checkpoint cursor and the ordered revert/redo passes.
//!
//! A checkpoint jump suspends every turn after the target and reverts their
//! file edits; undoing the jump reapplies them. The passes walk the
//! suspended span in opposite directions with a first-seen-wins rule per
//! path:
//!
//! - **Revert** runs oldest-to-newest so that when several turns touched the
//!   same file, the earliest snapshot's `original_content` (the true
//!   pre-span baseline) is what lands on disk.
//! - **Redo** runs newest-to-oldest so the latest snapshot's
//!   `modified_content` wins.
//!
//! Passes never abort on a per-file failure: partial restoration is more
//! useful than total rollback. Failures are logged and accumulated in the
//! pass report.

use std::collections::HashSet;
use std::path::PathBuf;

use waypoint_store::ConversationTurn;
use waypoint_types::{EditToolKind, TurnId};

use crate::error::EditError;
use crate::fs::WorkspaceFs;
use crate::tool;

/// Transient pointer marking "the point the user wants to treat as current".
///
/// Created on the first restore action; cleared on explicit discard, on
/// undo-of-checkpoint, or when a new user turn replaces the suspended span.
#[derive(Debug, Default)]
pub struct CheckpointCursor {
    pending_turn: Option<TurnId>,
    saved_draft: Option<String>,
}

impl CheckpointCursor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn pending_turn(&self) -> Option<TurnId> {
        self.pending_turn
    }

    #[must_use]
    pub fn is_restored(&self) -> bool {
        self.pending_turn.is_some()
    }

    /// Point the cursor at `turn`, snapshotting `draft` on first entry only.
    ///
    /// Re-targeting while already restored keeps the original draft
    /// snapshot - it belongs to the state before the *first* jump.
    pub fn begin(&mut self, turn: TurnId, draft: &str) {
        if self.pending_turn.is_none() {
            self.saved_draft = Some(draft.to_string());
        }
        self.pending_turn = Some(turn);
    }

    /// Leave the restored state, yielding the draft saved on first entry.
    pub fn take_back(&mut self) -> Option<String> {
        self.pending_turn = None;
        self.saved_draft.take()
    }

    /// Leave the restored state, dropping the saved draft.
    pub fn clear(&mut self) {
        self.pending_turn = None;
        self.saved_draft = None;
    }
}

/// Outcome of one revert or redo pass, for diagnostics.
///
/// `applied` are paths whose filesystem operation ran; `skipped` are paths
/// claimed without a filesystem action (later duplicates under
/// first-seen-wins, and `Other`-kind edits); `failures` carry the per-file
/// errors the pass continued past.
#[derive(Debug, Default)]
pub struct CheckpointPassReport {
    pub applied: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
    pub failures: Vec<(PathBuf, EditError)>,
}

impl CheckpointPassReport {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Revert the file edits of a suspended span, oldest turn first.
///
/// Each path is processed once; the earliest snapshot for it wins, restoring
/// the content from immediately before the span touched the file. Safe to
/// re-run after an interruption: reversal of already-reverted files is a
/// no-op.
pub fn revert_span(fs: &dyn WorkspaceFs, span: &[ConversationTurn]) -> CheckpointPassReport {
    let mut report = CheckpointPassReport::default();
    let mut seen: HashSet<PathBuf> = HashSet::new();

    for turn in span {
        for edit in turn.file_edits() {
            if !seen.insert(edit.path().to_path_buf()) {
                report.skipped.push(edit.path().to_path_buf());
                continue;
            }

            if edit.tool() == EditToolKind::Other {
                report.skipped.push(edit.path().to_path_buf());
                continue;
            }

            match tool::reverse(fs, edit) {
                Ok(()) => report.applied.push(edit.path().to_path_buf()),
                Err(e) => {
                    tracing::error!(
                        turn = %turn.id(),
                        path = %edit.path().display(),
                        "failed to revert file edit: {e}"
                    );
                    report.failures.push((edit.path().to_path_buf(), e));
                }
            }
        }
    }

    report
}

/// Reapply the file edits of a suspended span, newest turn first.
///
/// Each path is processed once; the latest snapshot for it wins, so the disk
/// ends at the content produced by the most recent turn in the span.
/// `Other`-kind edits claim their path but write nothing.
pub fn reapply_span(fs: &dyn WorkspaceFs, span: &[ConversationTurn]) -> CheckpointPassReport {
    let mut report = CheckpointPassReport::default();
    let mut seen: HashSet<PathBuf> = HashSet::new();

    for turn in span.iter().rev() {
        for edit in turn.file_edits() {
            if !seen.insert(edit.path().to_path_buf()) {
                report.skipped.push(edit.path().to_path_buf());
                continue;
            }

            if edit.tool() == EditToolKind::Other {
                report.skipped.push(edit.path().to_path_buf());
                continue;
            }

            match tool::forward(fs, edit) {
                Ok(()) => report.applied.push(edit.path().to_path_buf()),
                Err(e) => {
                    tracing::error!(
                        turn = %turn.id(),
                        path = %edit.path().display(),
                        "failed to reapply file edit: {e}"
                    );
                    report.failures.push((edit.path().to_path_buf(), e));
                }
            }
        }
    }

    report
}
