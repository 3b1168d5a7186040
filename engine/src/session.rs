//! The chat session: single logical owner of ledger, cursor, and store.
//!
//! Every mutation of the working set or checkpoint state goes through
//! `&mut self` methods here, which serializes them by construction - no
//! internal locking. Observers subscribe for [`SessionEvent`]s and read the
//! snapshots those events carry.

use std::path::Path;
use std::sync::Arc;

use waypoint_store::{ChatRole, ConversationStore};
use waypoint_types::{FileEdit, TurnId};

use crate::checkpoint::{self, CheckpointCursor, CheckpointPassReport};
use crate::error::EditError;
use crate::events::{EventBus, SessionEvent};
use crate::fs::WorkspaceFs;
use crate::generation::GenerationControl;
use crate::ledger::FileEditLedger;
use crate::tool;

/// One agent chat session and everything it owns.
pub struct ChatSession {
    store: ConversationStore,
    ledger: FileEditLedger,
    cursor: CheckpointCursor,
    fs: Arc<dyn WorkspaceFs>,
    generation: Arc<dyn GenerationControl>,
    events: EventBus,
    draft: String,
}

impl ChatSession {
    #[must_use]
    pub fn new(fs: Arc<dyn WorkspaceFs>, generation: Arc<dyn GenerationControl>) -> Self {
        Self::with_store(ConversationStore::new(), fs, generation)
    }

    /// Resume a session over a previously loaded conversation.
    #[must_use]
    pub fn with_store(
        store: ConversationStore,
        fs: Arc<dyn WorkspaceFs>,
        generation: Arc<dyn GenerationControl>,
    ) -> Self {
        Self {
            store,
            ledger: FileEditLedger::new(),
            cursor: CheckpointCursor::new(),
            fs,
            generation,
            events: EventBus::new(),
            draft: String::new(),
        }
    }

    #[must_use]
    pub fn store(&self) -> &ConversationStore {
        &self.store
    }

    #[must_use]
    pub fn ledger(&self) -> &FileEditLedger {
        &self.ledger
    }

    #[must_use]
    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, draft: impl Into<String>) {
        self.draft = draft.into();
    }

    pub fn subscribe(&mut self) -> tokio::sync::mpsc::UnboundedReceiver<SessionEvent> {
        self.events.subscribe()
    }

    // ------------------------------------------------------------------
    // Turns
    // ------------------------------------------------------------------

    /// Append a user turn.
    ///
    /// A pending checkpoint is committed first: sending a new message while
    /// restored replaces the suspended span for good.
    pub fn push_user_turn(&mut self, text: impl Into<String>) -> TurnId {
        self.commit_pending_checkpoint();
        self.store.push_turn(ChatRole::User, text)
    }

    pub fn push_assistant_turn(&mut self, text: impl Into<String>) -> TurnId {
        self.store.push_turn(ChatRole::Assistant, text)
    }

    // ------------------------------------------------------------------
    // File edits
    // ------------------------------------------------------------------

    /// Create a file on behalf of `turn` and track the edit.
    pub fn apply_create_file(
        &mut self,
        turn: TurnId,
        path: &Path,
        content: &str,
    ) -> Result<(), EditError> {
        let edit = tool::create_file(&*self.fs, path, content)?;
        self.track(turn, edit);
        Ok(())
    }

    /// Overwrite a file's content on behalf of `turn` and track the edit.
    pub fn apply_insert_or_replace(
        &mut self,
        turn: TurnId,
        path: &Path,
        content: &str,
    ) -> Result<(), EditError> {
        let edit = tool::insert_or_replace(&*self.fs, path, content)?;
        self.track(turn, edit);
        Ok(())
    }

    /// Track an edit produced outside the built-in tools.
    ///
    /// The record lands in the ledger (merging per path) and a snapshot is
    /// attached to the turn for checkpoint bookkeeping.
    pub fn record_edit(&mut self, turn: TurnId, edit: FileEdit) {
        self.track(turn, edit);
    }

    fn track(&mut self, turn: TurnId, edit: FileEdit) {
        self.store.attach_file_edit(turn, edit.clone());
        self.ledger.record(edit);
        self.emit_ledger_changed();
    }

    /// Accept one pending edit.
    pub fn keep_edit(&mut self, path: &Path) {
        self.ledger.keep(path);
        self.emit_ledger_changed();
    }

    /// Revert one pending edit on disk.
    pub fn undo_edit(&mut self, path: &Path) -> Result<(), EditError> {
        let result = self.ledger.undo(&*self.fs, path);
        self.emit_ledger_changed();
        result
    }

    /// Undo one edit and stop tracking it.
    pub fn discard_edit(&mut self, path: &Path) -> Result<(), EditError> {
        let result = self.ledger.discard(&*self.fs, path);
        self.emit_ledger_changed();
        result
    }

    /// Accept several edits at once.
    pub fn keep_edits<'a>(&mut self, paths: impl IntoIterator<Item = &'a Path>) {
        for path in paths {
            self.ledger.keep(path);
        }
        self.emit_ledger_changed();
    }

    /// Revert several edits; failures are logged and do not stop the rest.
    pub fn undo_edits<'a>(&mut self, paths: impl IntoIterator<Item = &'a Path>) {
        for path in paths {
            if let Err(e) = self.ledger.undo(&*self.fs, path) {
                tracing::error!(path = %path.display(), "failed to undo edit: {e}");
            }
        }
        self.emit_ledger_changed();
    }

    /// Discard several edits; failures are logged and do not stop the rest.
    pub fn discard_edits<'a>(&mut self, paths: impl IntoIterator<Item = &'a Path>) {
        for path in paths {
            if let Err(e) = self.ledger.discard(&*self.fs, path) {
                tracing::error!(path = %path.display(), "failed to discard edit: {e}");
            }
        }
        self.emit_ledger_changed();
    }

    /// Stop tracking everything, with no filesystem effects.
    pub fn reset_edits(&mut self) {
        self.ledger.reset();
        self.emit_ledger_changed();
    }

    // ------------------------------------------------------------------
    // Checkpoints
    // ------------------------------------------------------------------

    #[must_use]
    pub fn pending_checkpoint(&self) -> Option<TurnId> {
        self.cursor.pending_turn()
    }

    #[must_use]
    pub fn is_restored(&self) -> bool {
        self.cursor.is_restored()
    }

    /// Jump back to `turn`: suspend everything after it and revert those
    /// turns' file edits on disk.
    ///
    /// Returns `None` when the turn is unknown. Re-entering while already
    /// restored (same or different target) is safe; reverting files that
    /// already match their baseline is a no-op.
    pub fn restore_checkpoint(&mut self, turn: TurnId) -> Option<CheckpointPassReport> {
        self.store.get(turn)?;

        self.cursor.begin(turn, &self.draft);

        // The first suspended user message becomes the draft again, ready to
        // be edited and re-sent.
        if let Some(first) = self.store.turns_after(turn).first()
            && first.role() == ChatRole::User
        {
            self.draft = first.text().to_string();
        }

        let report = checkpoint::revert_span(&*self.fs, self.store.turns_after(turn));

        // The working set now reflects the target turn's own edits.
        let target_edits: Vec<FileEdit> = self
            .store
            .get(turn)
            .map(|t| t.file_edits().to_vec())
            .unwrap_or_default();
        self.rebuild_ledger(target_edits);

        self.generation.cancel_active();
        self.events.emit(&SessionEvent::CheckpointChanged(Some(turn)));

        Some(report)
    }

    /// Cancel the jump: reapply the suspended turns' edits and return to the
    /// full history.
    ///
    /// Returns `None` when no restore is in progress.
    pub fn undo_checkpoint(&mut self) -> Option<CheckpointPassReport> {
        let pending = self.cursor.pending_turn()?;

        let span = self.store.turns_after(pending);
        let report = checkpoint::reapply_span(&*self.fs, span);
        let last_edits: Option<Vec<FileEdit>> = span.last().map(|t| t.file_edits().to_vec());

        if let Some(draft) = self.cursor.take_back() {
            self.draft = draft;
        }

        if let Some(edits) = last_edits {
            self.rebuild_ledger(edits);
        }

        self.events.emit(&SessionEvent::CheckpointChanged(None));
        Some(report)
    }

    /// Commit the jump: permanently delete the suspended turns.
    ///
    /// Filesystem is untouched - the revert already happened. Returns how
    /// many turns were removed (0 when not restored).
    pub fn discard_checkpoint(&mut self) -> usize {
        let Some(pending) = self.cursor.pending_turn() else {
            return 0;
        };

        let doomed: Vec<TurnId> = self
            .store
            .turns_after(pending)
            .iter()
            .map(waypoint_store::ConversationTurn::id)
            .collect();

        self.cursor.clear();
        let removed = self.store.delete_turns(&doomed);
        self.events.emit(&SessionEvent::CheckpointChanged(None));
        removed
    }

    /// Commit a pending checkpoint if one exists.
    ///
    /// Call sites that start something new over the restored state (a fresh
    /// user turn, a review round) go through here.
    pub fn commit_pending_checkpoint(&mut self) {
        if self.cursor.is_restored() {
            self.discard_checkpoint();
        }
    }

    fn rebuild_ledger(&mut self, edits: Vec<FileEdit>) {
        self.ledger.reset();
        for edit in edits {
            self.ledger.record(edit);
        }
        self.emit_ledger_changed();
    }

    fn emit_ledger_changed(&mut self) {
        let snapshot = self.ledger.snapshot();
        self.events.emit(&SessionEvent::LedgerChanged(snapshot));
    }
}
