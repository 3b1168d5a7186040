//! The conversation store.

use std::path::Path;
use std::time::SystemTime;

use anyhow::{Context as _, Result};
use serde::{Deserialize, Serialize};

use waypoint_types::{FileEdit, TurnId};
use waypoint_utils::{atomic_write, recover_bak_file};

use crate::turn::{ChatRole, ConversationTurn};

/// Ordered, append-only list of conversation turns.
///
/// Arrival order is the only ordering; ids are allocated monotonically so a
/// turn's id also encodes its position relative to siblings.
#[derive(Debug, Default)]
pub struct ConversationStore {
    next_id: u64,
    turns: Vec<ConversationTurn>,
}

#[derive(Debug, Serialize, Deserialize)]
struct StoreSerde {
    next_id: u64,
    turns: Vec<ConversationTurn>,
}

impl ConversationStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a turn and return its id.
    pub fn push_turn(&mut self, role: ChatRole, text: impl Into<String>) -> TurnId {
        let id = TurnId::new(self.next_id);
        self.next_id += 1;
        self.turns
            .push(ConversationTurn::new(id, role, text, SystemTime::now()));
        id
    }

    #[must_use]
    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: TurnId) -> Option<&ConversationTurn> {
        self.turns.iter().find(|t| t.id() == id)
    }

    #[must_use]
    pub fn last_turn(&self) -> Option<&ConversationTurn> {
        self.turns.last()
    }

    /// Turns strictly after the given id, in arrival order.
    ///
    /// Returns the empty slice when the id is unknown - callers treat an
    /// unknown anchor as "nothing follows it".
    #[must_use]
    pub fn turns_after(&self, id: TurnId) -> &[ConversationTurn] {
        match self.turns.iter().position(|t| t.id() == id) {
            Some(pos) => &self.turns[pos + 1..],
            None => &[],
        }
    }

    /// Attach a file-edit snapshot to an executing turn.
    ///
    /// Returns false when the turn is unknown; the snapshot is dropped in
    /// that case.
    pub fn attach_file_edit(&mut self, id: TurnId, edit: FileEdit) -> bool {
        match self.turns.iter_mut().find(|t| t.id() == id) {
            Some(turn) => {
                turn.attach_file_edit(edit);
                true
            }
            None => false,
        }
    }

    /// Permanently remove the given turns. Returns how many were removed.
    ///
    /// Used when a checkpoint jump is committed: the suspended tail of
    /// history is abandoned and cannot be recovered.
    pub fn delete_turns(&mut self, ids: &[TurnId]) -> usize {
        let before = self.turns.len();
        self.turns.retain(|t| !ids.contains(&t.id()));
        before - self.turns.len()
    }

    /// Save the conversation to disk as JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }

        let serde = StoreSerde {
            next_id: self.next_id,
            turns: self.turns.clone(),
        };
        let json = serde_json::to_vec_pretty(&serde).context("serializing conversation")?;
        atomic_write(path, &json).with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }

    /// Load a previously saved conversation.
    pub fn load(path: &Path) -> Result<Self> {
        recover_bak_file(path);

        let bytes =
            std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        let serde: StoreSerde =
            serde_json::from_slice(&bytes).context("parsing conversation JSON")?;

        // A stale next_id would hand out duplicate turn ids after load.
        let max_id = serde.turns.iter().map(|t| t.id().value()).max();
        let next_id = match max_id {
            Some(max) if serde.next_id <= max => {
                tracing::warn!(
                    stored = serde.next_id,
                    max,
                    "next_id behind stored turns; resynchronizing"
                );
                max + 1
            }
            _ => serde.next_id,
        };

        Ok(Self {
            next_id,
            turns: serde.turns,
        })
    }
}
