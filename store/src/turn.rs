//! Conversation turn model.
//!
//! Constructors take `SystemTime` explicitly; callers own the clock.

use std::time::SystemTime;

use chrono::Local;
use serde::{Deserialize, Serialize};

use waypoint_types::{FileEdit, TurnId};

/// Who produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    User,
    Assistant,
}

impl ChatRole {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// One message in conversation history.
///
/// Carries the file-edit snapshots recorded while the turn executed. These
/// snapshots drive checkpoint revert/redo and are distinct from the live
/// ledger: they never change status after the turn completes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationTurn {
    id: TurnId,
    role: ChatRole,
    text: String,
    #[serde(default)]
    file_edits: Vec<FileEdit>,
    created_at: SystemTime,
}

impl ConversationTurn {
    #[must_use]
    pub fn new(id: TurnId, role: ChatRole, text: impl Into<String>, created_at: SystemTime) -> Self {
        Self {
            id,
            role,
            text: text.into(),
            file_edits: Vec::new(),
            created_at,
        }
    }

    #[must_use]
    pub fn id(&self) -> TurnId {
        self.id
    }

    #[must_use]
    pub fn role(&self) -> ChatRole {
        self.role
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn file_edits(&self) -> &[FileEdit] {
        &self.file_edits
    }

    #[must_use]
    pub fn created_at(&self) -> SystemTime {
        self.created_at
    }

    pub(crate) fn attach_file_edit(&mut self, edit: FileEdit) {
        self.file_edits.push(edit);
    }

    /// One-line summary for transcript/diagnostic display.
    #[must_use]
    pub fn format_line(&self) -> String {
        let ts_utc = chrono::DateTime::<chrono::Utc>::from(self.created_at);
        let when = ts_utc
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string();
        format!(
            "#{id}  {when}  {role}  edits:{edits}",
            id = self.id,
            role = self.role.label(),
            edits = self.file_edits.len()
        )
    }
}
