//! Core engine for Waypoint - the agent file-edit and checkpoint machinery.
//!
//! This crate tracks file modifications proposed by an AI agent, lets the
//! user accept/undo/discard them individually or in bulk, and supports
//! rewinding a conversation to an earlier point by reverting or reapplying
//! file mutations in the correct order, keeping the in-memory ledger
//! consistent with on-disk state. It provides:
//!
//! - **[`FileEditLedger`]**: the session's working set - one record per
//!   touched file with merge/accept/undo/discard semantics
//! - **[`tool`]**: forward/reverse filesystem operations per edit kind
//! - **Checkpoints**: [`CheckpointCursor`] plus ordered revert/redo passes
//!   with first-seen-wins tie-breaking across turns
//! - **[`ChatSession`]**: the single logical owner that serializes every
//!   mutation and publishes [`SessionEvent`]s to observers
//! - **[`reconcile`]**: pure diff-view reconciliation against ledger changes
//!
//! # Architecture
//!
//! All state lives in [`ChatSession`] and is mutated through `&mut self` -
//! one logical owner per session, no internal locking. Filesystem access
//! goes through the [`WorkspaceFs`] capability so every pass can run against
//! a sandbox in tests. UI concerns (rendering, windows, markdown) live
//! entirely outside this crate; observers consume typed events.

mod checkpoint;
mod error;
mod events;
mod fs;
mod generation;
mod ledger;
mod session;
pub mod tool;
mod workingset;

pub use checkpoint::{CheckpointCursor, CheckpointPassReport, reapply_span, revert_span};
pub use error::EditError;
pub use events::{EventBus, SessionEvent};
pub use fs::{RealFs, WorkspaceFs};
pub use generation::{AbortableGeneration, GenerationControl, NoopGeneration};
pub use ledger::FileEditLedger;
pub use session::ChatSession;
pub use workingset::{DiffViewAction, WorkingSetEntry, reconcile, working_set};

#[cfg(test)]
mod tests;
