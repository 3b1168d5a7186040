//! Append-only conversation storage.
//!
//! Turns are appended as the conversation proceeds and never mutated, with
//! one exception: file-edit snapshots are attached to a turn while that turn
//! is executing. Once a turn has completed, its snapshots are frozen - they
//! capture the original and modified content exactly as they existed when the
//! turn ran, independent of the live working-set ledger.
//!
//! The only destructive operation is [`ConversationStore::delete_turns`],
//! used when a checkpoint jump is committed and the suspended tail of history
//! is abandoned.

mod store;
mod turn;

pub use store::ConversationStore;
pub use turn::{ChatRole, ConversationTurn};
