//! Typed session events for observers.
//!
//! The engine publishes ledger and checkpoint state changes over plain
//! channels; observers (diff view, working-set display) subscribe and react.
//! Delivery is at-least-once - observers must be idempotent against repeated
//! identical snapshots. Observers never mutate the session; they only read
//! the snapshots carried in events.

use tokio::sync::mpsc;

use waypoint_types::{FileEdit, TurnId};

/// Something observers may need to react to.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// The working set changed; carries the full new snapshot in insertion
    /// order.
    LedgerChanged(Vec<FileEdit>),
    /// The checkpoint cursor moved. `Some(turn)` means turns after `turn`
    /// are suspended; `None` means no restore is in progress.
    CheckpointChanged(Option<TurnId>),
}

/// Fan-out of session events to any number of subscribers.
///
/// Subscribers that drop their receiver are pruned on the next emit.
#[derive(Debug, Default)]
pub struct EventBus {
    subscribers: Vec<mpsc::UnboundedSender<SessionEvent>>,
}

impl EventBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<SessionEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.push(tx);
        rx
    }

    pub fn emit(&mut self, event: &SessionEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}
