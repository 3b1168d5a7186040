//! Cancellation hook for in-flight response generation.
//!
//! Checkpoint restore must stop a live generation belonging to the same
//! session; everything else about model requests is outside this engine.
//! The signal is fire-and-forget.

use std::sync::Mutex;

use futures_util::future::AbortHandle;

/// Fire-and-forget cancellation of the session's active generation, if any.
pub trait GenerationControl: Send + Sync {
    fn cancel_active(&self);
}

/// For sessions with no generation wiring (tests, replay).
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopGeneration;

impl GenerationControl for NoopGeneration {
    fn cancel_active(&self) {}
}

/// [`GenerationControl`] backed by an abortable future handle.
///
/// The owner registers the handle of each new generation future; cancel
/// aborts and clears it. Cancelling with no active handle is a no-op.
#[derive(Debug, Default)]
pub struct AbortableGeneration {
    handle: Mutex<Option<AbortHandle>>,
}

impl AbortableGeneration {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_active(&self, handle: AbortHandle) {
        let mut guard = self
            .handle
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        *guard = Some(handle);
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.handle
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .is_some()
    }
}

impl GenerationControl for AbortableGeneration {
    fn cancel_active(&self) {
        let handle = self
            .handle
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .take();
        if let Some(handle) = handle {
            handle.abort();
        }
    }
}
