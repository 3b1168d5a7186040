//! Error taxonomy for edit application and reversal.
//!
//! Invalid-state requests (undo on a non-pending entry, operations on
//! untracked paths) are deliberately *not* errors - callers issue those
//! defensively and the ledger treats them as silent no-ops. Only filesystem
//! outcomes surface here.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EditError {
    /// Create-file attempted against an occupied path. No mutation performed.
    #[error("file already exists: {path}")]
    AlreadyExists { path: PathBuf },

    /// Read/write/delete failure during apply or reverse.
    #[error("io failure on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl EditError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::AlreadyExists { path } | Self::Io { path, .. } => path,
        }
    }
}
