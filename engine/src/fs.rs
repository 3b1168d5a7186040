//! Filesystem capability boundary.
//!
//! The engine only ever needs whole-file operations; no partial or streaming
//! update semantics exist anywhere in the edit model. Everything filesystem
//! goes through [`WorkspaceFs`] so the ledger and checkpoint passes can be
//! exercised against a sandbox (or a failing double) in tests.

use std::io;
use std::path::Path;

use waypoint_utils::{atomic_write, atomic_write_new};

use crate::error::EditError;

/// Whole-file operations against the workspace.
pub trait WorkspaceFs: Send + Sync {
    fn exists(&self, path: &Path) -> bool;

    fn read_to_string(&self, path: &Path) -> Result<String, EditError>;

    /// Atomically replace `path` with `content`, creating it if missing.
    fn write(&self, path: &Path, content: &str) -> Result<(), EditError>;

    /// Atomically create `path` with `content`; fails with
    /// [`EditError::AlreadyExists`] when the path is occupied.
    fn write_new(&self, path: &Path, content: &str) -> Result<(), EditError>;

    /// Remove `path` if it is an existing regular file.
    ///
    /// Missing paths and directories are a successful no-op (`Ok(false)`);
    /// this capability never deletes a directory. Returns `Ok(true)` when a
    /// file was actually removed.
    fn remove_file(&self, path: &Path) -> Result<bool, EditError>;

    fn create_dir_all(&self, path: &Path) -> Result<(), EditError>;
}

/// [`WorkspaceFs`] backed by the real filesystem with atomic writes.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealFs;

impl WorkspaceFs for RealFs {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn read_to_string(&self, path: &Path) -> Result<String, EditError> {
        std::fs::read_to_string(path).map_err(|e| EditError::io(path, e))
    }

    fn write(&self, path: &Path, content: &str) -> Result<(), EditError> {
        atomic_write(path, content.as_bytes()).map_err(|e| EditError::io(path, e))
    }

    fn write_new(&self, path: &Path, content: &str) -> Result<(), EditError> {
        atomic_write_new(path, content.as_bytes()).map_err(|e| {
            if e.kind() == io::ErrorKind::AlreadyExists {
                EditError::AlreadyExists {
                    path: path.to_path_buf(),
                }
            } else {
                EditError::io(path, e)
            }
        })
    }

    fn remove_file(&self, path: &Path) -> Result<bool, EditError> {
        match std::fs::metadata(path) {
            Ok(meta) if meta.is_dir() => Ok(false),
            Ok(_) => {
                std::fs::remove_file(path).map_err(|e| EditError::io(path, e))?;
                Ok(true)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(EditError::io(path, e)),
        }
    }

    fn create_dir_all(&self, path: &Path) -> Result<(), EditError> {
        std::fs::create_dir_all(path).map_err(|e| EditError::io(path, e))
    }
}
