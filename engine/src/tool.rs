//! Forward/reverse edit operations, dispatched by tool kind.
//!
//! Filesystem mechanics for each [`EditToolKind`] live here and only here;
//! the ledger and checkpoint passes dispatch through these functions and
//! never branch on file mechanics themselves.
//!
//! Dispatch contract: the operation is chosen solely by the edit's kind.
//! [`EditToolKind::Other`] is a deliberate no-op in both directions - edits
//! from tools whose reversal is unsupported are tracked for bookkeeping only.

use std::path::Path;

use waypoint_types::{EditToolKind, FileEdit};

use crate::error::EditError;
use crate::fs::WorkspaceFs;

fn write_with_parents(fs: &dyn WorkspaceFs, path: &Path, content: &str) -> Result<(), EditError> {
    if let Some(parent) = path.parent() {
        fs.create_dir_all(parent)?;
    }
    fs.write(path, content)
}

/// Create a new file and return the edit record to track.
///
/// Fails with [`EditError::AlreadyExists`] when the path is occupied, with
/// no mutation performed. The recorded `modified_content` is read back from
/// disk rather than echoed from the request, so the record reflects what the
/// write actually produced.
pub fn create_file(
    fs: &dyn WorkspaceFs,
    path: &Path,
    content: &str,
) -> Result<FileEdit, EditError> {
    if let Some(parent) = path.parent() {
        fs.create_dir_all(parent)?;
    }
    fs.write_new(path, content)?;
    let written = fs.read_to_string(path)?;
    Ok(FileEdit::new(path, "", written, EditToolKind::CreateFile))
}

/// Overwrite a file's content and return the edit record to track.
///
/// The record's `original_content` is the content found on disk immediately
/// before this write (empty for a previously missing file), which is exactly
/// what a checkpoint revert of this single edit must restore.
pub fn insert_or_replace(
    fs: &dyn WorkspaceFs,
    path: &Path,
    content: &str,
) -> Result<FileEdit, EditError> {
    let original = if fs.exists(path) {
        fs.read_to_string(path)?
    } else {
        String::new()
    };
    write_with_parents(fs, path, content)?;
    Ok(FileEdit::new(
        path,
        original,
        content,
        EditToolKind::InsertOrReplace,
    ))
}

/// Re-apply an edit's modified content (checkpoint redo).
pub fn forward(fs: &dyn WorkspaceFs, edit: &FileEdit) -> Result<(), EditError> {
    match edit.tool() {
        EditToolKind::CreateFile | EditToolKind::InsertOrReplace => {
            write_with_parents(fs, edit.path(), edit.modified_content())
        }
        EditToolKind::Other => Ok(()),
    }
}

/// Restore the state an edit replaced (undo / checkpoint revert).
///
/// Safe to call repeatedly: deleting an already-missing created file is a
/// no-op, and rewriting content that already matches the recorded original
/// short-circuits without touching the file.
pub fn reverse(fs: &dyn WorkspaceFs, edit: &FileEdit) -> Result<(), EditError> {
    match edit.tool() {
        EditToolKind::CreateFile => fs.remove_file(edit.path()).map(|_| ()),
        EditToolKind::InsertOrReplace => {
            if fs.exists(edit.path()) {
                let current = fs.read_to_string(edit.path())?;
                if current == edit.original_content() {
                    return Ok(());
                }
            }
            write_with_parents(fs, edit.path(), edit.original_content())
        }
        EditToolKind::Other => Ok(()),
    }
}
