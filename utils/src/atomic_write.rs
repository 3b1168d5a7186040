//! Atomic whole-file write helpers.
//!
//! Uses a temp file + rename pattern so observers never see a partially
//! written file. On Windows, rename-over-existing fails, so overwrites fall
//! back to a backup-and-restore dance to avoid data loss.

use std::fs;
use std::io;
use std::path::Path;

use tempfile::NamedTempFile;

fn parent_of(path: &Path) -> &Path {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    if parent.as_os_str().is_empty() {
        Path::new(".")
    } else {
        parent
    }
}

/// Recover from incomplete atomic writes by restoring `.bak` files.
///
/// If `path` does not exist but `path.bak` does, a crash occurred during the
/// backup-rename window in [`atomic_write`]. Rename the backup back to the
/// canonical path so the caller can proceed.
pub fn recover_bak_file(path: &Path) {
    let backup = path.with_extension("bak");
    if !path.exists() && backup.exists() {
        match fs::rename(&backup, path) {
            Ok(()) => {
                tracing::warn!(
                    path = %path.display(),
                    "Recovered .bak file from interrupted atomic write"
                );
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    "Failed to recover .bak file: {e}"
                );
            }
        }
    }
}

/// Atomically replace the content of `path` with `bytes`.
///
/// The destination is created if missing and overwritten if present.
pub fn atomic_write(path: impl AsRef<Path>, bytes: &[u8]) -> io::Result<()> {
    use std::io::Write as _;

    let path = path.as_ref();
    let parent = parent_of(path);

    let mut tmp = NamedTempFile::new_in(parent)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;

    // Persist (rename) - handle Windows where rename fails if target exists.
    if let Err(err) = tmp.persist(path) {
        if path.exists() {
            let backup_path = path.with_extension("bak");
            let _ = fs::remove_file(&backup_path);
            fs::rename(path, &backup_path)?;

            if let Err(rename_err) = err.file.persist(path) {
                let _ = fs::rename(&backup_path, path);
                return Err(rename_err.error);
            }
            if let Err(e) = fs::remove_file(&backup_path) {
                tracing::warn!(
                    path = %backup_path.display(),
                    "Failed to remove .bak after atomic write: {e}"
                );
            }
        } else {
            return Err(err.error);
        }
    }

    Ok(())
}

/// Atomically create `path` with `bytes`, failing if the destination exists.
///
/// Returns [`io::ErrorKind::AlreadyExists`] when the path is occupied, with
/// no mutation performed.
pub fn atomic_write_new(path: impl AsRef<Path>, bytes: &[u8]) -> io::Result<()> {
    use std::io::Write as _;

    let path = path.as_ref();
    let parent = parent_of(path);

    let mut tmp = NamedTempFile::new_in(parent)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;

    if let Err(err) = tmp.persist_noclobber(path) {
        return Err(err.error);
    }

    Ok(())
}
