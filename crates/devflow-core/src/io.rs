use crate::error::{DevflowError, Result};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use walkdir::WalkDir;

/// Atomically write `data` to `path` using a tempfile in the same directory.
/// Prevents partial writes from corrupting config files.
pub fn atomic_write(path: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(data)?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Create a directory and all parents, idempotent.
pub fn ensure_dir(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path)?;
    Ok(())
}

/// Write a file only if it does not already exist. Returns true if written.
///
/// Uses an exclusive create so the existence check and the write are one
/// filesystem call. `AlreadyExists` is reported as `Ok(false)`; every other
/// failure propagates. A failed write removes the partial file.
pub fn write_if_missing(path: &Path, data: &[u8]) -> Result<bool> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = match std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
    {
        Ok(f) => f,
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => return Ok(false),
        Err(e) => return Err(e.into()),
    };
    write_or_discard(file, path, data)?;
    Ok(true)
}

/// Write `data` to the freshly created `path`; on failure delete it so the
/// next run does not mistake a partial file for an existing one.
fn write_or_discard<W: Write>(mut out: W, path: &Path, data: &[u8]) -> Result<()> {
    if let Err(e) = out.write_all(data).and_then(|()| out.flush()) {
        drop(out);
        if let Err(rm) = std::fs::remove_file(path) {
            tracing::warn!(path = %path.display(), error = %rm, "could not remove partial file");
        }
        return Err(e.into());
    }
    Ok(())
}

/// List a directory, treating a missing directory as empty.
///
/// Any other error (permission denied, not a directory) propagates.
pub fn read_dir_if_exists(path: &Path) -> Result<Option<std::fs::ReadDir>> {
    match std::fs::read_dir(path) {
        Ok(entries) => Ok(Some(entries)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Copy a single file, creating the destination's parent directories.
pub fn copy_file(from: &Path, to: &Path) -> Result<()> {
    if let Some(parent) = to.parent() {
        ensure_dir(parent)?;
    }
    std::fs::copy(from, to).map_err(|source| DevflowError::Copy {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    })?;
    Ok(())
}

/// Recursively copy `src` into `dest`, preserving relative structure.
///
/// `dest` and its parents are created. Existing files are overwritten.
/// Symlinks are not followed and are skipped. Returns the number of files copied.
pub fn copy_directory(src: &Path, dest: &Path) -> Result<usize> {
    ensure_dir(dest)?;
    let mut copied = 0;
    for entry in WalkDir::new(src).follow_links(false) {
        let entry = entry?;
        let rel = entry.path().strip_prefix(src).unwrap_or(entry.path());
        let target = dest.join(rel);
        let file_type = entry.file_type();
        if file_type.is_dir() {
            ensure_dir(&target)?;
        } else if file_type.is_file() {
            copy_file(entry.path(), &target)?;
            copied += 1;
        } else {
            tracing::debug!(path = %entry.path().display(), "skipping symlink");
        }
    }
    Ok(copied)
}

/// Apply `mode` to every regular file under `dir`. Directories keep the mode
/// they were created with. Returns the number of files changed.
#[cfg(unix)]
pub fn chmod_recursive(dir: &Path, mode: u32) -> Result<usize> {
    use std::os::unix::fs::PermissionsExt;

    let mut changed = 0;
    for entry in WalkDir::new(dir).follow_links(false) {
        let entry = entry?;
        if entry.file_type().is_file() {
            std::fs::set_permissions(entry.path(), std::fs::Permissions::from_mode(mode))?;
            changed += 1;
        }
    }
    Ok(changed)
}

#[cfg(not(unix))]
pub fn chmod_recursive(_dir: &Path, _mode: u32) -> Result<usize> {
    Ok(0)
}

/// Remove a directory tree. Returns true if something was removed.
pub fn remove_dir_if_exists(path: &Path) -> Result<bool> {
    match std::fs::remove_dir_all(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}

/// Remove a single file. Returns true if it existed.
pub fn remove_file_if_exists(path: &Path) -> Result<bool> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}
