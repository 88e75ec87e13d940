//! Durable file operations
//!
//! Log files are created at most once and then only appended to, so the
//! helpers here never overwrite: creation uses `create_new` and a file that
//! already holds data is left untouched.
//!
//! # fsync
//!
//! A newly created file is synced, then its parent directory, so the
//! directory entry survives a crash along with the contents. Directories
//! are created one level at a time, top down, each followed by a sync of
//! its parent.
//!
//! # Failure
//!
//! A failed append is cut back to the previous length. A file whose
//! initial contents could not be written is removed, so the next
//! bootstrap creates it again instead of finding it half-written.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::error;

/// A writable file that can be flushed to disk and cut back to a length
pub trait DurableFile: Write {
    fn sync(&mut self) -> io::Result<()>;
    fn truncate_to(&mut self, len: u64) -> io::Result<()>;
}

impl DurableFile for File {
    fn sync(&mut self) -> io::Result<()> {
        self.sync_data()
    }

    fn truncate_to(&mut self, len: u64) -> io::Result<()> {
        self.set_len(len)
    }
}

/// Write `bytes` and sync; on failure restore the file to `len_before`
///
/// The write or sync error is returned. A failed rollback is logged, since
/// the file may then end with a partial record.
pub fn append_durably<W: DurableFile>(file: &mut W, len_before: u64, bytes: &[u8]) -> io::Result<()> {
    let result = file.write_all(bytes).and_then(|_| file.sync());

    if let Err(e) = result {
        if let Err(rollback) = file.truncate_to(len_before) {
            error!(
                "Could not truncate back to {} bytes after failed write: {}",
                len_before, rollback
            );
        }
        return Err(e);
    }

    Ok(())
}

/// Create `path` with `contents` unless it already holds data
///
/// Returns `Ok(true)` if this call wrote `contents`, `Ok(false)` if the
/// file was already present. An existing empty file is given `contents`
/// (a header lost to an earlier crash); a non-empty one is never opened
/// for writing.
pub fn create_if_absent(path: &Path, contents: &[u8]) -> io::Result<bool> {
    match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(mut file) => {
            populate_or_remove(path, &mut file, contents)?;
            if let Some(parent) = path.parent() {
                fsync_dir(parent)?;
            }
            Ok(true)
        }
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => fill_if_empty(path, contents),
        Err(e) => Err(e),
    }
}

/// Write the initial contents of a just-created file, removing it on failure
fn populate_or_remove<W: DurableFile>(path: &Path, file: &mut W, contents: &[u8]) -> io::Result<()> {
    if let Err(e) = append_durably(file, 0, contents) {
        if let Err(remove) = fs::remove_file(path) {
            error!("Could not remove half-created {}: {}", path.display(), remove);
        }
        return Err(e);
    }
    Ok(())
}

fn fill_if_empty(path: &Path, contents: &[u8]) -> io::Result<bool> {
    if contents.is_empty() {
        return Ok(false);
    }

    let mut file = OpenOptions::new().append(true).open(path)?;
    if file.metadata()?.len() > 0 {
        return Ok(false);
    }

    append_durably(&mut file, 0, contents)?;
    Ok(true)
}

/// Create `dir` and any missing ancestors, syncing each new entry's parent
pub fn create_dir_all_durable(dir: &Path) -> io::Result<()> {
    let mut missing: Vec<PathBuf> = Vec::new();
    let mut current = Some(dir);
    while let Some(path) = current {
        if path.as_os_str().is_empty() || path.exists() {
            break;
        }
        missing.push(path.to_path_buf());
        current = path.parent();
    }

    for path in missing.iter().rev() {
        match fs::create_dir(path) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists && path.is_dir() => continue,
            Err(e) => return Err(e),
        }
        fsync_dir(parent_or_cwd(path))?;
    }

    Ok(())
}

fn parent_or_cwd(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// Sync a directory so entries created in it are durable
#[cfg(unix)]
pub fn fsync_dir(dir: &Path) -> io::Result<()> {
    File::open(dir)?.sync_all()
}

/// Directory handles cannot be synced on this platform
#[cfg(not(unix))]
pub fn fsync_dir(_dir: &Path) -> io::Result<()> {
    Ok(())
}
