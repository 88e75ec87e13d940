//! Append-only line writer
//!
//! Every record is one line, written with a single `write_all` on a file
//! opened in append mode and flushed with `sync_data` before returning.
//! If the write or the flush fails the file is truncated back to its
//! previous length, so a failed append never leaves a partial line.
//!
//! Appends to the files of one guild are serialized by a per-guild lock.

use std::collections::HashMap;
use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::types::GuildId;
use crate::utils::durable::append_durably;

use super::store::{StorageError, StorageResult};

/// Durable, ordered line appends
#[derive(Default)]
pub struct AppendOnlyWriter {
    guild_locks: Mutex<HashMap<GuildId, Arc<Mutex<()>>>>,
}

impl AppendOnlyWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `line` plus a newline to `path`
    ///
    /// The file must already exist; creating it is the layout manager's job.
    pub fn append_line(&self, guild_id: GuildId, path: &Path, line: &str) -> StorageResult<()> {
        let lock = self.guild_lock(guild_id);
        let _guard = lock.lock();

        append_whole_line(path, line).map_err(|source| StorageError::Append {
            path: path.to_path_buf(),
            source,
        })
    }

    fn guild_lock(&self, guild_id: GuildId) -> Arc<Mutex<()>> {
        self.guild_locks
            .lock()
            .entry(guild_id)
            .or_default()
            .clone()
    }
}

fn append_whole_line(path: &Path, line: &str) -> io::Result<()> {
    let mut file = OpenOptions::new().append(true).open(path)?;
    let len_before = file.metadata()?.len();

    let mut buf = String::with_capacity(line.len() + 1);
    buf.push_str(line);
    buf.push('\n');

    append_durably(&mut file, len_before, buf.as_bytes())
}
