//! Per-guild file layout bootstrap
//!
//! `FileLayoutManager::ensure_guild_files` is called before every write.
//! The first call for a guild probes the filesystem and creates whatever
//! is missing; later calls hit the in-memory set and return immediately.

use std::collections::HashSet;
use std::io;
use std::path::Path;

use parking_lot::Mutex;
use tracing::{debug, info};

use crate::types::{EventRecord, GuildId, SessionRecord};
use crate::utils::durable::{create_dir_all_durable, create_if_absent};

use super::config::StorageConfig;
use super::store::{StorageError, StorageResult};

/// Ensures the file set of each guild exists exactly once per process
pub struct FileLayoutManager {
    config: StorageConfig,
    /// Guild ids whose files have been verified by this instance
    initialized: Mutex<HashSet<GuildId>>,
}

impl FileLayoutManager {
    /// Create a manager for the given data root
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            initialized: Mutex::new(HashSet::new()),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    /// Make sure the guild's directory and four files exist
    ///
    /// Returns `true` if this call verified the guild (first call since
    /// construction or the last `reset`), `false` if it was already known.
    /// Existing files are never truncated or rewritten. On error the guild
    /// stays unverified so the next write retries the bootstrap.
    pub fn ensure_guild_files(&self, guild_id: GuildId) -> StorageResult<bool> {
        let mut initialized = self.initialized.lock();
        if initialized.contains(&guild_id) {
            return Ok(false);
        }

        self.create_guild_files(guild_id)?;
        initialized.insert(guild_id);
        Ok(true)
    }

    /// Check whether a guild has been verified
    pub fn is_initialized(&self, guild_id: GuildId) -> bool {
        self.initialized.lock().contains(&guild_id)
    }

    /// Number of verified guilds
    pub fn initialized_count(&self) -> usize {
        self.initialized.lock().len()
    }

    /// Forget every verified guild; the next write probes the disk again
    pub fn reset(&self) {
        self.initialized.lock().clear();
    }

    fn create_guild_files(&self, guild_id: GuildId) -> StorageResult<()> {
        let guild_dir = self.config.guild_dir(guild_id);

        if !guild_dir.is_dir() {
            info!(
                "Creating file structure for guild {} at {}",
                guild_id,
                guild_dir.display()
            );
            create_dir_all_durable(&guild_dir).map_err(bootstrap_err(guild_id, &guild_dir))?;
        }

        let event_header = format!("{}\n", EventRecord::CSV_HEADER);
        let session_header = format!("{}\n", SessionRecord::CSV_HEADER);
        let files = [
            (self.config.event_log_path(guild_id), event_header.as_bytes()),
            (self.config.session_log_path(guild_id), session_header.as_bytes()),
            (self.config.guild_events_path(guild_id), &b""[..]),
            (self.config.guild_snapshot_path(guild_id), &b""[..]),
        ];

        for (path, contents) in &files {
            if create_if_absent(path, contents).map_err(bootstrap_err(guild_id, path))? {
                debug!("Wrote initial contents of {}", path.display());
            }
        }

        Ok(())
    }
}

fn bootstrap_err(guild_id: GuildId, path: &Path) -> impl FnOnce(io::Error) -> StorageError {
    let path = path.to_path_buf();
    move |source| StorageError::Bootstrap {
        guild_id,
        path,
        source,
    }
}
