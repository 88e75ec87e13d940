//! Guild log store
//!
//! `GuildLogStore` is the file-backed [`ActivityLog`]: every append first
//! makes sure the guild's file set exists, then writes one line.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::types::{EventRecord, GuildId, GuildMetadataEvent, SessionRecord};

use super::config::StorageConfig;
use super::layout::FileLayoutManager;
use super::writer::AppendOnlyWriter;
use super::ActivityLog;

/// Errors that can occur in storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    /// The guild's directory or one of its files could not be created
    #[error("failed to bootstrap files for guild {guild_id} at {}: {source}", .path.display())]
    Bootstrap {
        guild_id: GuildId,
        path: PathBuf,
        source: io::Error,
    },

    /// A record could not be appended; nothing partial was left behind
    #[error("failed to append to {}: {source}", .path.display())]
    Append { path: PathBuf, source: io::Error },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// File-backed activity log for all guilds under one data root
pub struct GuildLogStore {
    layout: FileLayoutManager,
    writer: AppendOnlyWriter,
}

impl GuildLogStore {
    /// Create a store with the given config
    pub fn new(config: StorageConfig) -> Self {
        Self {
            layout: FileLayoutManager::new(config),
            writer: AppendOnlyWriter::new(),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &StorageConfig {
        self.layout.config()
    }

    /// Get the layout manager
    pub fn layout(&self) -> &FileLayoutManager {
        &self.layout
    }
}

impl ActivityLog for GuildLogStore {
    fn ensure_guild(&self, guild_id: GuildId) -> StorageResult<bool> {
        self.layout.ensure_guild_files(guild_id)
    }

    fn append_event(&self, record: &EventRecord) -> StorageResult<()> {
        self.ensure_guild(record.guild_id)?;
        let path = self.config().event_log_path(record.guild_id);
        self.writer
            .append_line(record.guild_id, &path, &record.to_csv_line())
    }

    fn append_session(&self, record: &SessionRecord) -> StorageResult<()> {
        self.ensure_guild(record.guild_id)?;
        let path = self.config().session_log_path(record.guild_id);
        self.writer
            .append_line(record.guild_id, &path, &record.to_csv_line())
    }

    fn append_guild_event(&self, event: &GuildMetadataEvent) -> StorageResult<()> {
        self.ensure_guild(event.guild_id)?;
        let line = event.to_json_line()?;
        let path = self.config().guild_events_path(event.guild_id);
        self.writer.append_line(event.guild_id, &path, &line)
    }
}
