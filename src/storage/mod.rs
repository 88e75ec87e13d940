//! Storage Module for per-guild activity logs
//!
//! This module provides the durable, append-only persistence layer:
//! - `FileLayoutManager`: creates each guild's file set once, memoized
//! - `AppendOnlyWriter`: whole-line, fsynced appends with per-guild locking
//! - `GuildLogStore`: the file-backed `ActivityLog` combining the two
//! - `StatsCollector`: read-only row/size statistics for operators
//!
//! # Architecture
//!
//! ```text
//! Write Path:
//! ┌──────────────┐    ┌─────────────────────┐    ┌────────────────────┐
//! │ Tracker /    │───►│ ensure_guild_files()│───►│ append_line()      │
//! │ Recorder     │    │ once per guild id   │    │ write + sync_data  │
//! └──────────────┘    └─────────────────────┘    └────────────────────┘
//! ```
//!
//! Logs are never read back on the write path.

mod config;
mod layout;
mod stats;
mod store;
mod writer;

pub use config::{
    StorageConfig, EVENT_LOG_FILENAME, GUILD_EVENTS_FILENAME, GUILD_SNAPSHOT_FILENAME,
    SESSION_LOG_FILENAME,
};
pub use layout::FileLayoutManager;
pub use stats::{GuildFileStats, StatsCollector, StorageStats};
pub use store::{GuildLogStore, StorageError, StorageResult};
pub use writer::AppendOnlyWriter;

use crate::types::{EventRecord, GuildId, GuildMetadataEvent, SessionRecord};

/// Sink for everything the tracker and recorder produce
///
/// Implementations must make the guild's file set exist before the first
/// write that targets it, and must write each record whole or not at all.
pub trait ActivityLog: Send + Sync {
    /// Make sure the guild's storage exists; `true` if this call verified it
    fn ensure_guild(&self, guild_id: GuildId) -> StorageResult<bool>;

    /// Append one row to the guild's event log
    fn append_event(&self, record: &EventRecord) -> StorageResult<()>;

    /// Append one row to the guild's session log
    fn append_session(&self, record: &SessionRecord) -> StorageResult<()>;

    /// Append one entry to the guild's metadata journal
    fn append_guild_event(&self, event: &GuildMetadataEvent) -> StorageResult<()>;
}
