//! Storage configuration and on-disk layout
//!
//! ```text
//! <data_root>/<guild_id>/event_log.csv
//! <data_root>/<guild_id>/session_log.csv
//! <data_root>/<guild_id>/guild_events.jsonl
//! <data_root>/<guild_id>/guild_snapshot.json
//! ```

use std::path::{Path, PathBuf};

use crate::types::GuildId;

/// File name of the raw join/leave log
pub const EVENT_LOG_FILENAME: &str = "event_log.csv";
/// File name of the session log
pub const SESSION_LOG_FILENAME: &str = "session_log.csv";
/// File name of the metadata journal
pub const GUILD_EVENTS_FILENAME: &str = "guild_events.jsonl";
/// File name of the metadata snapshot (reserved, created empty)
pub const GUILD_SNAPSHOT_FILENAME: &str = "guild_snapshot.json";

/// Configuration for the per-guild log files
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Root directory holding one sub-directory per guild
    pub data_root: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_root: PathBuf::from("data-dev"),
        }
    }
}

impl StorageConfig {
    /// Create config with a custom data root
    pub fn new<P: AsRef<Path>>(data_root: P) -> Self {
        Self {
            data_root: data_root.as_ref().to_path_buf(),
        }
    }

    /// Get the data root path
    pub fn data_root(&self) -> &Path {
        &self.data_root
    }

    /// Get the directory of a guild
    pub fn guild_dir(&self, guild_id: GuildId) -> PathBuf {
        self.data_root.join(guild_id.to_string())
    }

    /// Get path to a guild's event_log.csv
    pub fn event_log_path(&self, guild_id: GuildId) -> PathBuf {
        self.guild_dir(guild_id).join(EVENT_LOG_FILENAME)
    }

    /// Get path to a guild's session_log.csv
    pub fn session_log_path(&self, guild_id: GuildId) -> PathBuf {
        self.guild_dir(guild_id).join(SESSION_LOG_FILENAME)
    }

    /// Get path to a guild's guild_events.jsonl
    pub fn guild_events_path(&self, guild_id: GuildId) -> PathBuf {
        self.guild_dir(guild_id).join(GUILD_EVENTS_FILENAME)
    }

    /// Get path to a guild's guild_snapshot.json
    pub fn guild_snapshot_path(&self, guild_id: GuildId) -> PathBuf {
        self.guild_dir(guild_id).join(GUILD_SNAPSHOT_FILENAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guild_paths() {
        let config = StorageConfig::new("data-prod");

        assert_eq!(config.guild_dir(42), PathBuf::from("data-prod/42"));
        assert_eq!(
            config.event_log_path(42),
            PathBuf::from("data-prod/42/event_log.csv")
        );
        assert_eq!(
            config.session_log_path(42),
            PathBuf::from("data-prod/42/session_log.csv")
        );
        assert_eq!(
            config.guild_events_path(42),
            PathBuf::from("data-prod/42/guild_events.jsonl")
        );
        assert_eq!(
            config.guild_snapshot_path(42),
            PathBuf::from("data-prod/42/guild_snapshot.json")
        );
    }
}
