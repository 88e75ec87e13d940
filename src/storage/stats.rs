//! Storage Statistics
//!
//! Scans the data root and reports, per guild, how many rows each log
//! holds and how much disk it uses. Read-only; logged at startup.

use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::types::GuildId;

use super::config::StorageConfig;
use super::store::StorageResult;

/// File statistics for one guild
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GuildFileStats {
    pub guild_id: GuildId,
    /// Data rows in event_log.csv (header excluded)
    pub event_rows: usize,
    /// Data rows in session_log.csv (header excluded)
    pub session_rows: usize,
    /// Entries in guild_events.jsonl
    pub journal_entries: usize,
    /// Combined size of the guild's files in bytes
    pub total_bytes: u64,
}

/// Statistics for a whole data root
#[derive(Debug, Clone, Default)]
pub struct StorageStats {
    pub guilds: Vec<GuildFileStats>,
}

impl StorageStats {
    /// Total event rows across guilds
    pub fn total_event_rows(&self) -> usize {
        self.guilds.iter().map(|g| g.event_rows).sum()
    }

    /// Total session rows across guilds
    pub fn total_session_rows(&self) -> usize {
        self.guilds.iter().map(|g| g.session_rows).sum()
    }

    /// Total journal entries across guilds
    pub fn total_journal_entries(&self) -> usize {
        self.guilds.iter().map(|g| g.journal_entries).sum()
    }

    /// Total size across guilds
    pub fn total_bytes(&self) -> u64 {
        self.guilds.iter().map(|g| g.total_bytes).sum()
    }

    /// Format size in human-readable format
    pub fn format_size(bytes: u64) -> String {
        const KB: u64 = 1024;
        const MB: u64 = KB * 1024;
        const GB: u64 = MB * 1024;

        if bytes >= GB {
            format!("{:.2} GB", bytes as f64 / GB as f64)
        } else if bytes >= MB {
            format!("{:.2} MB", bytes as f64 / MB as f64)
        } else if bytes >= KB {
            format!("{:.2} KB", bytes as f64 / KB as f64)
        } else {
            format!("{} B", bytes)
        }
    }
}

/// Collector for storage statistics
pub struct StatsCollector {
    config: StorageConfig,
}

impl StatsCollector {
    /// Create a new stats collector
    pub fn new(config: StorageConfig) -> Self {
        Self { config }
    }

    /// Collect statistics for every guild directory under the data root
    ///
    /// Entries whose name is not a guild id are skipped. A missing data
    /// root yields empty statistics.
    pub fn collect(&self) -> StorageResult<StorageStats> {
        let mut stats = StorageStats::default();
        let root = self.config.data_root();
        if !root.is_dir() {
            return Ok(stats);
        }

        for entry in fs::read_dir(root)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            let guild_id = match entry.file_name().to_str().and_then(|n| n.parse().ok()) {
                Some(id) => id,
                None => continue,
            };
            stats.guilds.push(self.collect_guild(guild_id)?);
        }

        stats.guilds.sort_by_key(|g| g.guild_id);
        Ok(stats)
    }

    /// Collect statistics for one guild
    pub fn collect_guild(&self, guild_id: GuildId) -> StorageResult<GuildFileStats> {
        let event_log = self.config.event_log_path(guild_id);
        let session_log = self.config.session_log_path(guild_id);
        let journal = self.config.guild_events_path(guild_id);
        let snapshot = self.config.guild_snapshot_path(guild_id);

        let mut total_bytes = 0;
        for path in [&event_log, &session_log, &journal, &snapshot] {
            if path.exists() {
                total_bytes += fs::metadata(path)?.len();
            }
        }

        Ok(GuildFileStats {
            guild_id,
            event_rows: count_lines(&event_log)?.saturating_sub(1),
            session_rows: count_lines(&session_log)?.saturating_sub(1),
            journal_entries: count_lines(&journal)?,
            total_bytes,
        })
    }
}

/// Count non-empty lines; a missing file counts as zero
fn count_lines(path: &Path) -> StorageResult<usize> {
    if !path.exists() {
        return Ok(0);
    }

    let reader = BufReader::new(File::open(path)?);
    let mut count = 0;
    for line in reader.lines() {
        if !line?.trim().is_empty() {
            count += 1;
        }
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{ActivityLog, GuildLogStore};
    use crate::types::{ChannelRef, EventRecord, GuildRef, MemberRef, SessionRecord, VoiceEventType};
    use tempfile::TempDir;

    #[test]
    fn test_collect_missing_root() {
        let temp_dir = TempDir::new().unwrap();
        let collector = StatsCollector::new(StorageConfig::new(temp_dir.path().join("nope")));

        let stats = collector.collect().unwrap();
        assert!(stats.guilds.is_empty());
    }

    #[test]
    fn test_collect_counts_rows_without_headers() {
        let temp_dir = TempDir::new().unwrap();
        let config = StorageConfig::new(temp_dir.path());
        let store = GuildLogStore::new(config.clone());

        let member = MemberRef::new(1, "m", GuildRef::new(3, "g"));
        let channel = ChannelRef::voice(5, "c");
        store
            .append_event(&EventRecord::new(&member, &channel, 1.0, VoiceEventType::Leave))
            .unwrap();
        store
            .append_session(&SessionRecord::corrupted(&member, &channel))
            .unwrap();
        store.ensure_guild(2).unwrap();
        fs::create_dir(temp_dir.path().join("not-a-guild")).unwrap();

        let stats = StatsCollector::new(config).collect().unwrap();
        assert_eq!(stats.guilds.len(), 2);
        assert_eq!(stats.guilds[0].guild_id, 2);
        assert_eq!(stats.guilds[0].event_rows, 0);
        assert_eq!(stats.guilds[1].event_rows, 1);
        assert_eq!(stats.guilds[1].session_rows, 1);
        assert_eq!(stats.total_journal_entries(), 0);
        assert!(stats.total_bytes() > 0);
    }

    #[test]
    fn test_format_size() {
        assert_eq!(StorageStats::format_size(512), "512 B");
        assert_eq!(StorageStats::format_size(2048), "2.00 KB");
        assert_eq!(StorageStats::format_size(3 * 1024 * 1024), "3.00 MB");
    }
}
