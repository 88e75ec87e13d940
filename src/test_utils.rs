//! Shared helpers for unit tests.

use std::io::{self, Write};

use parking_lot::Mutex;

use crate::storage::{ActivityLog, StorageResult};
use crate::types::{
    ChannelRef, EventRecord, GuildId, GuildMetadataEvent, GuildRef, MemberRef, SessionRecord,
};
use crate::utils::durable::DurableFile;

/// In-memory `ActivityLog` that keeps every record in arrival order
#[derive(Default)]
pub struct RecordingLog {
    pub guilds: Mutex<Vec<GuildId>>,
    pub events: Mutex<Vec<EventRecord>>,
    pub sessions: Mutex<Vec<SessionRecord>>,
    pub guild_events: Mutex<Vec<GuildMetadataEvent>>,
}

impl RecordingLog {
    pub fn events(&self) -> Vec<EventRecord> {
        self.events.lock().clone()
    }

    pub fn sessions(&self) -> Vec<SessionRecord> {
        self.sessions.lock().clone()
    }

    pub fn guild_events(&self) -> Vec<GuildMetadataEvent> {
        self.guild_events.lock().clone()
    }

    pub fn ensured_guilds(&self) -> Vec<GuildId> {
        self.guilds.lock().clone()
    }
}

impl ActivityLog for RecordingLog {
    fn ensure_guild(&self, guild_id: GuildId) -> StorageResult<bool> {
        let mut guilds = self.guilds.lock();
        if guilds.contains(&guild_id) {
            return Ok(false);
        }
        guilds.push(guild_id);
        Ok(true)
    }

    fn append_event(&self, record: &EventRecord) -> StorageResult<()> {
        self.events.lock().push(record.clone());
        Ok(())
    }

    fn append_session(&self, record: &SessionRecord) -> StorageResult<()> {
        self.sessions.lock().push(record.clone());
        Ok(())
    }

    fn append_guild_event(&self, event: &GuildMetadataEvent) -> StorageResult<()> {
        self.guild_events.lock().push(event.clone());
        Ok(())
    }
}

pub fn guild() -> GuildRef {
    GuildRef::new(1000, "Recap Guild")
}

pub fn member(id: u64, name: &str) -> MemberRef {
    MemberRef::new(id, name, guild())
}

pub fn voice(id: u64, name: &str) -> ChannelRef {
    ChannelRef::voice(id, name)
}

/// In-memory file that accepts `budget` more bytes, then fails every write
pub struct FlakyFile {
    pub data: Vec<u8>,
    pub budget: usize,
    pub fail_sync: bool,
}

impl FlakyFile {
    pub fn accepting(budget: usize) -> Self {
        Self::with_contents(b"", budget)
    }

    pub fn with_contents(contents: &[u8], budget: usize) -> Self {
        Self {
            data: contents.to_vec(),
            budget,
            fail_sync: false,
        }
    }
}

impl Write for FlakyFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.budget == 0 {
            return Err(io::Error::new(io::ErrorKind::Other, "no space left"));
        }
        let n = buf.len().min(self.budget);
        self.budget -= n;
        self.data.extend_from_slice(&buf[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl DurableFile for FlakyFile {
    fn sync(&mut self) -> io::Result<()> {
        if self.fail_sync {
            return Err(io::Error::new(io::ErrorKind::Other, "sync failed"));
        }
        Ok(())
    }

    fn truncate_to(&mut self, len: u64) -> io::Result<()> {
        self.data.truncate(len as usize);
        Ok(())
    }
}
