//! Voice activity records
//!
//! `EventRecord` and `SessionRecord` are the rows of the two CSV logs.
//! `VoiceConnection` is the transient join state held by the tracker
//! between a join and the matching leave.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::utils::csv::{escape_field, join_row};

use super::identity::{ChannelId, ChannelRef, GuildId, MemberId, MemberRef};

/// Start time written for sessions whose join was never observed
pub const UNKNOWN_START_TIME: f64 = -1.0;

/// Kind of raw voice transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoiceEventType {
    Join,
    Leave,
}

impl VoiceEventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VoiceEventType::Join => "join",
            VoiceEventType::Leave => "leave",
        }
    }
}

impl std::fmt::Display for VoiceEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a session was closed against a known join
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionType {
    /// Join and leave were both observed
    Complete,
    /// Leave without a tracked join (e.g. the process restarted mid-session)
    Corrupted,
}

impl SessionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionType::Complete => "complete",
            SessionType::Corrupted => "corrupted",
        }
    }
}

impl std::fmt::Display for SessionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of `event_log.csv`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub member_id: MemberId,
    pub member_name: String,
    /// Unix time in seconds
    pub timestamp: f64,
    pub guild_id: GuildId,
    pub guild_name: String,
    pub channel_id: ChannelId,
    pub channel_name: String,
    pub event_type: VoiceEventType,
}

impl EventRecord {
    /// Header line of `event_log.csv`
    pub const CSV_HEADER: &'static str =
        "member_id,member_name,timestamp,guild_id,guild_name,channel_id,channel_name,event_type";

    /// Build a record from live gateway identity
    pub fn new(
        member: &MemberRef,
        channel: &ChannelRef,
        timestamp: f64,
        event_type: VoiceEventType,
    ) -> Self {
        Self {
            member_id: member.id,
            member_name: member.name.clone(),
            timestamp,
            guild_id: member.guild.id,
            guild_name: member.guild.name.clone(),
            channel_id: channel.id,
            channel_name: channel.name.clone(),
            event_type,
        }
    }

    /// Render as a CSV row (no trailing newline)
    pub fn to_csv_line(&self) -> String {
        join_row([
            Cow::Owned(self.member_id.to_string()),
            escape_field(&self.member_name),
            Cow::Owned(self.timestamp.to_string()),
            Cow::Owned(self.guild_id.to_string()),
            escape_field(&self.guild_name),
            Cow::Owned(self.channel_id.to_string()),
            escape_field(&self.channel_name),
            Cow::Borrowed(self.event_type.as_str()),
        ])
    }
}

/// One row of `session_log.csv`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub member_id: MemberId,
    pub member_name: String,
    /// Unix time of the join, or [`UNKNOWN_START_TIME`]
    pub start_time: f64,
    /// Seconds spent in the channel; 0 for corrupted sessions
    pub duration: f64,
    pub guild_id: GuildId,
    pub guild_name: String,
    pub channel_id: ChannelId,
    pub channel_name: String,
    pub session_type: SessionType,
}

impl SessionRecord {
    /// Header line of `session_log.csv`
    pub const CSV_HEADER: &'static str = "member_id,member_name,start_time,duration,guild_id,guild_name,channel_id,channel_name,session_type";

    /// Close a tracked connection at `leave_time`
    pub fn complete(connection: &VoiceConnection, leave_time: f64) -> Self {
        Self {
            member_id: connection.member_id,
            member_name: connection.member_name.clone(),
            start_time: connection.start_time,
            duration: leave_time - connection.start_time,
            guild_id: connection.guild_id,
            guild_name: connection.guild_name.clone(),
            channel_id: connection.channel_id,
            channel_name: connection.channel_name.clone(),
            session_type: SessionType::Complete,
        }
    }

    /// Record a leave that had no tracked join, using the live identity
    pub fn corrupted(member: &MemberRef, channel: &ChannelRef) -> Self {
        Self {
            member_id: member.id,
            member_name: member.name.clone(),
            start_time: UNKNOWN_START_TIME,
            duration: 0.0,
            guild_id: member.guild.id,
            guild_name: member.guild.name.clone(),
            channel_id: channel.id,
            channel_name: channel.name.clone(),
            session_type: SessionType::Corrupted,
        }
    }

    /// Render as a CSV row (no trailing newline)
    pub fn to_csv_line(&self) -> String {
        join_row([
            Cow::Owned(self.member_id.to_string()),
            escape_field(&self.member_name),
            Cow::Owned(self.start_time.to_string()),
            Cow::Owned(self.duration.to_string()),
            Cow::Owned(self.guild_id.to_string()),
            escape_field(&self.guild_name),
            Cow::Owned(self.channel_id.to_string()),
            escape_field(&self.channel_name),
            Cow::Borrowed(self.session_type.as_str()),
        ])
    }
}

/// A live voice presence, keyed by `(member_id, guild_id)` in the tracker
///
/// Names are captured at join time; the session row uses them even if the
/// member or channel was renamed before the leave.
#[derive(Debug, Clone, PartialEq)]
pub struct VoiceConnection {
    pub member_id: MemberId,
    pub member_name: String,
    pub guild_id: GuildId,
    pub guild_name: String,
    pub channel_id: ChannelId,
    pub channel_name: String,
    pub start_time: f64,
}

impl VoiceConnection {
    pub fn open(member: &MemberRef, channel: &ChannelRef, start_time: f64) -> Self {
        Self {
            member_id: member.id,
            member_name: member.name.clone(),
            guild_id: member.guild.id,
            guild_name: member.guild.name.clone(),
            channel_id: channel.id,
            channel_name: channel.name.clone(),
            start_time,
        }
    }
}
