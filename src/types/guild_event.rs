//! Guild metadata journal entries
//!
//! Structural changes (channels, members, renames) are written to
//! `guild_events.jsonl` as a versioned envelope around a payload whose
//! shape is fixed per kind.

use serde::{Deserialize, Serialize};

use super::identity::{ChannelId, ChannelKind, ChannelRef, GuildId, GuildRef, MemberId, MemberRef};

/// Current version of the journal envelope
pub const SCHEMA_VERSION: u32 = 1;

/// Kinds of structural change recorded in the journal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuildEventKind {
    ChannelAdd,
    ChannelRemove,
    ChannelRename,
    ChannelCategoryChange,
    MemberJoin,
    MemberRemove,
    GuildRename,
    GuildJoinBot,
}

impl std::fmt::Display for GuildEventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GuildEventKind::ChannelAdd => write!(f, "channel_add"),
            GuildEventKind::ChannelRemove => write!(f, "channel_remove"),
            GuildEventKind::ChannelRename => write!(f, "channel_rename"),
            GuildEventKind::ChannelCategoryChange => write!(f, "channel_category_change"),
            GuildEventKind::MemberJoin => write!(f, "member_join"),
            GuildEventKind::MemberRemove => write!(f, "member_remove"),
            GuildEventKind::GuildRename => write!(f, "guild_rename"),
            GuildEventKind::GuildJoinBot => write!(f, "guild_join_bot"),
        }
    }
}

/// Payload for `channel_add` and `channel_remove`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChannelPayload {
    pub channel_id: ChannelId,
    pub channel_name: String,
    pub channel_category_id: Option<ChannelId>,
    pub channel_type: ChannelKind,
}

impl From<&ChannelRef> for ChannelPayload {
    fn from(channel: &ChannelRef) -> Self {
        Self {
            channel_id: channel.id,
            channel_name: channel.name.clone(),
            channel_category_id: channel.category_id,
            channel_type: channel.kind,
        }
    }
}

/// Payload for `channel_rename`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChannelRenamePayload {
    pub channel_id: ChannelId,
    pub channel_name_old: String,
    pub channel_name_new: String,
    pub channel_category_id: Option<ChannelId>,
    pub channel_type: ChannelKind,
}

/// Payload for `channel_category_change`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChannelCategoryChangePayload {
    pub channel_id: ChannelId,
    pub channel_name: String,
    pub channel_category_id_old: Option<ChannelId>,
    pub channel_category_id_new: Option<ChannelId>,
    pub channel_type: ChannelKind,
}

/// Payload for `member_join` and `member_remove`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MemberPayload {
    pub member_id: MemberId,
    pub member_name: String,
}

impl From<&MemberRef> for MemberPayload {
    fn from(member: &MemberRef) -> Self {
        Self {
            member_id: member.id,
            member_name: member.name.clone(),
        }
    }
}

/// Payload for `guild_rename`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GuildRenamePayload {
    pub guild_name_old: String,
    pub guild_name_new: String,
}

/// Payload for `guild_join_bot`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GuildJoinBotPayload {
    pub guild_name: String,
}

impl From<&GuildRef> for GuildJoinBotPayload {
    fn from(guild: &GuildRef) -> Self {
        Self {
            guild_name: guild.name.clone(),
        }
    }
}

/// Typed payload of a journal entry
///
/// Untagged: the envelope's `guild_event` names the kind. Payload structs
/// deny unknown fields so the three channel shapes cannot be mistaken for
/// one another when a journal line is parsed back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GuildEventPayload {
    ChannelRename(ChannelRenamePayload),
    ChannelCategoryChange(ChannelCategoryChangePayload),
    Channel(ChannelPayload),
    GuildRename(GuildRenamePayload),
    GuildJoinBot(GuildJoinBotPayload),
    Member(MemberPayload),
}

/// One line of `guild_events.jsonl`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuildMetadataEvent {
    pub schema_version: u32,
    /// Unix time in seconds
    pub timestamp: f64,
    pub guild_event: GuildEventKind,
    pub guild_id: GuildId,
    pub payload: GuildEventPayload,
}

impl GuildMetadataEvent {
    /// Wrap a payload in an envelope at the current schema version
    pub fn new(
        timestamp: f64,
        guild_id: GuildId,
        guild_event: GuildEventKind,
        payload: GuildEventPayload,
    ) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            timestamp,
            guild_event,
            guild_id,
            payload,
        }
    }

    /// Serialize to a single JSON line (no trailing newline)
    pub fn to_json_line(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parse a journal line
    pub fn from_json_line(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }
}
