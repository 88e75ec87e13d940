//! Data types for the Server Recap logger
//!
//! This module contains the records written to disk and the identity
//! snapshots the gateway delivers with each notification.

mod guild_event;
mod identity;
mod voice;

pub use guild_event::{
    ChannelCategoryChangePayload, ChannelPayload, ChannelRenamePayload, GuildEventKind,
    GuildEventPayload, GuildJoinBotPayload, GuildMetadataEvent, GuildRenamePayload,
    MemberPayload, SCHEMA_VERSION,
};
pub use identity::{ChannelId, ChannelKind, ChannelRef, GuildId, GuildRef, MemberId, MemberRef};
pub use voice::{
    EventRecord, SessionRecord, SessionType, VoiceConnection, VoiceEventType, UNKNOWN_START_TIME,
};
