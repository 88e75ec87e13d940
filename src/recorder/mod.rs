//! Guild Event Recorder
//!
//! One method per structural-change kind. Each builds the kind's payload,
//! wraps it in a [`GuildMetadataEvent`] at the current schema version and
//! appends it to the guild's journal. No deduplication or validation.

use std::sync::Arc;

use tracing::debug;

use crate::storage::{ActivityLog, StorageResult};
use crate::types::{
    ChannelCategoryChangePayload, ChannelPayload, ChannelRef, ChannelRenamePayload, GuildEventKind,
    GuildEventPayload, GuildId, GuildJoinBotPayload, GuildMetadataEvent, GuildRef,
    GuildRenamePayload, MemberPayload, MemberRef,
};

/// Writes schema-versioned structural-change records
pub struct GuildEventRecorder<L: ActivityLog> {
    log: Arc<L>,
}

impl<L: ActivityLog> GuildEventRecorder<L> {
    pub fn new(log: Arc<L>) -> Self {
        Self { log }
    }

    /// `channel_add`
    pub fn channel_added(
        &self,
        timestamp: f64,
        guild_id: GuildId,
        channel: &ChannelRef,
    ) -> StorageResult<GuildMetadataEvent> {
        self.append(
            timestamp,
            guild_id,
            GuildEventKind::ChannelAdd,
            GuildEventPayload::Channel(ChannelPayload::from(channel)),
        )
    }

    /// `channel_remove`
    pub fn channel_removed(
        &self,
        timestamp: f64,
        guild_id: GuildId,
        channel: &ChannelRef,
    ) -> StorageResult<GuildMetadataEvent> {
        self.append(
            timestamp,
            guild_id,
            GuildEventKind::ChannelRemove,
            GuildEventPayload::Channel(ChannelPayload::from(channel)),
        )
    }

    /// `channel_rename`; category and type are taken from `before`
    pub fn channel_renamed(
        &self,
        timestamp: f64,
        guild_id: GuildId,
        before: &ChannelRef,
        after: &ChannelRef,
    ) -> StorageResult<GuildMetadataEvent> {
        let payload = ChannelRenamePayload {
            channel_id: before.id,
            channel_name_old: before.name.clone(),
            channel_name_new: after.name.clone(),
            channel_category_id: before.category_id,
            channel_type: before.kind,
        };
        self.append(
            timestamp,
            guild_id,
            GuildEventKind::ChannelRename,
            GuildEventPayload::ChannelRename(payload),
        )
    }

    /// `channel_category_change`; name and type are taken from `before`
    pub fn channel_recategorized(
        &self,
        timestamp: f64,
        guild_id: GuildId,
        before: &ChannelRef,
        after: &ChannelRef,
    ) -> StorageResult<GuildMetadataEvent> {
        let payload = ChannelCategoryChangePayload {
            channel_id: before.id,
            channel_name: before.name.clone(),
            channel_category_id_old: before.category_id,
            channel_category_id_new: after.category_id,
            channel_type: before.kind,
        };
        self.append(
            timestamp,
            guild_id,
            GuildEventKind::ChannelCategoryChange,
            GuildEventPayload::ChannelCategoryChange(payload),
        )
    }

    /// `member_join`
    pub fn member_joined(&self, timestamp: f64, member: &MemberRef) -> StorageResult<GuildMetadataEvent> {
        self.append(
            timestamp,
            member.guild.id,
            GuildEventKind::MemberJoin,
            GuildEventPayload::Member(MemberPayload::from(member)),
        )
    }

    /// `member_remove`
    pub fn member_removed(&self, timestamp: f64, member: &MemberRef) -> StorageResult<GuildMetadataEvent> {
        self.append(
            timestamp,
            member.guild.id,
            GuildEventKind::MemberRemove,
            GuildEventPayload::Member(MemberPayload::from(member)),
        )
    }

    /// `guild_rename`
    pub fn guild_renamed(
        &self,
        timestamp: f64,
        before: &GuildRef,
        after: &GuildRef,
    ) -> StorageResult<GuildMetadataEvent> {
        let payload = GuildRenamePayload {
            guild_name_old: before.name.clone(),
            guild_name_new: after.name.clone(),
        };
        self.append(
            timestamp,
            before.id,
            GuildEventKind::GuildRename,
            GuildEventPayload::GuildRename(payload),
        )
    }

    /// `guild_join_bot`
    pub fn bot_joined(&self, timestamp: f64, guild: &GuildRef) -> StorageResult<GuildMetadataEvent> {
        self.append(
            timestamp,
            guild.id,
            GuildEventKind::GuildJoinBot,
            GuildEventPayload::GuildJoinBot(GuildJoinBotPayload::from(guild)),
        )
    }

    fn append(
        &self,
        timestamp: f64,
        guild_id: GuildId,
        kind: GuildEventKind,
        payload: GuildEventPayload,
    ) -> StorageResult<GuildMetadataEvent> {
        debug!("Guild {} event type {}", guild_id, kind);
        let event = GuildMetadataEvent::new(timestamp, guild_id, kind, payload);
        self.log.append_guild_event(&event)?;
        Ok(event)
    }
}
