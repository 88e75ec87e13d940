//! Event Router
//!
//! Maps each gateway [`Notification`] onto the voice tracker or the guild
//! event recorder. On `ready` and `guild_joined` it bootstraps guild files
//! up front so later writes never race file creation.

mod feed;
mod stats;

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::gateway::Notification;
use crate::recorder::GuildEventRecorder;
use crate::storage::{ActivityLog, StorageResult};
use crate::tracker::VoiceSessionTracker;
use crate::types::{ChannelRef, GuildRef};
use crate::utils::current_timestamp;

pub use feed::{run_shared_feed, FeedError, FeedReport};
pub use stats::RouterStats;

/// Single-threaded dispatcher over one `ActivityLog`
pub struct EventRouter<L: ActivityLog> {
    log: Arc<L>,
    tracker: VoiceSessionTracker<L>,
    recorder: GuildEventRecorder<L>,
    stats: RouterStats,
}

impl<L: ActivityLog> EventRouter<L> {
    pub fn new(log: Arc<L>) -> Self {
        Self {
            tracker: VoiceSessionTracker::new(Arc::clone(&log)),
            recorder: GuildEventRecorder::new(Arc::clone(&log)),
            log,
            stats: RouterStats::default(),
        }
    }

    /// Dispatch at the current wall-clock time
    pub fn dispatch(&mut self, notification: Notification) -> StorageResult<()> {
        self.dispatch_at(notification, current_timestamp())
    }

    /// Dispatch with an explicit timestamp (seconds since the epoch)
    pub fn dispatch_at(&mut self, notification: Notification, timestamp: f64) -> StorageResult<()> {
        self.stats.notifications += 1;
        debug!("Dispatching {}", notification.name());

        match notification {
            Notification::Ready { guilds } => {
                info!("Ready, connected to {} guilds", guilds.len());
                for guild in &guilds {
                    self.bootstrap(guild)?;
                }
            }
            Notification::GuildJoined { guild } => {
                info!("Joined guild {} ({})", guild.name, guild.id);
                self.bootstrap(&guild)?;
                self.recorder.bot_joined(timestamp, &guild)?;
                self.stats.guild_events += 1;
            }
            Notification::GuildUpdated { before, after } => {
                if before.name != after.name {
                    self.recorder.guild_renamed(timestamp, &before, &after)?;
                    self.stats.guild_events += 1;
                }
            }
            Notification::ChannelCreated { guild, channel } => {
                self.recorder.channel_added(timestamp, guild.id, &channel)?;
                self.stats.guild_events += 1;
            }
            Notification::ChannelDeleted { guild, channel } => {
                self.recorder.channel_removed(timestamp, guild.id, &channel)?;
                self.stats.guild_events += 1;
            }
            Notification::ChannelUpdated {
                guild,
                before,
                after,
            } => self.channel_updated(timestamp, &guild, &before, &after)?,
            Notification::MemberJoined { member } => {
                self.recorder.member_joined(timestamp, &member)?;
                self.stats.guild_events += 1;
            }
            Notification::MemberRemoved { member } => {
                self.recorder.member_removed(timestamp, &member)?;
                self.stats.guild_events += 1;
            }
            Notification::VoiceStateUpdated {
                member,
                before,
                after,
            } => {
                let outcome =
                    self.tracker
                        .on_transition(&member, before.as_ref(), after.as_ref(), timestamp)?;
                self.stats.record_transition(&outcome);
            }
        }

        Ok(())
    }

    pub fn tracker(&self) -> &VoiceSessionTracker<L> {
        &self.tracker
    }

    pub fn stats(&self) -> &RouterStats {
        &self.stats
    }

    /// Log counters and the voice connections whose start times will be lost
    pub fn log_summary(&self) {
        self.stats.log_summary();
        let open = self.tracker.open_count();
        if open > 0 {
            warn!("{} voice connections still open; their start times are lost", open);
        }
    }

    fn bootstrap(&self, guild: &GuildRef) -> StorageResult<()> {
        if self.log.ensure_guild(guild.id)? {
            info!("Guild files ready for {} ({})", guild.name, guild.id);
        }
        Ok(())
    }

    fn channel_updated(
        &mut self,
        timestamp: f64,
        guild: &GuildRef,
        before: &ChannelRef,
        after: &ChannelRef,
    ) -> StorageResult<()> {
        if before.name != after.name {
            self.recorder.channel_renamed(timestamp, guild.id, before, after)?;
            self.stats.guild_events += 1;
        }
        if before.category_id != after.category_id {
            self.recorder
                .channel_recategorized(timestamp, guild.id, before, after)?;
            self.stats.guild_events += 1;
        }
        Ok(())
    }
}
