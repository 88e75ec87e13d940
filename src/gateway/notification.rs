use serde::{Deserialize, Serialize};

use crate::types::{ChannelRef, GuildRef, MemberRef};

/// Closed set of gateway callbacks the router handles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Notification {
    /// Connection established; carries every guild the bot is in
    Ready { guilds: Vec<GuildRef> },
    /// Bot was added to a guild
    GuildJoined { guild: GuildRef },
    GuildUpdated { before: GuildRef, after: GuildRef },
    ChannelCreated { guild: GuildRef, channel: ChannelRef },
    ChannelDeleted { guild: GuildRef, channel: ChannelRef },
    /// Rename and/or move between categories
    ChannelUpdated {
        guild: GuildRef,
        before: ChannelRef,
        after: ChannelRef,
    },
    MemberJoined { member: MemberRef },
    MemberRemoved { member: MemberRef },
    /// `None` on a side means "not in a voice channel"
    VoiceStateUpdated {
        member: MemberRef,
        #[serde(default)]
        before: Option<ChannelRef>,
        #[serde(default)]
        after: Option<ChannelRef>,
    },
}

impl Notification {
    /// Wire tag, for logs
    pub fn name(&self) -> &'static str {
        match self {
            Notification::Ready { .. } => "ready",
            Notification::GuildJoined { .. } => "guild_joined",
            Notification::GuildUpdated { .. } => "guild_updated",
            Notification::ChannelCreated { .. } => "channel_created",
            Notification::ChannelDeleted { .. } => "channel_deleted",
            Notification::ChannelUpdated { .. } => "channel_updated",
            Notification::MemberJoined { .. } => "member_joined",
            Notification::MemberRemoved { .. } => "member_removed",
            Notification::VoiceStateUpdated { .. } => "voice_state_updated",
        }
    }

    /// Parse one feed line
    pub fn from_json_line(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ChannelKind;

    #[test]
    fn test_parse_ready() {
        let n = Notification::from_json_line(
            r#"{"event":"ready","guilds":[{"id":1,"name":"One"},{"id":2,"name":"Two"}]}"#,
        )
        .unwrap();

        match n {
            Notification::Ready { guilds } => {
                assert_eq!(guilds.len(), 2);
                assert_eq!(guilds[1], GuildRef::new(2, "Two"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_parse_voice_state_with_missing_side() {
        let n = Notification::from_json_line(
            r#"{"event":"voice_state_updated","member":{"id":7,"name":"M","guild":{"id":1,"name":"G"}},"after":{"id":10,"name":"A","type":"voice"}}"#,
        )
        .unwrap();

        assert_eq!(n.name(), "voice_state_updated");
        match n {
            Notification::VoiceStateUpdated {
                member,
                before,
                after,
            } => {
                assert_eq!(member.guild.id, 1);
                assert!(before.is_none());
                let after = after.unwrap();
                assert_eq!(after.kind, ChannelKind::Voice);
                assert_eq!(after.category_id, None);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_parse_channel_updated() {
        let n = Notification::from_json_line(
            r#"{"event":"channel_updated","guild":{"id":1,"name":"G"},"before":{"id":5,"name":"a","category_id":3,"type":"text"},"after":{"id":5,"name":"b","category_id":4,"type":"text"}}"#,
        )
        .unwrap();

        match n {
            Notification::ChannelUpdated { before, after, .. } => {
                assert_eq!(before.category_id, Some(3));
                assert_eq!(after.name, "b");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_unknown_channel_type_is_tolerated() {
        let n = Notification::from_json_line(
            r#"{"event":"channel_created","guild":{"id":1,"name":"G"},"channel":{"id":5,"name":"x","type":"directory"}}"#,
        )
        .unwrap();

        match n {
            Notification::ChannelCreated { channel, .. } => {
                assert_eq!(channel.kind, ChannelKind::Unknown)
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_rejects_unknown_event() {
        assert!(Notification::from_json_line(r#"{"event":"typing_started"}"#).is_err());
        assert!(Notification::from_json_line("not json").is_err());
        assert!(Notification::from_json_line(r#"{"event":"member_joined"}"#).is_err());
    }
}
