//! Identity types delivered by the gateway
//!
//! Every notification carries enough id/name data to fill a record
//! without further lookups, so these are plain owned snapshots.

use serde::{Deserialize, Serialize};

/// Snowflake id of a guild
pub type GuildId = u64;
/// Snowflake id of a member (user)
pub type MemberId = u64;
/// Snowflake id of a channel
pub type ChannelId = u64;

/// A guild as seen at the time of the notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildRef {
    pub id: GuildId,
    pub name: String,
}

impl GuildRef {
    pub fn new(id: GuildId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// A guild member together with the guild it belongs to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberRef {
    pub id: MemberId,
    pub name: String,
    pub guild: GuildRef,
}

impl MemberRef {
    pub fn new(id: MemberId, name: impl Into<String>, guild: GuildRef) -> Self {
        Self {
            id,
            name: name.into(),
            guild,
        }
    }
}

/// Platform channel kinds
///
/// Serialized in snake_case; kinds this crate does not know about
/// deserialize as `Unknown` instead of rejecting the notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelKind {
    #[default]
    Text,
    Voice,
    Category,
    News,
    NewsThread,
    PublicThread,
    PrivateThread,
    StageVoice,
    Forum,
    Media,
    #[serde(other)]
    Unknown,
}

impl ChannelKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChannelKind::Text => "text",
            ChannelKind::Voice => "voice",
            ChannelKind::Category => "category",
            ChannelKind::News => "news",
            ChannelKind::NewsThread => "news_thread",
            ChannelKind::PublicThread => "public_thread",
            ChannelKind::PrivateThread => "private_thread",
            ChannelKind::StageVoice => "stage_voice",
            ChannelKind::Forum => "forum",
            ChannelKind::Media => "media",
            ChannelKind::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A guild channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelRef {
    pub id: ChannelId,
    pub name: String,
    /// Parent category, if the channel sits inside one
    #[serde(default)]
    pub category_id: Option<ChannelId>,
    #[serde(rename = "type", default)]
    pub kind: ChannelKind,
}

impl ChannelRef {
    pub fn new(id: ChannelId, name: impl Into<String>, kind: ChannelKind) -> Self {
        Self {
            id,
            name: name.into(),
            category_id: None,
            kind,
        }
    }

    /// Create a voice channel reference
    pub fn voice(id: ChannelId, name: impl Into<String>) -> Self {
        Self::new(id, name, ChannelKind::Voice)
    }

    /// Set the parent category
    pub fn in_category(mut self, category_id: ChannelId) -> Self {
        self.category_id = Some(category_id);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_kind_unknown_fallback() {
        let kind: ChannelKind = serde_json::from_str("\"directory\"").unwrap();
        assert_eq!(kind, ChannelKind::Unknown);

        let kind: ChannelKind = serde_json::from_str("\"stage_voice\"").unwrap();
        assert_eq!(kind, ChannelKind::StageVoice);
        assert_eq!(kind.to_string(), "stage_voice");
    }

    #[test]
    fn test_channel_ref_defaults() {
        let channel: ChannelRef = serde_json::from_str(r#"{"id": 7, "name": "lobby"}"#).unwrap();
        assert_eq!(channel.category_id, None);
        assert_eq!(channel.kind, ChannelKind::Text);

        let channel: ChannelRef =
            serde_json::from_str(r#"{"id": 7, "name": "lobby", "category_id": 3, "type": "voice"}"#)
                .unwrap();
        assert_eq!(channel, ChannelRef::voice(7, "lobby").in_category(3));
    }
}
