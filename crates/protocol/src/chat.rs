//! Chat channel and chat message shapes.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

// ── Channel type ─────────────────────────────────────────────────────────────

/// Kind of chat channel.
///
/// Sent to the server as its integer code. The server has been seen to return
/// either the code or the variant name, so both are accepted when decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelType {
    DirectMessage,
    Group,
    /// Placeholder for a more featured group chat.
    Server,
}

impl ChannelType {
    pub const ALL: [Self; 3] = [Self::DirectMessage, Self::Group, Self::Server];

    pub fn code(self) -> i64 {
        match self {
            Self::DirectMessage => 0,
            Self::Group => 1,
            Self::Server => 2,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.code() == code)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::DirectMessage => "DirectMessage",
            Self::Group => "Group",
            Self::Server => "Server",
        }
    }
}

impl fmt::Display for ChannelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown channel type: {0}")]
pub struct ParseChannelTypeError(String);

impl FromStr for ChannelType {
    type Err = ParseChannelTypeError;

    /// Accepts the integer code or the variant name (case-insensitive, `-`/`_`
    /// ignored, so `direct-message` works).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(code) = s.trim().parse::<i64>() {
            return Self::from_code(code).ok_or_else(|| ParseChannelTypeError(s.to_owned()));
        }
        let normalized: String = s
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect::<String>()
            .to_lowercase();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().to_lowercase() == normalized)
            .ok_or_else(|| ParseChannelTypeError(s.to_owned()))
    }
}

impl Serialize for ChannelType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.code())
    }
}

impl<'de> Deserialize<'de> for ChannelType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Code(i64),
            Name(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Code(code) => Self::from_code(code).ok_or_else(|| {
                serde::de::Error::custom(format!("unsupported channel type code {code}"))
            }),
            Repr::Name(name) => name.parse().map_err(serde::de::Error::custom),
        }
    }
}

// ── Channels ─────────────────────────────────────────────────────────────────

/// A chat room that messages belong to and users subscribe to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatChannel {
    #[serde(rename = "_id")]
    pub id: String,
    pub slug: String,
    pub channel_type: ChannelType,
    #[serde(default)]
    pub name: Option<String>,
    /// Message ids, in pin order.
    #[serde(default)]
    pub pinned_messages: Vec<String>,
    /// User ids.
    #[serde(default)]
    pub subscribers: Vec<String>,
    pub owner_id: String,
    pub created_at: i64,
}

impl ChatChannel {
    /// Display name: name if set, otherwise slug.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.slug)
    }
}

/// Body of `POST /chat/channels`. The server assigns id, owner and timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateChatChannel {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub channel_type: ChannelType,
    pub slug: String,
}

/// Query of `GET /chat/channels`. Unset fields apply no filter on that axis.
///
/// How `my_channels` and `all_channels` combine is up to the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListChatChannelsParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub my_channels: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub all_channels: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscribed: Option<bool>,
}

impl ListChatChannelsParams {
    pub fn is_empty(&self) -> bool {
        self.my_channels.is_none() && self.all_channels.is_none() && self.subscribed.is_none()
    }
}

/// Body of `PUT /chat/channels/subscribe` and `/unsubscribe`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatChannelSubscribe {
    pub channel_id: String,
}

// ── Messages ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmojiDetails {
    pub id: String,
    pub name: String,
}

/// Aggregated reactions of one emoji on a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reaction {
    pub count: i64,
    pub emoji: EmojiDetails,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    #[serde(rename = "_id")]
    pub id: String,
    pub channel_id: String,
    pub author_id: String,
    pub contents: String,
    /// Message this one replies to, if any.
    pub reply_to: Option<String>,
    #[serde(default)]
    pub reactions: Vec<Reaction>,
    #[serde(default)]
    pub pinned: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Payload of an outbound `CreateMessage` request. `reply_to` is always sent,
/// as `null` when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendMessagePacket {
    pub channel_id: String,
    pub contents: String,
    pub reply_to: Option<String>,
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_type_accepts_code_and_name() {
        let from_code: ChannelType = serde_json::from_str("1").unwrap();
        let from_name: ChannelType = serde_json::from_str(r#""DirectMessage""#).unwrap();
        assert_eq!(from_code, ChannelType::Group);
        assert_eq!(from_name, ChannelType::DirectMessage);
        assert!(serde_json::from_str::<ChannelType>("7").is_err());
        assert!(serde_json::from_str::<ChannelType>(r#""Lobby""#).is_err());
    }

    #[test]
    fn channel_type_serializes_as_code() {
        let body = CreateChatChannel {
            name: None,
            channel_type: ChannelType::Server,
            slug: "general".into(),
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({"channel_type": 2, "slug": "general"})
        );
    }

    #[test]
    fn channel_type_from_str() {
        assert_eq!("group".parse::<ChannelType>().unwrap(), ChannelType::Group);
        assert_eq!(
            "direct-message".parse::<ChannelType>().unwrap(),
            ChannelType::DirectMessage
        );
        assert_eq!("2".parse::<ChannelType>().unwrap(), ChannelType::Server);
        assert!("9".parse::<ChannelType>().is_err());
        assert!("lobby".parse::<ChannelType>().is_err());
    }

    #[test]
    fn channel_display_name_falls_back_to_slug() {
        let mut channel: ChatChannel = serde_json::from_value(serde_json::json!({
            "_id": "c1",
            "slug": "general",
            "channel_type": "Group",
            "pinned_messages": [],
            "subscribers": ["u1"],
            "owner_id": "u1",
            "created_at": 10
        }))
        .unwrap();
        assert_eq!(channel.display_name(), "general");
        channel.name = Some("General".into());
        assert_eq!(channel.display_name(), "General");
    }

    #[test]
    fn empty_list_params_serialize_to_nothing() {
        let params = ListChatChannelsParams::default();
        assert!(params.is_empty());
        assert_eq!(serde_json::to_value(&params).unwrap(), serde_json::json!({}));

        let params = ListChatChannelsParams {
            subscribed: Some(false),
            ..Default::default()
        };
        assert!(!params.is_empty());
        assert_eq!(
            serde_json::to_value(&params).unwrap(),
            serde_json::json!({"subscribed": false})
        );
    }

    #[test]
    fn message_with_reply_and_reactions() {
        let msg: ChatMessage = serde_json::from_value(serde_json::json!({
            "_id": "m2",
            "channel_id": "c1",
            "author_id": "u2",
            "contents": "agreed",
            "reply_to": "m1",
            "reactions": [{"count": 3, "emoji": {"id": "e1", "name": "thumbsup"}}],
            "pinned": true,
            "created_at": 5,
            "updated_at": 6
        }))
        .unwrap();
        assert_eq!(msg.reply_to.as_deref(), Some("m1"));
        assert_eq!(msg.reactions[0].count, 3);
        assert_eq!(msg.reactions[0].emoji.name, "thumbsup");
        assert!(msg.pinned);
    }
}
