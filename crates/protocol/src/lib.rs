//! Homelab wire protocol definitions.
//!
//! The realtime chat endpoint speaks JSON text frames over WebSocket. Every
//! frame is adjacently tagged:
//!
//! ```json
//! { "type": "SendChatMessage", "data": { ... } }
//! ```
//!
//! Frame types:
//! - [`InboundFrame`]: server to client push
//! - [`OutboundRequest`]: client to server request
//!
//! The REST shapes for chat channels, connections games, reminders and users
//! live in their own modules.

pub mod chat;
pub mod games;
pub mod reminders;
pub mod users;

use serde::{Deserialize, Serialize};

pub use {
    chat::{
        ChannelType, ChatChannel, ChatChannelSubscribe, ChatMessage, CreateChatChannel,
        EmojiDetails, ListChatChannelsParams, ParseChannelTypeError, Reaction, SendMessagePacket,
    },
    games::{
        ConnectionGameRow, ConnectionsGame, CreateConnectionsGame, MinimalConnectionsGame,
        PlayConnectionGame, TrySolveRow,
    },
    reminders::{CreateReminder, CreateReminderCategory, Priority, Reminder, ReminderCategory},
    users::{ReturnUser, UserCredentials},
};

// ── Constants ────────────────────────────────────────────────────────────────

/// Path of the realtime chat endpoint, relative to the WebSocket base URL.
pub const CHAT_WS_PATH: &str = "/chat/ws";
/// Query parameter carrying the session credential on the upgrade request.
pub const AUTH_TOKEN_PARAM: &str = "auth_token";

pub mod frame_types {
    pub const SEND_CHAT_MESSAGE: &str = "SendChatMessage";
    pub const SEND_ERROR: &str = "SendError";
    pub const CREATE_MESSAGE: &str = "CreateMessage";
}

// ── Inbound frames ───────────────────────────────────────────────────────────

/// Undecoded `{type, data}` envelope. Both fields are required; `data` may be
/// `null` but not absent.
#[derive(Debug, Deserialize)]
struct RawFrame {
    #[serde(rename = "type")]
    kind: String,
    data: serde_json::Value,
}

/// Server → client push.
///
/// Only two tags are defined by the server today. Anything else decodes to
/// [`InboundFrame::Unrecognized`] so callers can surface protocol drift
/// instead of failing the whole connection.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundFrame {
    SendChatMessage(ChatMessage),
    SendError(serde_json::Value),
    Unrecognized {
        kind: String,
        data: serde_json::Value,
    },
}

impl InboundFrame {
    /// Decode a text frame.
    ///
    /// Fails when the body is not JSON, is missing `type` or `data`, or
    /// carries a `SendChatMessage` whose `data` is not a chat message.
    pub fn decode(text: &str) -> Result<Self, serde_json::Error> {
        let raw: RawFrame = serde_json::from_str(text)?;
        Ok(match raw.kind.as_str() {
            frame_types::SEND_CHAT_MESSAGE => Self::SendChatMessage(serde_json::from_value(raw.data)?),
            frame_types::SEND_ERROR => Self::SendError(raw.data),
            _ => Self::Unrecognized {
                kind: raw.kind,
                data: raw.data,
            },
        })
    }

    /// The wire tag of this frame.
    pub fn kind(&self) -> &str {
        match self {
            Self::SendChatMessage(_) => frame_types::SEND_CHAT_MESSAGE,
            Self::SendError(_) => frame_types::SEND_ERROR,
            Self::Unrecognized { kind, .. } => kind,
        }
    }
}

// ── Outbound requests ────────────────────────────────────────────────────────

/// Client → server request over the realtime channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum OutboundRequest {
    /// Post a new message to a channel.
    CreateMessage(SendMessagePacket),
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    fn message_json() -> serde_json::Value {
        serde_json::json!({
            "_id": "m1",
            "channel_id": "c1",
            "author_id": "u1",
            "contents": "hi",
            "reply_to": null,
            "reactions": [],
            "pinned": false,
            "created_at": 1,
            "updated_at": 1
        })
    }

    #[test]
    fn decodes_chat_message_frame() {
        let text = serde_json::json!({"type": "SendChatMessage", "data": message_json()}).to_string();
        let frame = InboundFrame::decode(&text).unwrap();
        let InboundFrame::SendChatMessage(msg) = frame else {
            panic!("expected a chat message, got {frame:?}");
        };
        assert_eq!(msg.id, "m1");
        assert_eq!(msg.channel_id, "c1");
        assert!(msg.reply_to.is_none());
        assert!(msg.reactions.is_empty());
    }

    #[test]
    fn frame_without_data_fails() {
        assert!(InboundFrame::decode(r#"{"type":"SendError"}"#).is_err());
        assert!(InboundFrame::decode(r#"{"type":"SendAck"}"#).is_err());
    }

    #[test]
    fn error_frame_with_null_data() {
        let frame = InboundFrame::decode(r#"{"type":"SendError","data":null}"#).unwrap();
        assert_eq!(frame, InboundFrame::SendError(serde_json::Value::Null));
        assert_eq!(frame.kind(), "SendError");
    }

    #[test]
    fn unknown_tag_is_unrecognized() {
        let frame = InboundFrame::decode(r#"{"type":"SendAck","data":{"status_code":200}}"#).unwrap();
        assert_eq!(frame.kind(), "SendAck");
        assert!(matches!(frame, InboundFrame::Unrecognized { .. }));
    }

    #[test]
    fn malformed_frames_fail() {
        assert!(InboundFrame::decode("not json").is_err());
        assert!(InboundFrame::decode(r#"{"data":{}}"#).is_err());
        assert!(InboundFrame::decode(r#"{"type":"SendChatMessage"}"#).is_err());
        assert!(InboundFrame::decode(r#"{"type":"SendChatMessage","data":{"_id":"m1"}}"#).is_err());
    }

    #[test]
    fn outbound_request_is_adjacently_tagged() {
        let req = OutboundRequest::CreateMessage(SendMessagePacket {
            channel_id: "c1".into(),
            contents: "hello".into(),
            reply_to: None,
        });
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "type": "CreateMessage",
                "data": {"channel_id": "c1", "contents": "hello", "reply_to": null}
            })
        );
    }
}
