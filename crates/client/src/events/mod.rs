pub mod chat;

use {
    crate::{Error, state::SharedState},
    homelab_protocol::InboundFrame,
    tracing::{trace, warn},
};

/// What a single inbound frame did.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameOutcome {
    /// A chat message was appended to the state.
    Appended,
    /// The server reported an error; the payload is handed back untouched.
    ServerError(serde_json::Value),
    /// The frame carried a tag this client does not know.
    Unrecognized(String),
}

/// Decode one text frame and apply it to the shared state.
///
/// Only `SendChatMessage` mutates the message list. Everything else is
/// counted in [`FrameStats`](crate::state::FrameStats) and logged. A frame
/// that fails to decode returns `Error::Json` and leaves the state otherwise
/// untouched.
pub fn handle_frame(state: &SharedState, text: &str) -> Result<FrameOutcome, Error> {
    let frame = match InboundFrame::decode(text) {
        Ok(frame) => frame,
        Err(e) => {
            state.record_frame(|stats| stats.decode_failures += 1);
            warn!(error = %e, len = text.len(), "failed to decode chat frame");
            return Err(Error::Json(e));
        },
    };
    trace!(kind = frame.kind(), "chat frame");

    Ok(match frame {
        InboundFrame::SendChatMessage(message) => {
            chat::handle_chat_message(state, message);
            FrameOutcome::Appended
        },
        InboundFrame::SendError(payload) => {
            chat::handle_server_error(state, &payload);
            FrameOutcome::ServerError(payload)
        },
        InboundFrame::Unrecognized { kind, .. } => {
            state.record_frame(|stats| stats.unrecognized += 1);
            warn!(kind = %kind, "unrecognized chat frame");
            FrameOutcome::Unrecognized(kind)
        },
    })
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    fn message_frame(id: &str) -> String {
        serde_json::json!({
            "type": "SendChatMessage",
            "data": {
                "_id": id,
                "channel_id": "c1",
                "author_id": "u1",
                "contents": format!("text {id}"),
                "reply_to": null,
                "reactions": [],
                "pinned": false,
                "created_at": 1,
                "updated_at": 1
            }
        })
        .to_string()
    }

    #[test]
    fn n_frames_append_n_messages_in_order() {
        let state = SharedState::new();
        let ids: Vec<String> = (0..25).map(|i| format!("m{i}")).collect();
        for id in &ids {
            assert_eq!(
                handle_frame(&state, &message_frame(id)).unwrap(),
                FrameOutcome::Appended
            );
        }
        let got: Vec<String> = state.messages().into_iter().map(|m| m.id).collect();
        assert_eq!(got, ids);
    }

    #[test]
    fn duplicate_ids_are_kept() {
        let state = SharedState::new();
        handle_frame(&state, &message_frame("m1")).unwrap();
        handle_frame(&state, &message_frame("m1")).unwrap();
        assert_eq!(state.message_count(), 2);
    }

    #[test]
    fn error_frame_leaves_messages_alone() {
        let state = SharedState::new();
        handle_frame(&state, &message_frame("m1")).unwrap();

        let outcome = handle_frame(
            &state,
            r#"{"type":"SendError","data":{"status_code":403,"msg":"You are not in this chat channel"}}"#,
        )
        .unwrap();

        assert!(matches!(outcome, FrameOutcome::ServerError(ref p) if p["status_code"] == 403));
        assert_eq!(state.message_count(), 1);
        assert_eq!(state.frame_stats().server_errors, 1);
        let kept = state.last_server_error().unwrap();
        assert_eq!(kept["msg"], "You are not in this chat channel");
    }

    #[test]
    fn unknown_tag_leaves_messages_alone() {
        let state = SharedState::new();
        let outcome = handle_frame(&state, r#"{"type":"SendAck","data":{}}"#).unwrap();
        assert_eq!(outcome, FrameOutcome::Unrecognized("SendAck".into()));
        assert_eq!(state.message_count(), 0);
        assert_eq!(state.frame_stats().unrecognized, 1);
    }

    #[test]
    fn frame_missing_data_is_a_decode_failure() {
        let state = SharedState::new();
        for bad in [r#"{"type":"SendError"}"#, r#"{"type":"SendAck"}"#] {
            assert!(matches!(handle_frame(&state, bad), Err(Error::Json(_))), "{bad}");
        }
        let stats = state.frame_stats();
        assert_eq!(stats.decode_failures, 2);
        assert_eq!(stats.server_errors, 0);
        assert_eq!(stats.unrecognized, 0);
    }

    #[test]
    fn malformed_body_is_rejected() {
        let state = SharedState::new();
        for bad in ["", "{", "[1,2]", r#"{"data":{}}"#, r#"{"type":"SendChatMessage","data":42}"#] {
            assert!(matches!(handle_frame(&state, bad), Err(Error::Json(_))), "{bad}");
        }
        assert_eq!(state.message_count(), 0);
        assert_eq!(state.frame_stats().decode_failures, 5);

        // The handler keeps working afterwards.
        handle_frame(&state, &message_frame("m1")).unwrap();
        assert_eq!(state.message_count(), 1);
    }
}
