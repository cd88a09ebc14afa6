use {
    crate::state::SharedState,
    homelab_protocol::ChatMessage,
    serde_json::Value,
    tracing::{debug, warn},
};

/// Handle a `SendChatMessage` frame: append in arrival order, no dedup.
pub fn handle_chat_message(state: &SharedState, message: ChatMessage) {
    debug!(
        message_id = %message.id,
        channel_id = %message.channel_id,
        "chat message received"
    );
    state.push_message(message);
}

/// Handle a `SendError` frame.
///
/// The server has not settled on an error payload yet. The message list is
/// left alone; the payload is kept as
/// [`ClientState::last_server_error`](crate::ClientState::last_server_error)
/// and also handed back through
/// [`FrameOutcome::ServerError`](super::FrameOutcome::ServerError).
pub fn handle_server_error(state: &SharedState, payload: &Value) {
    let msg = payload
        .get("msg")
        .and_then(Value::as_str)
        .unwrap_or("unspecified error");
    warn!(error = msg, "chat server reported an error");
    state.record_server_error(payload.clone());
}
