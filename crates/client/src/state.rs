//! Process-wide reactive client state.
//!
//! A single [`ClientState`] lives behind a `tokio::sync::watch` channel. Every
//! mutation goes through one of the setters on [`SharedState`], which publishes
//! it: any reader sees the new value on its next `borrow()`, and every
//! subscriber parked in `changed().await` is woken.

use std::sync::Arc;

use {
    homelab_protocol::ChatMessage,
    secrecy::{ExposeSecret, Secret},
    tokio::sync::watch,
    tracing::debug,
    uuid::Uuid,
};

use crate::connection::ChatConnection;

/// Lifecycle of the realtime connection held in the state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ConnectionStatus {
    /// No connection has been opened.
    #[default]
    Idle,
    Connecting,
    Open,
    /// Closed by either side without an error.
    Closed,
    /// Upgrade refused, socket error, or server dropped the stream.
    Failed(String),
}

/// Counters for frames that did not produce a chat message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub server_errors: u64,
    pub unrecognized: u64,
    pub decode_failures: u64,
}

/// Snapshot of everything the client shares between consumers.
#[derive(Debug, Default)]
pub struct ClientState {
    token: Option<Secret<String>>,
    connection: Option<ChatConnection>,
    /// Received chat messages in arrival order.
    pub messages: Vec<ChatMessage>,
    pub connection_status: ConnectionStatus,
    pub frame_stats: FrameStats,
    /// Payload of the most recent `SendError` frame.
    pub last_server_error: Option<serde_json::Value>,
}

impl ClientState {
    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    pub fn connection(&self) -> Option<&ChatConnection> {
        self.connection.as_ref()
    }

    /// Whether `id` is the connection in the slot, or the slot is still empty
    /// (the handle is installed after the task starts).
    fn owns_slot(&self, id: Uuid) -> bool {
        self.connection.as_ref().is_none_or(|c| c.id() == id)
    }
}

/// Cheap-to-clone handle on the shared [`ClientState`].
#[derive(Clone)]
pub struct SharedState {
    inner: Arc<watch::Sender<ClientState>>,
}

impl Default for SharedState {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SharedState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("SharedState").field(&*self.inner.borrow()).finish()
    }
}

impl SharedState {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(ClientState::default());
        Self {
            inner: Arc::new(tx),
        }
    }

    /// Observe every future mutation.
    pub fn subscribe(&self) -> watch::Receiver<ClientState> {
        self.inner.subscribe()
    }

    /// Read the current state. Do not hold the guard across an `.await`.
    pub fn borrow(&self) -> watch::Ref<'_, ClientState> {
        self.inner.borrow()
    }

    // ── Token ────────────────────────────────────────────────────────────────

    pub fn set_token(&self, token: impl Into<String>) {
        let token = Secret::new(token.into());
        self.inner.send_modify(|s| s.token = Some(token));
    }

    pub fn clear_token(&self) {
        self.inner.send_if_modified(|s| s.token.take().is_some());
    }

    pub fn token(&self) -> Option<Secret<String>> {
        self.inner.borrow().token.clone()
    }

    /// Expose the token to `f` without cloning it out of the state.
    pub(crate) fn with_token<R>(&self, f: impl FnOnce(&str) -> R) -> Option<R> {
        self.inner
            .borrow()
            .token
            .as_ref()
            .map(|t| f(t.expose_secret()))
    }

    // ── Connection slot ──────────────────────────────────────────────────────

    /// Install `connection` in the single connection slot. A connection already
    /// in the slot is closed first, and the published status becomes the new
    /// connection's own.
    pub fn set_connection(&self, connection: ChatConnection) {
        let id = connection.id();
        self.inner.send_modify(|s| {
            // Read under the lock: a report racing with the install either
            // lands in this value or applies after it.
            s.connection_status = connection.status();
            if let Some(previous) = s.connection.replace(connection) {
                debug!(previous = %previous.id(), next = %id, "replacing chat connection");
                previous.close();
            }
        });
    }

    /// Remove the connection from the slot without closing it.
    pub fn take_connection(&self) -> Option<ChatConnection> {
        let mut taken = None;
        self.inner.send_if_modified(|s| {
            taken = s.connection.take();
            taken.is_some()
        });
        taken
    }

    /// Close and drop the connection in the slot, if any.
    pub fn close_connection(&self) {
        if let Some(connection) = self.take_connection() {
            connection.close();
        }
    }

    pub fn has_connection(&self) -> bool {
        self.inner.borrow().connection.is_some()
    }

    pub(crate) fn set_connection_status(&self, id: Uuid, status: ConnectionStatus) {
        self.inner.send_if_modified(|s| {
            if !s.owns_slot(id) || s.connection_status == status {
                return false;
            }
            s.connection_status = status;
            true
        });
    }

    // ── Messages ─────────────────────────────────────────────────────────────

    /// Copy of the received messages.
    pub fn messages(&self) -> Vec<ChatMessage> {
        self.inner.borrow().messages.clone()
    }

    pub fn message_count(&self) -> usize {
        self.inner.borrow().messages.len()
    }

    /// Append a received message. Only the frame handler writes here.
    pub(crate) fn push_message(&self, message: ChatMessage) {
        self.inner.send_modify(|s| s.messages.push(message));
    }

    pub(crate) fn record_frame(&self, update: impl FnOnce(&mut FrameStats)) {
        self.inner.send_modify(|s| update(&mut s.frame_stats));
    }

    /// Count a server-reported error and keep its payload.
    pub(crate) fn record_server_error(&self, payload: serde_json::Value) {
        self.inner.send_modify(|s| {
            s.frame_stats.server_errors += 1;
            s.last_server_error = Some(payload);
        });
    }

    pub fn last_server_error(&self) -> Option<serde_json::Value> {
        self.inner.borrow().last_server_error.clone()
    }

    pub fn frame_stats(&self) -> FrameStats {
        self.inner.borrow().frame_stats
    }

    pub fn connection_status(&self) -> ConnectionStatus {
        self.inner.borrow().connection_status.clone()
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    fn message(id: &str) -> ChatMessage {
        ChatMessage {
            id: id.into(),
            channel_id: "c1".into(),
            author_id: "u1".into(),
            contents: format!("body of {id}"),
            reply_to: None,
            reactions: Vec::new(),
            pinned: false,
            created_at: 1,
            updated_at: 1,
        }
    }

    #[test]
    fn default_state() {
        let state = SharedState::new();
        assert!(state.token().is_none());
        assert!(!state.has_connection());
        assert_eq!(state.message_count(), 0);
        assert_eq!(state.connection_status(), ConnectionStatus::Idle);
        assert_eq!(state.frame_stats(), FrameStats::default());
        assert!(state.last_server_error().is_none());
    }

    #[test]
    fn token_visible_to_second_reader() {
        let writer = SharedState::new();
        let reader = writer.clone();
        let rx = writer.subscribe();

        writer.set_token("tok-1");
        assert_eq!(
            reader.token().map(|t| t.expose_secret().clone()).as_deref(),
            Some("tok-1")
        );
        assert!(rx.borrow().has_token());

        writer.clear_token();
        assert!(reader.token().is_none());
    }

    #[tokio::test]
    async fn subscribers_are_woken_on_mutation() {
        let state = SharedState::new();
        let mut rx = state.subscribe();

        let observer = tokio::spawn(async move {
            rx.changed().await.unwrap();
            rx.borrow_and_update().messages.len()
        });

        state.push_message(message("m1"));
        assert_eq!(observer.await.unwrap(), 1);
    }

    #[test]
    fn messages_keep_arrival_order_and_duplicates() {
        let state = SharedState::new();
        for id in ["m1", "m2", "m1"] {
            state.push_message(message(id));
        }
        let ids: Vec<_> = state.messages().into_iter().map(|m| m.id).collect();
        assert_eq!(ids, ["m1", "m2", "m1"]);
    }

    #[tokio::test]
    async fn replacing_connection_closes_previous() {
        let state = SharedState::new();
        let (first, mut first_rx) = ChatConnection::detached();
        let (second, _second_rx) = ChatConnection::detached();
        let second_id = second.id();

        state.set_connection(first);
        state.set_connection(second);

        assert!(first_rx.recv().await.is_some_and(|cmd| cmd.is_close()));
        assert_eq!(state.borrow().connection().map(ChatConnection::id), Some(second_id));
    }

    #[test]
    fn status_from_superseded_connection_is_ignored() {
        let state = SharedState::new();
        let (first, _first_rx) = ChatConnection::detached();
        let first_id = first.id();
        let (second, _second_rx) = ChatConnection::detached();
        let second_id = second.id();

        // Before any handle is installed, the connecting task may report.
        state.set_connection_status(first_id, ConnectionStatus::Connecting);
        assert_eq!(state.connection_status(), ConnectionStatus::Connecting);

        state.set_connection(first);
        state.set_connection(second);
        state.set_connection_status(first_id, ConnectionStatus::Closed);
        assert_eq!(state.connection_status(), ConnectionStatus::Connecting);

        state.set_connection_status(second_id, ConnectionStatus::Open);
        assert_eq!(state.connection_status(), ConnectionStatus::Open);
    }

    #[test]
    fn replacement_status_is_not_masked_by_previous() {
        let state = SharedState::new();
        let (first, _first_rx) = ChatConnection::detached();
        let first_id = first.id();
        state.set_connection(first);
        state.set_connection_status(first_id, ConnectionStatus::Failed("refused".into()));

        // The replacement opened while `first` still held the slot, so its
        // reports to the state were dropped.
        let (second, _second_rx) = ChatConnection::detached_with_status(ConnectionStatus::Open);
        state.set_connection_status(second.id(), ConnectionStatus::Open);
        assert_eq!(state.connection_status(), ConnectionStatus::Failed("refused".into()));

        state.set_connection(second);
        assert_eq!(state.connection_status(), ConnectionStatus::Open);
    }

    #[test]
    fn installing_connecting_handle_resets_status() {
        let state = SharedState::new();
        let (first, _first_rx) = ChatConnection::detached_with_status(ConnectionStatus::Open);
        state.set_connection(first);
        assert_eq!(state.connection_status(), ConnectionStatus::Open);

        let (second, _second_rx) = ChatConnection::detached();
        state.set_connection(second);
        assert_eq!(state.connection_status(), ConnectionStatus::Connecting);
    }

    #[test]
    fn take_connection_empties_slot() {
        let state = SharedState::new();
        let (conn, _rx) = ChatConnection::detached();
        state.set_connection(conn);
        assert!(state.has_connection());
        assert!(state.take_connection().is_some());
        assert!(!state.has_connection());
        assert!(state.take_connection().is_none());
    }
}
