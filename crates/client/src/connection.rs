use {
    crate::{
        Error, events,
        state::{ConnectionStatus, SharedState},
    },
    futures::{SinkExt, StreamExt},
    homelab_protocol::{OutboundRequest, SendMessagePacket},
    tokio::sync::{mpsc, watch},
    tokio_tungstenite::{connect_async, tungstenite::Message},
    tracing::{debug, error, info, warn},
    url::Url,
    uuid::Uuid,
};

/// Commands from a [`ChatConnection`] handle to its socket task.
#[derive(Debug)]
pub(crate) enum Outgoing {
    Text(String),
    Close,
}

#[cfg(test)]
impl Outgoing {
    pub(crate) fn is_close(&self) -> bool {
        matches!(self, Self::Close)
    }
}

/// Handle on one realtime chat connection.
///
/// The socket itself lives in a background task that applies inbound frames
/// to the [`SharedState`] in delivery order. Dropping the handle (or calling
/// [`close`](Self::close)) sends a close frame and ends the task, so a handle
/// replaced in the state slot never leaves its socket behind.
#[derive(Debug)]
pub struct ChatConnection {
    id: Uuid,
    write_tx: mpsc::UnboundedSender<Outgoing>,
    status: watch::Receiver<ConnectionStatus>,
}

impl ChatConnection {
    /// Spawn the socket task for `url` and return its handle immediately.
    /// The upgrade completes (or fails) in the background; watch
    /// [`ConnectionStatus`] for the outcome.
    ///
    /// Must be called from within a Tokio runtime.
    pub(crate) fn spawn(url: Url, state: SharedState) -> Self {
        let id = Uuid::new_v4();
        let (write_tx, write_rx) = mpsc::unbounded_channel();
        let (status_tx, status) = watch::channel(ConnectionStatus::Connecting);

        let reporter = StatusReporter {
            id,
            state,
            tx: status_tx,
        };
        tokio::spawn(connection_task(url, reporter, write_rx));

        Self {
            id,
            write_tx,
            status,
        }
    }

    /// A handle with no socket behind it; the receiver sees what it would send.
    #[cfg(test)]
    pub(crate) fn detached() -> (Self, mpsc::UnboundedReceiver<Outgoing>) {
        Self::detached_with_status(ConnectionStatus::Connecting)
    }

    #[cfg(test)]
    pub(crate) fn detached_with_status(
        status: ConnectionStatus,
    ) -> (Self, mpsc::UnboundedReceiver<Outgoing>) {
        let (write_tx, write_rx) = mpsc::unbounded_channel();
        let (_status_tx, status) = watch::channel(status);
        (
            Self {
                id: Uuid::new_v4(),
                write_tx,
                status,
            },
            write_rx,
        )
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Latest status reported by this connection's task, whether or not the
    /// handle is in the state slot.
    pub fn status(&self) -> ConnectionStatus {
        self.status.borrow().clone()
    }

    /// Whether the socket task has exited.
    pub fn is_closed(&self) -> bool {
        self.write_tx.is_closed()
    }

    /// Queue a request. Requests sent before the upgrade completes are flushed
    /// once it does.
    pub fn send(&self, request: &OutboundRequest) -> Result<(), Error> {
        let json = serde_json::to_string(request)?;
        self.write_tx
            .send(Outgoing::Text(json))
            .map_err(|_| Error::NotConnected)
    }

    /// Post a chat message to a channel.
    pub fn send_message(&self, packet: SendMessagePacket) -> Result<(), Error> {
        self.send(&OutboundRequest::CreateMessage(packet))
    }

    /// Ask the socket task to send a close frame and exit.
    pub fn close(&self) {
        // Ignore send error: the task has already exited.
        let _ = self.write_tx.send(Outgoing::Close);
    }
}

/// Strip the query (it carries the credential) before a URL is logged.
fn redacted(url: &Url) -> String {
    let mut shown = url.clone();
    shown.set_query(None);
    shown.to_string()
}

/// Publishes a connection's status on its own handle, then to the shared
/// state. The handle is updated first so that installing it in the slot
/// always picks up the latest report.
struct StatusReporter {
    id: Uuid,
    state: SharedState,
    tx: watch::Sender<ConnectionStatus>,
}

impl StatusReporter {
    fn report(&self, status: ConnectionStatus) {
        self.tx.send_replace(status.clone());
        self.state.set_connection_status(self.id, status);
    }
}

async fn connection_task(
    url: Url,
    reporter: StatusReporter,
    mut write_rx: mpsc::UnboundedReceiver<Outgoing>,
) {
    let id = reporter.id;
    info!(conn = %id, url = %redacted(&url), "connecting to chat");
    reporter.report(ConnectionStatus::Connecting);

    match run(&url, &reporter, &mut write_rx).await {
        Ok(()) => {
            debug!(conn = %id, "chat connection closed");
            reporter.report(ConnectionStatus::Closed);
        },
        Err(e) => {
            error!(conn = %id, error = %e, "chat connection error");
            reporter.report(ConnectionStatus::Failed(e.to_string()));
        },
    }
}

/// Connect, then pump frames both ways until either side closes.
async fn run(
    url: &Url,
    reporter: &StatusReporter,
    write_rx: &mut mpsc::UnboundedReceiver<Outgoing>,
) -> Result<(), Error> {
    let (id, state) = (reporter.id, &reporter.state);
    let mut queued = Vec::new();
    let connect = connect_async(url.as_str());
    tokio::pin!(connect);

    // Keep buffering writes while the upgrade is in flight; a close or a
    // dropped handle aborts the attempt.
    let ws_stream = loop {
        tokio::select! {
            result = &mut connect => break result?.0,
            cmd = write_rx.recv() => match cmd {
                Some(Outgoing::Text(text)) => queued.push(text),
                Some(Outgoing::Close) | None => {
                    debug!(conn = %id, "chat connection closed before open");
                    return Ok(());
                },
            },
        }
    };

    info!(conn = %id, "chat connected");
    reporter.report(ConnectionStatus::Open);
    let (mut ws_sink, mut ws_reader) = ws_stream.split();

    for text in queued {
        ws_sink.send(Message::Text(text.into())).await?;
    }

    loop {
        tokio::select! {
            msg = ws_reader.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        // Decode failures are counted and logged by the handler;
                        // they never end the connection.
                        let _ = events::handle_frame(state, text.as_str());
                    },
                    Some(Ok(Message::Close(frame))) => {
                        debug!(conn = %id, reason = ?frame, "chat socket closed by server");
                        return Ok(());
                    },
                    None => {
                        return Err(Error::Connection("stream ended without a close frame".into()));
                    },
                    Some(Ok(Message::Ping(data))) => {
                        ws_sink.send(Message::Pong(data)).await?;
                    },
                    Some(Ok(Message::Binary(data))) => {
                        warn!(conn = %id, len = data.len(), "ignoring binary chat frame");
                    },
                    Some(Ok(_)) => {}, // Pong / raw frames
                    Some(Err(e)) => {
                        return Err(Error::WebSocket(e));
                    },
                }
            },
            cmd = write_rx.recv() => {
                match cmd {
                    Some(Outgoing::Text(text)) => {
                        ws_sink.send(Message::Text(text.into())).await?;
                    },
                    Some(Outgoing::Close) | None => {
                        let _ = ws_sink.send(Message::Close(None)).await;
                        return Ok(());
                    },
                }
            },
        }
    }
}
