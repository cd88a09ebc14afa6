//! CLI subcommands for realtime chat.

use {
    anyhow::{Result, bail},
    clap::Subcommand,
    homelab_client::{ClientState, ConnectionStatus, HomelabClient},
    homelab_protocol::{ChatMessage, SendMessagePacket},
    tokio::sync::watch,
    tracing::warn,
};

use crate::request_failed;

#[derive(Subcommand)]
pub enum ChatAction {
    /// Print chat messages as they arrive, until Ctrl-C or the server closes.
    Listen,
    /// Send one message to a channel.
    Send {
        #[arg(long)]
        channel: String,
        #[arg(short, long)]
        message: String,
        /// Id of the message this one replies to.
        #[arg(long)]
        reply_to: Option<String>,
    },
}

pub async fn handle_chat(client: &HomelabClient, action: ChatAction) -> Result<()> {
    match action {
        ChatAction::Listen => listen(client).await,
        ChatAction::Send {
            channel,
            message,
            reply_to,
        } => send(client, channel, message, reply_to).await,
    }
}

async fn listen(client: &HomelabClient) -> Result<()> {
    let mut updates = client.state().subscribe();
    client.open_chat().map_err(request_failed)?;
    eprintln!("Listening for messages (Ctrl-C to stop)...");

    let mut printed = 0;
    let mut server_errors = 0;
    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = updates.borrow_and_update();
                for message in state.messages.iter().skip(printed) {
                    print_message(message);
                }
                printed = state.messages.len();

                if state.frame_stats.server_errors > server_errors {
                    server_errors = state.frame_stats.server_errors;
                    if let Some(payload) = &state.last_server_error {
                        let msg = payload
                            .get("msg")
                            .and_then(|m| m.as_str())
                            .unwrap_or("unspecified error");
                        eprintln!("Server error: {msg}");
                    }
                    warn!(total = server_errors, "chat server reported an error");
                }

                match &state.connection_status {
                    ConnectionStatus::Closed => {
                        eprintln!("Connection closed by server.");
                        break;
                    },
                    ConnectionStatus::Failed(reason) => bail!("chat connection failed: {reason}"),
                    _ => {},
                }
            },
            _ = tokio::signal::ctrl_c() => {
                client.close_chat();
                break;
            },
        }
    }
    Ok(())
}

async fn send(
    client: &HomelabClient,
    channel_id: String,
    contents: String,
    reply_to: Option<String>,
) -> Result<()> {
    let mut updates = client.state().subscribe();
    client.open_chat().map_err(request_failed)?;

    let connection_open = wait_for(&mut updates, |s| {
        !matches!(
            s.connection_status,
            ConnectionStatus::Idle | ConnectionStatus::Connecting
        )
    })
    .await?;
    if let ConnectionStatus::Failed(reason) = connection_open {
        bail!("chat connection failed: {reason}");
    }

    {
        let state = client.state().borrow();
        let Some(connection) = state.connection() else {
            bail!("chat connection closed before the message was sent");
        };
        connection
            .send_message(SendMessagePacket {
                channel_id,
                contents,
                reply_to,
            })
            .map_err(request_failed)?;
    }

    // The close is queued behind the message, so the message is on the wire
    // once the connection reports closed.
    client.close_chat();
    let closed = wait_for(&mut updates, |s| {
        matches!(
            s.connection_status,
            ConnectionStatus::Closed | ConnectionStatus::Failed(_)
        )
    })
    .await?;
    if let ConnectionStatus::Failed(reason) = closed {
        bail!("chat connection failed: {reason}");
    }

    println!("Message sent.");
    Ok(())
}

/// Wait until `done` holds and return the connection status at that point.
async fn wait_for(
    updates: &mut watch::Receiver<ClientState>,
    done: impl Fn(&ClientState) -> bool,
) -> Result<ConnectionStatus> {
    let state = updates.wait_for(done).await?;
    Ok(state.connection_status.clone())
}

fn print_message(message: &ChatMessage) {
    match &message.reply_to {
        Some(parent) => println!(
            "[{}] {} (re {parent}): {}",
            message.channel_id, message.author_id, message.contents
        ),
        None => println!(
            "[{}] {}: {}",
            message.channel_id, message.author_id, message.contents
        ),
    }
}
