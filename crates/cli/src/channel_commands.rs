//! CLI subcommands for chat channels.

use {
    anyhow::Result,
    clap::{Args, Subcommand},
    homelab_client::HomelabClient,
    homelab_protocol::{ChannelType, ChatChannel, CreateChatChannel, ListChatChannelsParams},
};

use crate::request_failed;

#[derive(Subcommand)]
pub enum ChannelAction {
    /// List channels, optionally filtered.
    List(ListArgs),
    /// Create a channel.
    Create {
        /// URL-safe identifier, unique on the server.
        #[arg(long)]
        slug: String,
        /// Channel type: direct-message, group or server (or 0, 1, 2).
        #[arg(long = "type")]
        channel_type: ChannelType,
        /// Display name.
        #[arg(long)]
        name: Option<String>,
    },
    /// Subscribe to a channel.
    Subscribe { channel_id: String },
    /// Unsubscribe from a channel.
    Unsubscribe { channel_id: String },
}

#[derive(Args, Default)]
pub struct ListArgs {
    /// Only channels you own.
    #[arg(long, conflicts_with = "not_mine")]
    mine: bool,
    /// Only channels you do not own.
    #[arg(long)]
    not_mine: bool,
    /// Only channels you are subscribed to.
    #[arg(long, conflicts_with = "unsubscribed")]
    subscribed: bool,
    /// Only channels you are not subscribed to.
    #[arg(long)]
    unsubscribed: bool,
    /// Include channels you could not otherwise see.
    #[arg(long)]
    all: bool,
}

impl ListArgs {
    fn params(&self) -> ListChatChannelsParams {
        fn flag(yes: bool, no: bool) -> Option<bool> {
            match (yes, no) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            }
        }
        ListChatChannelsParams {
            my_channels: flag(self.mine, self.not_mine),
            all_channels: self.all.then_some(true),
            subscribed: flag(self.subscribed, self.unsubscribed),
        }
    }
}

pub async fn handle_channels(client: &HomelabClient, action: ChannelAction) -> Result<()> {
    let chat = client.chat();
    match action {
        ChannelAction::List(args) => {
            let channels = chat
                .list_channels(Some(&args.params()))
                .await
                .map_err(request_failed)?;
            if channels.is_empty() {
                println!("No channels found.");
            }
            for channel in &channels {
                print_channel(channel);
            }
        },
        ChannelAction::Create {
            slug,
            channel_type,
            name,
        } => {
            let channel = chat
                .create_channel(&CreateChatChannel {
                    name,
                    channel_type,
                    slug,
                })
                .await
                .map_err(request_failed)?;
            println!("Created channel '{}' ({})", channel.display_name(), channel.id);
        },
        ChannelAction::Subscribe { channel_id } => {
            let channel = chat.subscribe(&channel_id).await.map_err(request_failed)?;
            println!("Subscribed to '{}'", channel.display_name());
        },
        ChannelAction::Unsubscribe { channel_id } => {
            let channel = chat.unsubscribe(&channel_id).await.map_err(request_failed)?;
            println!("Unsubscribed from '{}'", channel.display_name());
        },
    }
    Ok(())
}

fn print_channel(channel: &ChatChannel) {
    println!(
        "  {:<24} {:<14} {:>3} subscribers  {}",
        channel.display_name(),
        channel.channel_type,
        channel.subscribers.len(),
        channel.id
    );
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_flags_send_nothing() {
        assert!(ListArgs::default().params().is_empty());
    }

    #[test]
    fn flags_map_to_params() {
        let params = ListArgs {
            not_mine: true,
            subscribed: true,
            all: true,
            ..Default::default()
        }
        .params();
        assert_eq!(params, ListChatChannelsParams {
            my_channels: Some(false),
            all_channels: Some(true),
            subscribed: Some(true),
        });
    }
}
