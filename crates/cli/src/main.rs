mod auth_commands;
mod channel_commands;
mod chat_commands;
mod games_commands;
mod reminder_commands;

use {
    clap::{Parser, Subcommand},
    homelab_client::{HomelabClient, toast::response_error_text},
    tracing::{debug, info},
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

#[derive(Parser)]
#[command(name = "homelab", about = "Homelab: chat, games and reminders from the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,

    /// Custom config directory (overrides default ~/.config/homelab/).
    #[arg(long, global = true, env = "HOMELAB_CONFIG_DIR")]
    config_dir: Option<std::path::PathBuf>,

    /// Session token (overrides HOMELAB_TOKEN and the config file).
    #[arg(long, global = true)]
    token: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and save the session token to the config file.
    Login {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
    /// Show the logged-in user.
    Me,
    /// Realtime chat.
    Chat {
        #[command(subcommand)]
        action: chat_commands::ChatAction,
    },
    /// Chat channel management.
    Channels {
        #[command(subcommand)]
        action: channel_commands::ChannelAction,
    },
    /// Connections puzzle games.
    Games {
        #[command(subcommand)]
        action: games_commands::GamesAction,
    },
    /// Reminders and reminder categories.
    Reminders {
        #[command(subcommand)]
        action: reminder_commands::ReminderAction,
    },
}

fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    let registry = tracing_subscriber::registry().with(filter);

    if cli.json_logs {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_ansi(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

/// Turn a client error into the message a user should see.
pub(crate) fn request_failed(err: homelab_client::Error) -> anyhow::Error {
    debug!(error = ?err, "request failed");
    anyhow::anyhow!(response_error_text(&err))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_telemetry(&cli);

    // Install the rustls ring crypto provider for wss:// connections.
    let _ = rustls::crypto::ring::default_provider().install_default();

    if let Some(ref dir) = cli.config_dir {
        homelab_config::set_config_dir(dir.clone());
    }
    let config = homelab_config::discover_and_load();
    info!(
        version = env!("CARGO_PKG_VERSION"),
        api = %config.server.api_base_url,
        "homelab starting"
    );

    let client = HomelabClient::from_config(&config)?;
    if let Some(token) = homelab_client::auth::resolve_token(cli.token.as_deref(), &config) {
        client.state().set_token(token);
    }

    match cli.command {
        Commands::Login { username, password } => {
            auth_commands::login(&client, &username, &password).await
        },
        Commands::Me => auth_commands::me(&client).await,
        Commands::Chat { action } => chat_commands::handle_chat(&client, action).await,
        Commands::Channels { action } => channel_commands::handle_channels(&client, action).await,
        Commands::Games { action } => games_commands::handle_games(&client, action).await,
        Commands::Reminders { action } => {
            reminder_commands::handle_reminders(&client, action).await
        },
    }
}
