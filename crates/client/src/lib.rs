//! Client side of the homelab platform: realtime chat, the REST API,
//! process-wide reactive state and toast notifications.
//!
//! [`HomelabClient`] wires the pieces together from a [`HomelabConfig`]:
//!
//! ```no_run
//! # async fn demo() -> Result<(), homelab_client::Error> {
//! let config = homelab_config::discover_and_load();
//! let client = homelab_client::HomelabClient::from_config(&config)?;
//! client.login("ada", "hunter2").await?;
//! client.open_chat()?;
//! let mut updates = client.state().subscribe();
//! while updates.changed().await.is_ok() {
//!     println!("{} messages", updates.borrow_and_update().messages.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod auth;
mod connection;
pub mod error;
pub mod events;
pub mod state;
pub mod toast;
pub mod transport;

pub use {
    api::ApiClient,
    connection::ChatConnection,
    error::{Error, Result},
    events::FrameOutcome,
    state::{ClientState, ConnectionStatus, FrameStats, SharedState},
    toast::{Toast, ToastPayload, ToastStatus, ToastStore},
    transport::ChatTransport,
};

use {
    homelab_config::HomelabConfig,
    homelab_protocol::UserCredentials,
    secrecy::ExposeSecret,
    tracing::info,
};

/// Everything a front end needs, sharing one [`SharedState`].
#[derive(Debug, Clone)]
pub struct HomelabClient {
    state: SharedState,
    api: ApiClient,
    chat: ChatTransport,
    toasts: ToastStore,
}

impl HomelabClient {
    /// Build a client from config. A token in the config is copied into the
    /// shared state; nothing is contacted yet.
    pub fn from_config(config: &HomelabConfig) -> Result<Self> {
        let state = SharedState::new();
        if let Some(token) = auth::resolve_token(None, config) {
            state.set_token(token);
        }

        let api = ApiClient::new(&config.server.api_base_url, state.clone())?;
        let chat = ChatTransport::new(api.clone(), &config.server.websocket_base_url)?;

        Ok(Self {
            state,
            api,
            chat,
            toasts: ToastStore::from_config(&config.toasts),
        })
    }

    pub fn state(&self) -> &SharedState {
        &self.state
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn chat(&self) -> &ChatTransport {
        &self.chat
    }

    pub fn toasts(&self) -> &ToastStore {
        &self.toasts
    }

    /// Exchange credentials for a token and store it in the shared state.
    pub async fn login(&self, username: &str, password: &str) -> Result<()> {
        let token = self
            .api
            .auth_user(&UserCredentials {
                username: username.to_owned(),
                password: password.to_owned(),
            })
            .await?;
        self.state.set_token(token);
        info!(username, "logged in");
        Ok(())
    }

    /// Open the realtime chat with the stored token and install it in the
    /// connection slot, closing any previous connection. Must be called from
    /// within a Tokio runtime.
    pub fn open_chat(&self) -> Result<()> {
        let token = self
            .state
            .token()
            .ok_or_else(|| Error::Auth("no token; log in first".into()))?;
        let connection = self.chat.connect(token.expose_secret())?;
        self.state.set_connection(connection);
        Ok(())
    }

    /// Close the chat connection, if one is open.
    pub fn close_chat(&self) {
        self.state.close_connection();
    }
}
