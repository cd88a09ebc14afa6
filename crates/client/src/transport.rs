use {
    crate::{Error, api::ApiClient, connection::ChatConnection, state::SharedState},
    homelab_protocol::{
        AUTH_TOKEN_PARAM, CHAT_WS_PATH, ChatChannel, CreateChatChannel, ListChatChannelsParams,
    },
    url::Url,
};

/// Realtime chat plus the channel operations around it.
#[derive(Debug, Clone)]
pub struct ChatTransport {
    state: SharedState,
    api: ApiClient,
    websocket_base_url: Url,
}

impl ChatTransport {
    pub fn new(api: ApiClient, websocket_base_url: &str) -> Result<Self, Error> {
        let websocket_base_url = Url::parse(websocket_base_url)?;
        if websocket_base_url.cannot_be_a_base() {
            return Err(Error::Url(url::ParseError::RelativeUrlWithCannotBeABaseBase));
        }
        Ok(Self {
            state: api.state().clone(),
            api,
            websocket_base_url,
        })
    }

    /// `{websocket_base_url}/chat/ws?auth_token={token}`, token percent-encoded.
    pub fn ws_url(&self, token: &str) -> Result<Url, Error> {
        let mut url = self.websocket_base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::Url(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend(CHAT_WS_PATH.split('/').filter(|s| !s.is_empty()));
        url.query_pairs_mut().append_pair(AUTH_TOKEN_PARAM, token);
        Ok(url)
    }

    /// Open a realtime connection authenticated with `token`.
    ///
    /// Returns as soon as the connection task is spawned; the handshake
    /// outcome shows up in [`ConnectionStatus`](crate::ConnectionStatus).
    /// Inbound frames are applied to the shared state. The handle is not
    /// installed in the state slot; see [`SharedState::set_connection`].
    pub fn connect(&self, token: &str) -> Result<ChatConnection, Error> {
        Ok(ChatConnection::spawn(self.ws_url(token)?, self.state.clone()))
    }

    pub fn state(&self) -> &SharedState {
        &self.state
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    // ── Channels ─────────────────────────────────────────────────────────────

    pub async fn create_channel(&self, channel: &CreateChatChannel) -> Result<ChatChannel, Error> {
        self.api.create_channel(channel).await
    }

    pub async fn list_channels(
        &self,
        params: Option<&ListChatChannelsParams>,
    ) -> Result<Vec<ChatChannel>, Error> {
        self.api.list_channels(params).await
    }

    pub async fn subscribe(&self, channel_id: &str) -> Result<ChatChannel, Error> {
        self.api.subscribe(channel_id).await
    }

    pub async fn unsubscribe(&self, channel_id: &str) -> Result<ChatChannel, Error> {
        self.api.unsubscribe(channel_id).await
    }
}
