use {
    super::ApiClient,
    crate::Error,
    homelab_protocol::{ChatChannel, ChatChannelSubscribe, CreateChatChannel, ListChatChannelsParams},
    reqwest::{Method, RequestBuilder},
};

const CHANNELS: [&str; 2] = ["chat", "channels"];

impl ApiClient {
    /// `POST /chat/channels`
    pub async fn create_channel(&self, channel: &CreateChatChannel) -> Result<ChatChannel, Error> {
        self.post(&CHANNELS, channel).await
    }

    /// `GET /chat/channels`, filtered by whichever `params` fields are set.
    pub async fn list_channels(
        &self,
        params: Option<&ListChatChannelsParams>,
    ) -> Result<Vec<ChatChannel>, Error> {
        self.send(self.list_channels_request(params)?).await
    }

    pub(crate) fn list_channels_request(
        &self,
        params: Option<&ListChatChannelsParams>,
    ) -> Result<RequestBuilder, Error> {
        let builder = self.request(Method::GET, &CHANNELS)?;
        Ok(match params {
            Some(params) if !params.is_empty() => builder.query(params),
            _ => builder,
        })
    }

    /// `PUT /chat/channels/subscribe`
    pub async fn subscribe(&self, channel_id: &str) -> Result<ChatChannel, Error> {
        self.put(&["chat", "channels", "subscribe"], &ChatChannelSubscribe {
            channel_id: channel_id.to_owned(),
        })
        .await
    }

    /// `PUT /chat/channels/unsubscribe`
    pub async fn unsubscribe(&self, channel_id: &str) -> Result<ChatChannel, Error> {
        self.put(&["chat", "channels", "unsubscribe"], &ChatChannelSubscribe {
            channel_id: channel_id.to_owned(),
        })
        .await
    }
}
