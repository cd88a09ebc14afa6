//! JSON-over-HTTP client for the homelab API.
//!
//! Each feature area adds its operations to [`ApiClient`] in its own module.
//! Requests carry the shared-state token as the raw `Authorization` header
//! when one is set. Any non-2xx response comes back as [`Error::Status`] with
//! the server's body untouched; nothing is retried.

pub mod chat;
pub mod games;
pub mod reminders;
pub mod users;

use {
    crate::{Error, state::SharedState},
    reqwest::{
        Method, RequestBuilder,
        header::{AUTHORIZATION, HeaderValue},
    },
    serde::{Serialize, de::DeserializeOwned},
    serde_json::Value,
    tracing::debug,
    url::Url,
};

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    state: SharedState,
}

impl ApiClient {
    pub fn new(base_url: &str, state: SharedState) -> Result<Self, Error> {
        Self::with_client(reqwest::Client::new(), Url::parse(base_url)?, state)
    }

    pub fn with_client(
        http: reqwest::Client,
        base_url: Url,
        state: SharedState,
    ) -> Result<Self, Error> {
        if base_url.cannot_be_a_base() {
            return Err(Error::Url(url::ParseError::RelativeUrlWithCannotBeABaseBase));
        }
        Ok(Self {
            http,
            base_url,
            state,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn state(&self) -> &SharedState {
        &self.state
    }

    /// Append `segments` to the base URL. Segments are percent-encoded, so a
    /// slug or id can never escape its path position.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::Url(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Start a request to `segments`, authorized with the current token.
    pub(crate) fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder, Error> {
        let url = self.endpoint(segments)?;
        let builder = self.http.request(method, url);

        match self.state.with_token(HeaderValue::from_str) {
            Some(Ok(mut value)) => {
                value.set_sensitive(true);
                Ok(builder.header(AUTHORIZATION, value))
            },
            Some(Err(_)) => Err(Error::Auth("token is not a valid header value".into())),
            None => Ok(builder),
        }
    }

    /// Send a prepared request and decode its JSON response.
    pub(crate) async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, Error> {
        let response = builder.send().await?;
        let status = response.status();
        let url = response.url().path().to_owned();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let body = serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            });
            debug!(status = status.as_u16(), path = %url, "API request failed");
            return Err(Error::Status {
                status: status.as_u16(),
                body,
            });
        }

        if bytes.is_empty() {
            return Ok(serde_json::from_value(Value::Null)?);
        }
        Ok(serde_json::from_slice(&bytes)?)
    }

    // ── Verb helpers ─────────────────────────────────────────────────────────

    pub(crate) async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, Error> {
        self.send(self.request(Method::GET, segments)?).await
    }

    pub(crate) async fn post<B, T>(&self, segments: &[&str], body: &B) -> Result<T, Error>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(self.request(Method::POST, segments)?.json(body))
            .await
    }

    pub(crate) async fn put<B, T>(&self, segments: &[&str], body: &B) -> Result<T, Error>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(self.request(Method::PUT, segments)?.json(body))
            .await
    }

    pub(crate) async fn delete<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, Error> {
        self.send(self.request(Method::DELETE, segments)?).await
    }
}
