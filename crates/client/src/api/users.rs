use {
    super::ApiClient,
    crate::Error,
    homelab_protocol::{ReturnUser, UserCredentials},
};

impl ApiClient {
    /// `POST /users/auth`. Returns the session token; storing it is up to the
    /// caller (see [`HomelabClient::login`](crate::HomelabClient::login)).
    pub async fn auth_user(&self, credentials: &UserCredentials) -> Result<String, Error> {
        self.post(&["users", "auth"], credentials).await
    }

    /// `GET /users/me`
    pub async fn get_me(&self) -> Result<ReturnUser, Error> {
        self.get(&["users", "me"]).await
    }
}
