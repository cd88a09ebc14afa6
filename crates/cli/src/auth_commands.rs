use {
    anyhow::Result,
    homelab_client::HomelabClient,
    secrecy::{ExposeSecret, Secret},
};

use crate::request_failed;

pub async fn login(client: &HomelabClient, username: &str, password: &str) -> Result<()> {
    client
        .login(username, password)
        .await
        .map_err(request_failed)?;

    let token = client
        .state()
        .token()
        .ok_or_else(|| anyhow::anyhow!("server returned no token"))?;
    let path = homelab_config::update_config(|config| {
        config.auth.token = Some(Secret::new(token.expose_secret().clone()));
    })?;

    println!("Logged in as {username}. Token saved to {}", path.display());
    Ok(())
}

pub async fn me(client: &HomelabClient) -> Result<()> {
    let user = client.api().get_me().await.map_err(request_failed)?;
    println!("{} (id {})", user.username, user.id);
    Ok(())
}
