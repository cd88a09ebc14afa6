//! Config schema types (server endpoints, stored credential, toast timing).
use std::time::Duration;

use {
    secrecy::{ExposeSecret, Secret},
    serde::{Deserialize, Serialize},
};

/// Default lifetime of a toast notification.
pub const DEFAULT_TOAST_TIMEOUT_MS: u64 = 5_000;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HomelabConfig {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub toasts: ToastConfig,
}

/// Where the homelab backend lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Origin + prefix of the REST API, e.g. `http://localhost:8000/api`.
    pub api_base_url: String,
    /// Origin + prefix of the realtime endpoint, e.g. `ws://localhost:8000/api`.
    pub websocket_base_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000/api".into(),
            websocket_base_url: "ws://localhost:8000/api".into(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Session token from a previous login.
    #[serde(
        default,
        serialize_with = "serialize_option_secret",
        skip_serializing_if = "Option::is_none"
    )]
    pub token: Option<Secret<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToastConfig {
    pub default_timeout_ms: u64,
}

impl Default for ToastConfig {
    fn default() -> Self {
        Self {
            default_timeout_ms: DEFAULT_TOAST_TIMEOUT_MS,
        }
    }
}

impl ToastConfig {
    pub fn default_timeout(&self) -> Duration {
        Duration::from_millis(self.default_timeout_ms)
    }
}

fn serialize_option_secret<S: serde::Serializer>(
    secret: &Option<Secret<String>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match secret {
        Some(s) => serializer.serialize_some(s.expose_secret()),
        None => serializer.serialize_none(),
    }
}
