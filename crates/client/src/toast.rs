//! Transient notifications.
//!
//! Toasts are pushed onto a `watch`-published queue and removed by id once
//! their timeout elapses. Each toast owns one sleeping task; the task only
//! holds a weak reference, so dropping the last store handle ends them all
//! quietly.

use std::{
    sync::{Arc, Weak},
    time::Duration,
};

use {
    homelab_config::ToastConfig,
    serde::{Deserialize, Serialize},
    serde_json::Value,
    tokio::sync::watch,
    tracing::debug,
    uuid::Uuid,
};

use crate::Error;

/// Shown for any response with a 5xx status.
pub const INTERNAL_SERVER_ERROR: &str = "Internal Server Error";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastStatus {
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toast {
    pub id: Uuid,
    pub text: String,
    pub status: ToastStatus,
}

/// Text of a toast plus an optional timeout overriding the store default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToastPayload {
    pub text: String,
    pub timeout: Option<Duration>,
}

impl ToastPayload {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            timeout: None,
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

impl From<&str> for ToastPayload {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for ToastPayload {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

#[derive(Clone)]
pub struct ToastStore {
    inner: Arc<watch::Sender<Vec<Toast>>>,
    default_timeout: Duration,
}

impl std::fmt::Debug for ToastStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToastStore")
            .field("toasts", &*self.inner.borrow())
            .field("default_timeout", &self.default_timeout)
            .finish()
    }
}

impl ToastStore {
    pub fn new(default_timeout: Duration) -> Self {
        let (tx, _rx) = watch::channel(Vec::new());
        Self {
            inner: Arc::new(tx),
            default_timeout,
        }
    }

    pub fn from_config(config: &ToastConfig) -> Self {
        Self::new(config.default_timeout())
    }

    pub fn default_timeout(&self) -> Duration {
        self.default_timeout
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<Toast>> {
        self.inner.subscribe()
    }

    /// Toasts currently shown, oldest first.
    pub fn toasts(&self) -> Vec<Toast> {
        self.inner.borrow().clone()
    }

    /// Show a toast and schedule its removal. Must be called from within a
    /// Tokio runtime.
    pub fn push(&self, status: ToastStatus, payload: impl Into<ToastPayload>) -> Uuid {
        let ToastPayload { text, timeout } = payload.into();
        let id = Uuid::new_v4();
        let timeout = timeout.unwrap_or(self.default_timeout);

        self.inner.send_modify(|toasts| toasts.push(Toast { id, text, status }));
        tokio::spawn(expire(Arc::downgrade(&self.inner), id, timeout));
        id
    }

    pub fn success(&self, payload: impl Into<ToastPayload>) -> Uuid {
        self.push(ToastStatus::Success, payload)
    }

    pub fn warning(&self, payload: impl Into<ToastPayload>) -> Uuid {
        self.push(ToastStatus::Warning, payload)
    }

    pub fn error(&self, payload: impl Into<ToastPayload>) -> Uuid {
        self.push(ToastStatus::Error, payload)
    }

    /// Show an error toast describing a failed request.
    pub fn response_error(&self, err: &Error) -> Uuid {
        self.error(response_error_text(err))
    }

    /// Remove a toast before its timeout. Returns whether it was still shown.
    pub fn dismiss(&self, id: Uuid) -> bool {
        remove(&self.inner, id)
    }
}

async fn expire(store: Weak<watch::Sender<Vec<Toast>>>, id: Uuid, timeout: Duration) {
    tokio::time::sleep(timeout).await;
    let Some(store) = store.upgrade() else {
        return;
    };
    if remove(&store, id) {
        debug!(toast = %id, "toast expired");
    }
}

fn remove(store: &watch::Sender<Vec<Toast>>, id: Uuid) -> bool {
    store.send_if_modified(|toasts| {
        let before = toasts.len();
        toasts.retain(|t| t.id != id);
        toasts.len() != before
    })
}

/// User-facing text for a failed request.
///
/// Below 500 the server's own message is shown verbatim: the `msg` field of
/// a JSON object body, or the body itself when it is a bare string. 500 and
/// above always reads [`INTERNAL_SERVER_ERROR`].
pub fn response_error_text(err: &Error) -> String {
    match err {
        Error::Status { status, .. } if *status >= 500 => INTERNAL_SERVER_ERROR.to_owned(),
        Error::Status { status, body } => match body {
            Value::String(text) => text.clone(),
            Value::Object(map) => match map.get("msg") {
                Some(Value::String(msg)) => msg.clone(),
                Some(other) => other.to_string(),
                None => format!("Request failed with status {status}"),
            },
            _ => format!("Request failed with status {status}"),
        },
        Error::Http(e) if e.status().is_some_and(|s| s.is_server_error()) => {
            INTERNAL_SERVER_ERROR.to_owned()
        },
        other => other.to_string(),
    }
}
