//! Transport layer.
//!
//! The client never talks to the network directly; it goes through
//! [`ApiTransport`]. The shipped adapter is HTTP (reqwest); tests use
//! an in-memory mock. The transport is chosen at construction time and
//! makes no trust decisions of its own: the bearer token it carries is
//! always the server-issued one.

use std::sync::RwLock;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::error::{ClientError, ClientResult};

/// HTTP verb subset the API uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

/// A pluggable way of reaching the API.
#[async_trait]
pub trait ApiTransport: Send + Sync {
    /// Performs one call and returns the decoded success envelope.
    /// Failure envelopes come back as [`ClientError::Api`].
    async fn call(&self, method: Method, path: &str, body: Option<Value>) -> ClientResult<Value>;

    /// Installs (or clears) the session token used for later calls.
    fn set_token(&self, token: Option<String>);
}

/// HTTP transport over reqwest.
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    token: RwLock<Option<String>>,
}

impl HttpTransport {
    /// Creates a transport for a server base URL (no trailing slash).
    pub fn new(base_url: impl Into<String>) -> Self {
        HttpTransport {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            token: RwLock::new(None),
        }
    }
}

#[async_trait]
impl ApiTransport for HttpTransport {
    async fn call(&self, method: Method, path: &str, body: Option<Value>) -> ClientResult<Value> {
        let url = format!("{}{}", self.base_url, path);
        debug!(?method, %url, "API call");

        let mut request = match method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
            Method::Put => self.client.put(&url),
            Method::Delete => self.client.delete(&url),
        };

        if let Some(token) = self.token.read().expect("token lock poisoned").as_deref() {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let envelope: Value = response
            .json()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()))?;

        if envelope["success"] == Value::Bool(true) {
            Ok(envelope)
        } else {
            let message = envelope["message"]
                .as_str()
                .unwrap_or("sin mensaje")
                .to_string();
            Err(ClientError::Api { status, message })
        }
    }

    fn set_token(&self, token: Option<String>) {
        *self.token.write().expect("token lock poisoned") = token;
    }
}
