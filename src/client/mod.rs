//! JSON-over-HTTP plumbing shared by the HTTP store and identity provider.
//!
//! The dev server wraps every response as `{ "success": bool, "data": ... }`
//! or `{ "success": false, "error": "...", "code": "..." }`.

use reqwest::{Method, StatusCode};
use serde_json::Value;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, trace};
use url::Url;

use crate::config::ClientConfig;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Invalid server URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Server URL cannot carry a path: {0}")]
    NotABase(String),

    #[error("HTTP client setup failed: {0}")]
    Build(#[from] reqwest::Error),
}

/// A request that did not produce a success envelope
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct ApiFailure {
    /// `None` when the request never got an HTTP response
    pub status: Option<u16>,
    pub message: String,
    pub code: Option<String>,
}

impl ApiFailure {
    fn transport(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
            code: None,
        }
    }
}

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
    token: Arc<RwLock<Option<String>>>,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let base = Url::parse(base_url)?;
        if base.cannot_be_a_base() {
            return Err(ClientError::NotABase(base_url.to_string()));
        }
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base,
            token: Arc::new(RwLock::new(None)),
        })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        Self::new(&config.server_url, config.request_timeout())
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Bearer token sent with every request, shared by all clones
    pub fn set_token(&self, token: Option<String>) {
        if let Ok(mut slot) = self.token.write() {
            *slot = token;
        }
    }

    pub fn token(&self) -> Option<String> {
        self.token.read().ok().and_then(|slot| slot.clone())
    }

    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Send a request and unwrap the `data` member of the success envelope
    pub async fn send(&self, method: Method, segments: &[&str], body: Option<&Value>) -> Result<Value, ApiFailure> {
        let url = self.url(segments);
        debug!("{} {}", method, url);

        let mut request = self.http.request(method, url);
        if let Some(token) = self.token() {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ApiFailure::transport(e.to_string()))?;
        let status = response.status();
        let envelope = response.json::<Value>().await.unwrap_or(Value::Null);
        trace!("Response {}: {}", status, envelope);

        if status.is_success() && envelope.get("success").and_then(Value::as_bool) == Some(true) {
            return Ok(envelope.get("data").cloned().unwrap_or(Value::Null));
        }

        Err(Self::failure(status, &envelope))
    }

    fn failure(status: StatusCode, envelope: &Value) -> ApiFailure {
        let message = envelope
            .get("error")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("Unexpected response")
                    .to_string()
            });
        ApiFailure {
            status: Some(status.as_u16()),
            message,
            code: envelope.get("code").and_then(Value::as_str).map(str::to_string),
        }
    }
}
