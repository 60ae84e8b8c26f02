//! ViaCEP HTTP client.

use crate::domain::providers::{AddressProvider, UpstreamError, UpstreamPayload};
use async_trait::async_trait;
use reqwest::{Client, header};
use serde_json::Value;
use std::error::Error as _;
use std::time::Duration;
use tracing::debug;

/// Client for the public ViaCEP API (`GET {base_url}/ws/{cep}/json/`).
///
/// The request timeout covers the whole exchange, body included. A timed-out
/// request is abandoned and reported as [`UpstreamError::Timeout`].
#[derive(Clone)]
pub struct ViaCepClient {
    http: Client,
    base_url: String,
    timeout: Duration,
}

impl ViaCepClient {
    /// Production ViaCEP endpoint.
    pub const DEFAULT_BASE_URL: &'static str = "https://viacep.com.br";

    /// Default request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

    /// Creates a client for `base_url` with the given request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError::Transport`] if the TLS backend cannot be initialized.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, UpstreamError> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| UpstreamError::Transport(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
        })
    }

    /// Full lookup URL for a postal code.
    pub fn endpoint(&self, cep: &str) -> String {
        format!("{}/ws/{}/json/", self.base_url, cep)
    }

    fn classify(&self, e: reqwest::Error) -> UpstreamError {
        if e.is_timeout() {
            UpstreamError::Timeout(self.timeout)
        } else if e.is_decode() {
            UpstreamError::Malformed(error_chain(&e))
        } else {
            UpstreamError::Transport(error_chain(&e))
        }
    }
}

#[async_trait]
impl AddressProvider for ViaCepClient {
    async fn fetch(&self, cep: &str) -> Result<UpstreamPayload, UpstreamError> {
        let url = self.endpoint(cep);

        let response = self
            .http
            .get(&url)
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            debug!(cep, %status, "ViaCEP returned a failure status");
            return Err(UpstreamError::NotFound);
        }

        let body: Value = response.json().await.map_err(|e| self.classify(e))?;

        let payload = match body {
            Value::Object(payload) => payload,
            other => {
                return Err(UpstreamError::Malformed(format!(
                    "expected a JSON object, got {other}"
                )));
            }
        };

        if payload.get("erro").is_some_and(is_truthy) {
            debug!(cep, "ViaCEP flagged the postal code with `erro`");
            return Err(UpstreamError::NotFound);
        }

        Ok(payload)
    }
}

/// Loose truthiness used for ViaCEP's `erro` flag, which has been sent both as
/// `true` and as `"true"`.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty() && s != "0",
        Value::Array(items) => !items.is_empty(),
        Value::Object(members) => !members.is_empty(),
    }
}

/// Renders an error followed by its source chain.
fn error_chain(e: &reqwest::Error) -> String {
    let mut message = e.to_string();
    let mut source = e.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
