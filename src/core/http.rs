//! Shared HTTP client for all providers.

use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::error::LlmError;

/// Settings for the underlying `reqwest` client.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HttpClientConfig {
    /// Total time allowed for one request, body included. `None` leaves the
    /// request unbounded.
    pub timeout: Option<Duration>,
    pub user_agent: Option<String>,
}

impl HttpClientConfig {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn without_timeout(mut self) -> Self {
        self.timeout = None;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }
}

/// Thin wrapper around `reqwest::Client` that speaks JSON and maps failures
/// into [`LlmError`]. Issues exactly one request per call.
#[derive(Debug)]
pub struct HttpClient {
    client: reqwest::Client,
    config: HttpClientConfig,
}

impl HttpClient {
    pub fn new(config: HttpClientConfig) -> Result<Self, LlmError> {
        let default_ua = format!("cpsolve/{}", env!("CARGO_PKG_VERSION"));
        let ua = config.user_agent.as_deref().unwrap_or(&default_ua);

        let mut builder = reqwest::Client::builder().user_agent(ua);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder.build().map_err(|e| {
            LlmError::ProviderConfiguration(format!("Failed to build reqwest client: {e}"))
        })?;

        Ok(Self { client, config })
    }

    /// POST `body` as JSON and return the response body as a JSON value.
    ///
    /// Non-2xx statuses become [`LlmError::Api`] carrying the status code and
    /// the provider's `error.message` when one is present.
    #[tracing::instrument(
        name = "http_post_json",
        skip(self, headers, body),
        fields(url = %url),
        err
    )]
    pub async fn post_json<Req>(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: &Req,
    ) -> Result<Value, LlmError>
    where
        Req: Serialize + ?Sized,
    {
        let mut req_builder = self.client.post(url).json(body);
        for (name, value) in headers {
            req_builder = req_builder.header(name, value);
        }

        let res = req_builder
            .send()
            .await
            .map_err(|e| self.transport_error("Request failed", e))?;

        let status = res.status();
        let response_text = res
            .text()
            .await
            .map_err(|e| self.transport_error("Failed to read response body", e))?;

        if !status.is_success() {
            warn!(status = %status, "API returned error status");
            return Err(LlmError::Api {
                message: extract_error_message(&response_text),
                status_code: Some(status.as_u16()),
            });
        }

        debug!(status = %status, bytes = response_text.len(), "HTTP request successful");

        serde_json::from_str(&response_text).map_err(|e| LlmError::Parse {
            message: "Failed to parse response as JSON".to_string(),
            source: Box::new(e),
        })
    }

    fn transport_error(&self, message: &str, e: reqwest::Error) -> LlmError {
        if e.is_timeout()
            && let Some(timeout) = self.config.timeout
        {
            return LlmError::Timeout { timeout };
        }
        LlmError::Network {
            message: message.to_string(),
            source: Box::new(e),
        }
    }
}

/// Both OpenAI and Google wrap failures as `{"error": {"message": ...}}`.
fn extract_error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("message"))
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| {
            if body.trim().is_empty() {
                "no error body".to_string()
            } else {
                body.trim().to_string()
            }
        })
}
