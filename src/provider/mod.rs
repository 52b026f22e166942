pub(crate) mod constants;
pub mod gemini;
pub mod openai;

pub use gemini::{GeminiClient, GeminiConfig};
pub use openai::{OpenAiClient, OpenAiConfig};

use std::str::FromStr;

use serde::Serialize;
use tracing::error;

use crate::core::{HttpClient, HttpClientConfig, LlmError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    OpenAI,
    Gemini,
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Provider::OpenAI => write!(f, "OpenAI"),
            Provider::Gemini => write!(f, "Gemini"),
        }
    }
}

impl Provider {
    /// Get the default environment variable name for this provider's API key
    pub fn default_api_key_env_var(&self) -> &'static str {
        match self {
            Provider::OpenAI => constants::openai::API_KEY_ENV_VAR,
            Provider::Gemini => constants::gemini::API_KEY_ENV_VAR,
        }
    }

    /// Short tag used in default output file names.
    pub fn file_tag(&self) -> &'static str {
        match self {
            Provider::OpenAI => "gpt",
            Provider::Gemini => "gemini",
        }
    }
}

impl FromStr for Provider {
    type Err = LlmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "openai" | "gpt" | "chatgpt" => Ok(Provider::OpenAI),
            "gemini" | "google" => Ok(Provider::Gemini),
            other => Err(LlmError::InvalidInput(format!(
                "unsupported provider '{other}' (expected openai or gemini)"
            ))),
        }
    }
}

/// Connection state shared by the adapters.
///
/// A client that could not be set up stays usable as a value but refuses
/// every call without touching the network.
#[derive(Debug)]
pub(crate) enum ClientState {
    Ready { http: HttpClient, api_key: String },
    Degraded(Degraded),
}

#[derive(Debug, Clone)]
pub(crate) enum Degraded {
    MissingCredential,
    ClientBuild(String),
}

impl ClientState {
    pub(crate) fn connect(
        provider: Provider,
        api_key: Option<String>,
        http_config: &HttpClientConfig,
    ) -> Self {
        let Some(api_key) = api_key.filter(|key| !key.trim().is_empty()) else {
            error!(
                provider = %provider,
                env_var = provider.default_api_key_env_var(),
                "API key missing, client will reject all calls"
            );
            return ClientState::Degraded(Degraded::MissingCredential);
        };

        match HttpClient::new(http_config.clone()) {
            Ok(http) => ClientState::Ready { http, api_key },
            Err(e) => {
                error!(provider = %provider, error = %e, "Failed to initialize client");
                ClientState::Degraded(Degraded::ClientBuild(e.to_string()))
            }
        }
    }

    pub(crate) fn is_ready(&self) -> bool {
        matches!(self, ClientState::Ready { .. })
    }

    /// Borrow the live HTTP client and key, or explain why there is none.
    pub(crate) fn ready(&self, provider: Provider) -> Result<(&HttpClient, &str), LlmError> {
        match self {
            ClientState::Ready { http, api_key } => Ok((http, api_key)),
            ClientState::Degraded(Degraded::MissingCredential) => {
                Err(LlmError::CredentialMissing {
                    provider,
                    env_var: provider.default_api_key_env_var(),
                })
            }
            ClientState::Degraded(Degraded::ClientBuild(reason)) => Err(
                LlmError::ProviderConfiguration(format!("{provider} client unavailable: {reason}")),
            ),
        }
    }
}
