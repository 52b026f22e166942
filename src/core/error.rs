use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::provider::Provider;

type BoxedSource = Box<dyn std::error::Error + Send + Sync>;

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("{provider} API key not set. Export {env_var} or add it to .env")]
    CredentialMissing {
        provider: Provider,
        env_var: &'static str,
    },

    #[error("Provider configuration error: {0}")]
    ProviderConfiguration(String),

    #[error("Network error: {message}")]
    Network {
        message: String,
        #[source]
        source: BoxedSource,
    },

    #[error("Request timed out after {timeout:?}")]
    Timeout { timeout: Duration },

    #[error("API error: {message}")]
    Api {
        message: String,
        status_code: Option<u16>,
    },

    #[error("Parse error: {message}")]
    Parse {
        message: String,
        #[source]
        source: BoxedSource,
    },

    #[error("Empty response: {0}")]
    EmptyResponse(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl LlmError {
    /// HTTP status code reported by the provider, if the failure came from one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            LlmError::Api { status_code, .. } => *status_code,
            _ => None,
        }
    }

    /// True when the failure happened before or outside the provider call.
    pub fn is_local(&self) -> bool {
        matches!(self, LlmError::InvalidInput(_) | LlmError::Io { .. })
    }
}
