//! Credential lookup.
//!
//! Adapters never read the environment themselves. The binary resolves keys
//! once, after loading `.env`, and passes them in through the config structs.

use crate::provider::Provider;

/// Where an API key comes from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ApiKey {
    /// The provider's conventional environment variable.
    #[default]
    Default,
    /// A specific environment variable.
    Env(String),
    /// A literal key.
    Custom(String),
}

impl ApiKey {
    /// Resolve against the process environment.
    pub fn resolve(&self, provider: Provider) -> Option<String> {
        self.resolve_with(provider, |name| std::env::var(name).ok())
    }

    /// Resolve using `lookup` in place of the process environment.
    pub fn resolve_with<F>(&self, provider: Provider, lookup: F) -> Option<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let key = match self {
            ApiKey::Default => lookup(provider.default_api_key_env_var()),
            ApiKey::Env(name) => lookup(name),
            ApiKey::Custom(key) => Some(key.clone()),
        };
        key.map(|k| k.trim().to_string()).filter(|k| !k.is_empty())
    }
}
