use async_trait::async_trait;

use super::{error::LlmError, types::Solution};
use crate::provider::Provider;

/// One vendor API behind a single blocking-style call.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    fn provider(&self) -> Provider;

    fn model(&self) -> &str;

    /// Send `prompt` as a single user message and wait for the full answer.
    async fn call_llm(&self, prompt: &str) -> Result<Solution, LlmError>;
}
