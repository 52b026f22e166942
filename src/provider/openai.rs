//! OpenAI chat-completions adapter.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{ClientState, Provider, constants::openai};
use crate::core::{
    HttpClientConfig, LanguageModelUsage, LlmError, LlmProvider, ReasoningEffort,
    ResponseMetadata, Solution,
};

#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub reasoning_effort: Option<ReasoningEffort>,
    /// No timeout by default; the request waits as long as the server does.
    pub http_config: HttpClientConfig,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: openai::API_BASE.to_string(),
            model: openai::DEFAULT_MODEL.to_string(),
            reasoning_effort: Some(ReasoningEffort::High),
            http_config: HttpClientConfig::default(),
        }
    }
}

impl OpenAiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Self::default()
        }
    }

    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_reasoning_effort(mut self, effort: Option<ReasoningEffort>) -> Self {
        self.reasoning_effort = effort;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.http_config = self.http_config.with_timeout(timeout);
        self
    }

    pub fn with_http_config(mut self, config: HttpClientConfig) -> Self {
        self.http_config = config;
        self
    }
}

pub struct OpenAiClient {
    config: OpenAiConfig,
    state: ClientState,
}

impl OpenAiClient {
    /// Build the client. A missing key leaves it degraded instead of failing.
    pub fn new(config: OpenAiConfig) -> Self {
        let state = ClientState::connect(
            Provider::OpenAI,
            config.api_key.clone(),
            &config.http_config,
        );
        Self { config, state }
    }

    pub fn config(&self) -> &OpenAiConfig {
        &self.config
    }

    pub fn is_ready(&self) -> bool {
        self.state.is_ready()
    }

    fn endpoint(&self) -> String {
        format!(
            "{}{}",
            self.config.base_url.trim_end_matches('/'),
            openai::CHAT_COMPLETIONS_ENDPOINT
        )
    }
}

#[async_trait]
impl LlmProvider for OpenAiClient {
    fn provider(&self) -> Provider {
        Provider::OpenAI
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    #[tracing::instrument(
        name = "openai_call",
        skip(self, prompt),
        fields(model = %self.config.model, prompt_len = prompt.len()),
        err
    )]
    async fn call_llm(&self, prompt: &str) -> Result<Solution, LlmError> {
        let (http, api_key) = self.state.ready(Provider::OpenAI)?;

        let request = ChatCompletionRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            reasoning_effort: self.config.reasoning_effort,
        };
        let headers = vec![(
            "Authorization".to_string(),
            format!("Bearer {api_key}"),
        )];

        let raw = http.post_json(&self.endpoint(), &headers, &request).await?;
        let response: ChatCompletionResponse =
            serde_json::from_value(raw.clone()).map_err(|e| LlmError::Parse {
                message: "Failed to parse OpenAI response".to_string(),
                source: Box::new(e),
            })?;

        create_solution(response, raw, &self.config.model)
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reasoning_effort: Option<ReasoningEffort>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    id: Option<String>,
    model: Option<String>,
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: AssistantMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    content: Option<String>,
    refusal: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
    #[serde(default)]
    total_tokens: u32,
}

fn create_solution(
    res: ChatCompletionResponse,
    raw: Value,
    requested_model: &str,
) -> Result<Solution, LlmError> {
    let choice = res
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| LlmError::EmptyResponse("OpenAI returned no choices".to_string()))?;

    if let Some(refusal) = choice.message.refusal {
        return Err(LlmError::Api {
            message: format!("Model refused: {refusal}"),
            status_code: None,
        });
    }

    let text = choice.message.content.ok_or_else(|| {
        LlmError::EmptyResponse(format!(
            "OpenAI message had no content (finish_reason: {})",
            choice.finish_reason.as_deref().unwrap_or("unknown")
        ))
    })?;

    Ok(Solution {
        text,
        metadata: ResponseMetadata {
            provider: Provider::OpenAI,
            model: res.model.unwrap_or_else(|| requested_model.to_string()),
            id: res.id,
            usage: res.usage.map(|u| LanguageModelUsage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            }),
            raw,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(raw: Value) -> Result<Solution, LlmError> {
        let res: ChatCompletionResponse = serde_json::from_value(raw.clone()).unwrap();
        create_solution(res, raw, "gpt-5")
    }

    #[test]
    fn request_carries_reasoning_effort() {
        let request = ChatCompletionRequest {
            model: "gpt-5",
            messages: vec![ChatMessage {
                role: "user",
                content: "solve",
            }],
            reasoning_effort: Some(ReasoningEffort::High),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["reasoning_effort"], "high");
        assert_eq!(value["messages"][0]["role"], "user");

        let request = ChatCompletionRequest {
            reasoning_effort: None,
            ..request
        };
        let value = serde_json::to_value(&request).unwrap();
        assert!(value.get("reasoning_effort").is_none());
    }

    #[test]
    fn content_is_passed_through_untouched() {
        let text = "  ```cpp\nint main() {}\n```\n\n";
        let solution = parse(json!({
            "id": "chatcmpl-1",
            "model": "gpt-5-2025-08-07",
            "choices": [{
                "index": 0,
                "message": { "role": "assistant", "content": text, "refusal": null },
                "finish_reason": "stop"
            }],
            "usage": { "prompt_tokens": 12, "completion_tokens": 34, "total_tokens": 46 }
        }))
        .unwrap();

        assert_eq!(solution.text, text);
        assert_eq!(solution.metadata.model, "gpt-5-2025-08-07");
        assert_eq!(solution.metadata.usage.unwrap().total_tokens, 46);
        assert_eq!(solution.metadata.raw["id"], "chatcmpl-1");
    }

    #[test]
    fn refusal_is_an_api_error() {
        let err = parse(json!({
            "choices": [{
                "message": { "role": "assistant", "content": null, "refusal": "I can't help" },
                "finish_reason": "stop"
            }]
        }))
        .unwrap_err();
        assert!(matches!(err, LlmError::Api { ref message, .. } if message.contains("I can't help")));
    }

    #[test]
    fn null_content_is_empty_response() {
        let err = parse(json!({
            "choices": [{
                "message": { "role": "assistant", "content": null, "refusal": null },
                "finish_reason": "length"
            }]
        }))
        .unwrap_err();
        match err {
            LlmError::EmptyResponse(message) => assert!(message.contains("length")),
            other => panic!("Expected EmptyResponse, got {other:?}"),
        }
    }

    #[test]
    fn partial_usage_does_not_lose_the_answer() {
        let solution = parse(json!({
            "choices": [{
                "message": { "role": "assistant", "content": "```cpp\n```" },
                "finish_reason": "stop"
            }],
            "usage": { "prompt_tokens": 1 }
        }))
        .unwrap();

        assert_eq!(solution.text, "```cpp\n```");
        let usage = solution.metadata.usage.unwrap();
        assert_eq!(usage.prompt_tokens, 1);
        assert_eq!(usage.completion_tokens, 0);
    }

    #[test]
    fn missing_choices_is_empty_response() {
        let err = parse(json!({ "id": "x", "choices": [] })).unwrap_err();
        assert!(matches!(err, LlmError::EmptyResponse(_)));
    }

    #[test]
    fn default_config_matches_openai_defaults() {
        let config = OpenAiConfig::default();
        assert_eq!(config.model, "gpt-5");
        assert_eq!(config.reasoning_effort, Some(ReasoningEffort::High));
        assert_eq!(config.http_config.timeout, None);
        assert!(config.api_key.is_none());
    }
}
