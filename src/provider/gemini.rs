//! Google Gemini `generateContent` adapter.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{ClientState, Provider, constants::gemini};
use crate::core::{
    HttpClientConfig, LanguageModelUsage, LlmError, LlmProvider, ResponseMetadata, Solution,
};

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    /// Defaults to a 600 second request timeout.
    pub http_config: HttpClientConfig,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: gemini::API_BASE.to_string(),
            model: gemini::DEFAULT_MODEL.to_string(),
            http_config: HttpClientConfig::default()
                .with_timeout(Duration::from_secs(gemini::DEFAULT_TIMEOUT_SECS)),
        }
    }
}

impl GeminiConfig {
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

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.http_config = self.http_config.with_timeout(timeout);
        self
    }

    pub fn with_http_config(mut self, config: HttpClientConfig) -> Self {
        self.http_config = config;
        self
    }
}

pub struct GeminiClient {
    config: GeminiConfig,
    state: ClientState,
}

impl GeminiClient {
    /// Build the client. A missing key leaves it degraded instead of failing.
    pub fn new(config: GeminiConfig) -> Self {
        let state = ClientState::connect(
            Provider::Gemini,
            config.api_key.clone(),
            &config.http_config,
        );
        Self { config, state }
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    pub fn is_ready(&self) -> bool {
        self.state.is_ready()
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }
}

#[async_trait]
impl LlmProvider for GeminiClient {
    fn provider(&self) -> Provider {
        Provider::Gemini
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    #[tracing::instrument(
        name = "gemini_call",
        skip(self, prompt),
        fields(model = %self.config.model, prompt_len = prompt.len()),
        err
    )]
    async fn call_llm(&self, prompt: &str) -> Result<Solution, LlmError> {
        let (http, api_key) = self.state.ready(Provider::Gemini)?;

        let request = GenerateContentRequest {
            contents: vec![Content {
                role: Role::User,
                parts: vec![Part { text: prompt }],
            }],
        };
        let headers = vec![(gemini::API_KEY_HEADER.to_string(), api_key.to_string())];

        let raw = http.post_json(&self.endpoint(), &headers, &request).await?;
        let response: GenerateContentResponse =
            serde_json::from_value(raw.clone()).map_err(|e| LlmError::Parse {
                message: "Failed to parse Gemini response".to_string(),
                source: Box::new(e),
            })?;

        create_solution(response, raw, &self.config.model)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
enum Role {
    User,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: Role,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
    usage_metadata: Option<UsageMetadata>,
    model_version: Option<String>,
    response_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
    /// Set on thinking summaries, which are not part of the answer.
    #[serde(default)]
    thought: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
    #[serde(default)]
    total_token_count: u32,
}

fn create_solution(
    res: GenerateContentResponse,
    raw: Value,
    requested_model: &str,
) -> Result<Solution, LlmError> {
    if let Some(reason) = res.prompt_feedback.and_then(|f| f.block_reason) {
        return Err(LlmError::Api {
            message: format!("Prompt blocked by Gemini: {reason}"),
            status_code: None,
        });
    }

    let candidate = res
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| LlmError::EmptyResponse("Gemini returned no candidates".to_string()))?;

    let text: String = candidate
        .content
        .map(|c| c.parts)
        .unwrap_or_default()
        .into_iter()
        .filter(|p| !p.thought)
        .filter_map(|p| p.text)
        .collect();

    if text.is_empty() {
        return Err(LlmError::EmptyResponse(format!(
            "Gemini candidate had no text (finish_reason: {})",
            candidate.finish_reason.as_deref().unwrap_or("unknown")
        )));
    }

    Ok(Solution {
        text,
        metadata: ResponseMetadata {
            provider: Provider::Gemini,
            model: res
                .model_version
                .unwrap_or_else(|| requested_model.to_string()),
            id: res.response_id,
            usage: res.usage_metadata.map(|u| LanguageModelUsage {
                prompt_tokens: u.prompt_token_count,
                completion_tokens: u.candidates_token_count,
                total_tokens: u.total_token_count,
            }),
            raw,
        },
    })
}
