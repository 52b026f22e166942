use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::error::LlmError;
use crate::provider::Provider;

/// Full text of a competitive-programming problem. Never parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProblemStatement(String);

impl ProblemStatement {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for ProblemStatement {
    fn from(text: String) -> Self {
        Self(text)
    }
}

impl From<&str> for ProblemStatement {
    fn from(text: &str) -> Self {
        Self(text.to_string())
    }
}

impl AsRef<str> for ProblemStatement {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Text returned by the model together with diagnostic metadata.
///
/// `text` is kept exactly as the provider sent it. It usually holds a fenced
/// code block but nothing here checks that.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    pub text: String,
    pub metadata: ResponseMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseMetadata {
    pub provider: Provider,
    pub model: String,
    pub id: Option<String>,
    pub usage: Option<LanguageModelUsage>,
    /// Provider response body as received.
    pub raw: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LanguageModelUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Language the model is asked to write the solution in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SolutionLanguage {
    #[default]
    Cpp,
    C,
    Rust,
}

impl SolutionLanguage {
    /// Name used in the instruction text.
    pub fn display_name(&self) -> &'static str {
        match self {
            SolutionLanguage::Cpp => "C++",
            SolutionLanguage::C => "C",
            SolutionLanguage::Rust => "Rust",
        }
    }

    /// Info string for the fenced code block.
    pub fn fence_tag(&self) -> &'static str {
        match self {
            SolutionLanguage::Cpp => "cpp",
            SolutionLanguage::C => "c",
            SolutionLanguage::Rust => "rust",
        }
    }
}

impl fmt::Display for SolutionLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.fence_tag())
    }
}

impl FromStr for SolutionLanguage {
    type Err = LlmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cpp" | "c++" | "cxx" => Ok(SolutionLanguage::Cpp),
            "c" => Ok(SolutionLanguage::C),
            "rust" | "rs" => Ok(SolutionLanguage::Rust),
            other => Err(LlmError::InvalidInput(format!(
                "unsupported solution language '{other}' (expected cpp, c or rust)"
            ))),
        }
    }
}

/// Reasoning budget requested from OpenAI reasoning models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReasoningEffort {
    Minimal,
    Low,
    Medium,
    #[default]
    High,
}

impl fmt::Display for ReasoningEffort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ReasoningEffort::Minimal => "minimal",
            ReasoningEffort::Low => "low",
            ReasoningEffort::Medium => "medium",
            ReasoningEffort::High => "high",
        };
        f.write_str(s)
    }
}

impl FromStr for ReasoningEffort {
    type Err = LlmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "minimal" => Ok(ReasoningEffort::Minimal),
            "low" => Ok(ReasoningEffort::Low),
            "medium" => Ok(ReasoningEffort::Medium),
            "high" => Ok(ReasoningEffort::High),
            other => Err(LlmError::InvalidInput(format!(
                "unknown reasoning effort '{other}'"
            ))),
        }
    }
}
