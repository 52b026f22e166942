//! # cpsolve
//!
//! Hand a competitive-programming statement to a hosted model and get the
//! solution text back, untouched.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cpsolve::{ApiKey, GeminiClient, GeminiConfig, Provider, ProblemStatement, Solver};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = GeminiConfig::default().with_api_key(ApiKey::Default.resolve(Provider::Gemini));
//!     let solver = Solver::new(GeminiClient::new(config));
//!
//!     let statement = ProblemStatement::from("Print the sum of two integers.");
//!     let solution = solver.generate_solution(&statement).await?;
//!     println!("{}", solution.text);
//!     Ok(())
//! }
//! ```
//!
//! Every failure comes back as an [`LlmError`]. Adapters built without an
//! API key still construct, but refuse each call without sending anything.

pub mod config;
pub mod core;
pub mod files;
pub mod provider;
pub mod solver;

pub use crate::config::ApiKey;
pub use crate::core::{
    HttpClientConfig, LanguageModelUsage, LlmError, LlmProvider, ProblemStatement,
    ReasoningEffort, ResponseMetadata, Solution, SolutionLanguage,
};
pub use crate::provider::{GeminiClient, GeminiConfig, OpenAiClient, OpenAiConfig, Provider};
pub use crate::solver::{Solver, default_instruction};
