use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use dotenv::dotenv;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use cpsolve::{
    ApiKey, GeminiClient, GeminiConfig, LlmError, LlmProvider, OpenAiClient, OpenAiConfig,
    Provider, ReasoningEffort, SolutionLanguage, Solver, files,
};

/// Send a problem statement to an LLM and save the solution it writes.
#[derive(Debug, Parser)]
#[command(name = "cpsolve", version)]
struct Cli {
    /// Provider to ask (openai or gemini)
    #[arg(short, long)]
    provider: Provider,

    /// File holding the problem statement
    #[arg(short, long)]
    statement: PathBuf,

    /// Where to write the solution [default: <stem>_<gpt|gemini>_solution.txt]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Model id, overriding the provider default
    #[arg(short, long)]
    model: Option<String>,

    /// Language the solution should be written in
    #[arg(short, long, default_value_t = SolutionLanguage::Cpp)]
    language: SolutionLanguage,

    /// Request timeout in seconds (Gemini defaults to 600, OpenAI to none)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    timeout: Option<u64>,

    /// Reasoning effort for OpenAI reasoning models
    #[arg(long, default_value_t = ReasoningEffort::High)]
    reasoning_effort: ReasoningEffort,

    /// Override the provider API base URL
    #[arg(long)]
    base_url: Option<String>,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn build_provider(&self, api_key: Option<String>) -> Box<dyn LlmProvider> {
        let timeout = self.timeout.map(Duration::from_secs);

        match self.provider {
            Provider::OpenAI => {
                let mut config = OpenAiConfig::default()
                    .with_api_key(api_key)
                    .with_reasoning_effort(Some(self.reasoning_effort));
                if let Some(model) = &self.model {
                    config = config.with_model(model.clone());
                }
                if let Some(base_url) = &self.base_url {
                    config = config.with_base_url(base_url.clone());
                }
                if let Some(timeout) = timeout {
                    config = config.with_timeout(timeout);
                }
                Box::new(OpenAiClient::new(config))
            }
            Provider::Gemini => {
                let mut config = GeminiConfig::default().with_api_key(api_key);
                if let Some(model) = &self.model {
                    config = config.with_model(model.clone());
                }
                if let Some(base_url) = &self.base_url {
                    config = config.with_base_url(base_url.clone());
                }
                if let Some(timeout) = timeout {
                    config = config.with_timeout(timeout);
                }
                Box::new(GeminiClient::new(config))
            }
        }
    }

    fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| files::default_output_path(&self.statement, self.provider))
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// 1 for local input/output failures, 2 for anything the provider call raised.
fn exit_status(error: &LlmError) -> u8 {
    if error.is_local() { 1 } else { 2 }
}

async fn run(cli: &Cli, api_key: Option<String>) -> Result<(), LlmError> {
    let statement = files::read_statement(&cli.statement).await?;
    let solver = Solver::from_boxed(cli.build_provider(api_key)).with_language(cli.language);

    let solution = solver.generate_solution(&statement).await?;

    let output = cli.output_path();
    files::write_solution(&output, &solution.text).await?;
    info!(path = %output.display(), "Solution saved");

    match serde_json::to_string_pretty(&solution.metadata) {
        Ok(metadata) => println!("{metadata}"),
        Err(e) => warn!(error = %e, "Could not render response metadata"),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let api_key = ApiKey::Default.resolve(cli.provider);
    match run(&cli, api_key).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Failed to generate a valid solution");
            ExitCode::from(exit_status(&e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path},
    };

    fn cli_for(statement: &Path, output: &Path, base_url: &str) -> Cli {
        Cli::try_parse_from([
            "cpsolve",
            "-p",
            "openai",
            "-s",
            statement.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
            "--base-url",
            base_url,
        ])
        .unwrap()
    }

    #[test]
    fn parses_minimal_arguments() {
        let cli = Cli::try_parse_from([
            "cpsolve",
            "--provider",
            "gemini",
            "--statement",
            "Permutation/statement.txt",
        ])
        .unwrap();

        assert_eq!(cli.provider, Provider::Gemini);
        assert_eq!(cli.language, SolutionLanguage::Cpp);
        assert_eq!(cli.reasoning_effort, ReasoningEffort::High);
        assert_eq!(
            cli.output_path(),
            PathBuf::from("statement_gemini_solution.txt")
        );
    }

    #[test]
    fn explicit_output_and_language_win() {
        let cli = Cli::try_parse_from([
            "cpsolve",
            "-p",
            "openai",
            "-s",
            "a.txt",
            "-o",
            "answer.md",
            "-l",
            "rust",
            "--timeout",
            "30",
        ])
        .unwrap();

        assert_eq!(cli.output_path(), PathBuf::from("answer.md"));
        assert_eq!(cli.language, SolutionLanguage::Rust);
        assert_eq!(cli.timeout, Some(30));
    }

    #[test]
    fn rejects_unknown_provider() {
        let result = Cli::try_parse_from(["cpsolve", "-p", "claude", "-s", "a.txt"]);
        assert!(result.is_err());
    }

    #[test]
    fn rejects_zero_timeout() {
        let result =
            Cli::try_parse_from(["cpsolve", "-p", "gemini", "-s", "a.txt", "--timeout", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn local_failures_exit_with_one_and_provider_failures_with_two() {
        let io = LlmError::Io {
            path: PathBuf::from("statement.txt"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert_eq!(exit_status(&io), 1);
        assert_eq!(exit_status(&LlmError::InvalidInput("empty".to_string())), 1);

        let missing_key = LlmError::CredentialMissing {
            provider: Provider::OpenAI,
            env_var: "OPENAI_API_KEY",
        };
        assert_eq!(exit_status(&missing_key), 2);
    }

    #[tokio::test]
    async fn server_error_leaves_no_output_file() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let statement = dir.path().join("statement.txt");
        std::fs::write(&statement, "Statement: return 1").unwrap();
        let output = dir.path().join("solution.txt");
        let cli = cli_for(&statement, &output, &format!("{}/v1", server.uri()));

        let err = run(&cli, Some("sk-test".to_string())).await.unwrap_err();
        assert_eq!(err.status_code(), Some(500));
        assert_eq!(exit_status(&err), 2);
        assert!(!output.exists());
    }

    #[tokio::test]
    async fn missing_key_leaves_no_output_file() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let statement = dir.path().join("statement.txt");
        std::fs::write(&statement, "Statement: return 1").unwrap();
        let output = dir.path().join("solution.txt");
        let cli = cli_for(&statement, &output, &format!("{}/v1", server.uri()));

        let err = run(&cli, None).await.unwrap_err();
        assert!(matches!(err, LlmError::CredentialMissing { .. }));
        assert!(!output.exists());
    }
}
