use tracing::info;

use crate::core::{LlmError, LlmProvider, ProblemStatement, Solution, SolutionLanguage};

/// Instruction prepended to every statement.
pub fn default_instruction(language: SolutionLanguage) -> String {
    format!(
        "You are a competitive programmer. You will be given a problem statement, \
         please implement solution in {}. The execution time and memory limit are also \
         stated in the statement so be aware of the complexity of the program. Please wrap \
         the code in ```{} and ``` so that it is properly formatted.\n\n",
        language.display_name(),
        language.fence_tag()
    )
}

/// Turns problem statements into solutions through one provider.
///
/// The instruction is fixed once the solver is built.
pub struct Solver {
    instruction: String,
    provider: Box<dyn LlmProvider>,
}

impl Solver {
    pub fn new(provider: impl LlmProvider + 'static) -> Self {
        Self::from_boxed(Box::new(provider))
    }

    pub fn from_boxed(provider: Box<dyn LlmProvider>) -> Self {
        Self {
            instruction: default_instruction(SolutionLanguage::default()),
            provider,
        }
    }

    pub fn with_language(mut self, language: SolutionLanguage) -> Self {
        self.instruction = default_instruction(language);
        self
    }

    pub fn with_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.instruction = instruction.into();
        self
    }

    pub fn instruction(&self) -> &str {
        &self.instruction
    }

    /// Instruction followed by the statement, nothing else.
    pub fn build_prompt(&self, statement: &ProblemStatement) -> String {
        let mut prompt = String::with_capacity(self.instruction.len() + statement.as_str().len());
        prompt.push_str(&self.instruction);
        prompt.push_str(statement.as_str());
        prompt
    }

    /// Ask the provider for a solution. Whatever the provider returns is
    /// handed back as is.
    pub async fn generate_solution(
        &self,
        statement: &ProblemStatement,
    ) -> Result<Solution, LlmError> {
        let prompt = self.build_prompt(statement);
        info!(
            provider = %self.provider.provider(),
            model = self.provider.model(),
            statement_len = statement.as_str().len(),
            "Generating solution"
        );
        self.provider.call_llm(&prompt).await
    }
}
