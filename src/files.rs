//! Reading statements and writing solutions.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::core::{LlmError, ProblemStatement};
use crate::provider::Provider;

/// Read a statement file as UTF-8. Empty or whitespace-only files are rejected.
pub async fn read_statement(path: impl AsRef<Path>) -> Result<ProblemStatement, LlmError> {
    let path = path.as_ref();
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| LlmError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    if text.trim().is_empty() {
        return Err(LlmError::InvalidInput(format!(
            "statement file {} is empty",
            path.display()
        )));
    }

    debug!(path = %path.display(), bytes = text.len(), "Read problem statement");
    Ok(ProblemStatement::new(text))
}

/// Write `text` exactly as given, replacing any existing file.
pub async fn write_solution(path: impl AsRef<Path>, text: &str) -> Result<(), LlmError> {
    let path = path.as_ref();
    tokio::fs::write(path, text.as_bytes())
        .await
        .map_err(|source| LlmError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    debug!(path = %path.display(), bytes = text.len(), "Wrote solution");
    Ok(())
}

/// `<statement stem>_<provider tag>_solution.txt` in the working directory.
pub fn default_output_path(statement: &Path, provider: Provider) -> PathBuf {
    let stem = statement
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "problem".to_string());
    PathBuf::from(format!("{stem}_{}_solution.txt", provider.file_tag()))
}
