use std::time::Duration;

use brd_common::gemini::GeminiClientError;

/// Application error taxonomy.
///
/// Input validation is deliberately not represented here: a too-short
/// description routes the pipeline to its rejected terminal outcome and is
/// recovered locally, so it is an outcome, not an error.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(String),

    #[error("template error: {0}")]
    Template(String),

    #[error("generation failed: {0}")]
    Generation(#[from] GeminiClientError),

    #[error("model returned empty output")]
    EmptyGeneration,

    #[error("generation timed out after {0:?}")]
    GenerationTimeout(Duration),

    #[error("render error: {0}")]
    Render(String),
}

impl AppError {
    /// Human-readable failure reason for the calling front end.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Config(msg) => format!("configuration problem: {msg}"),
            AppError::Template(msg) => format!("could not read the template: {msg}"),
            AppError::Generation(_) | AppError::EmptyGeneration => {
                "could not generate the document".to_string()
            }
            AppError::GenerationTimeout(d) => {
                format!("document generation timed out after {}s", d.as_secs())
            }
            AppError::Render(msg) => format!("could not write the document: {msg}"),
        }
    }
}
