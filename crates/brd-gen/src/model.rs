use std::path::PathBuf;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::Serialize;

/// One BRD generation request. Immutable once constructed; fully consumed
/// within a single pipeline run.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub project_name: String,
    pub user_input: String,
    pub template_path: Option<PathBuf>,
}

/// Output document format, selected at invocation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Text,
    Docx,
    Pdf,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Text => "txt",
            OutputFormat::Docx => "docx",
            OutputFormat::Pdf => "pdf",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "docx" | "word" => Ok(OutputFormat::Docx),
            "pdf" => Ok(OutputFormat::Pdf),
            other => Err(format!("unknown output format: {other} (expected text, docx or pdf)")),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            OutputFormat::Text => "text",
            OutputFormat::Docx => "docx",
            OutputFormat::Pdf => "pdf",
        })
    }
}

/// Whether the model is asked for numbered plain-text sections or for HTML
/// markup. A configuration choice, never a runtime branch: HTML is only
/// meaningful for the docx renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptStyle {
    Plain,
    Html,
}

impl FromStr for PromptStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "plain" | "text" => Ok(PromptStyle::Plain),
            "html" => Ok(PromptStyle::Html),
            other => Err(format!("unknown prompt style: {other} (expected plain or html)")),
        }
    }
}

/// Generated content plus its section breakdown.
///
/// Section keys are heading labels in order of first appearance in `raw`.
/// `is_valid == false` implies `sections` is empty and no artifact follows.
#[derive(Debug, Clone)]
pub struct GenerationResult {
    pub raw: String,
    pub sections: IndexMap<String, String>,
    pub is_valid: bool,
}

/// The final rendered file handed back to the caller.
#[derive(Debug, Clone, Serialize)]
pub struct RenderedArtifact {
    pub file_path: PathBuf,
    pub format: OutputFormat,
}

/// Terminal state of a pipeline run: exactly one of an artifact or a
/// human-readable rejection reason.
#[derive(Debug, Clone)]
pub enum PipelineOutcome {
    Artifact(RenderedArtifact),
    Rejected { reason: String },
}
