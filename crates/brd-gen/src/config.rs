use std::path::PathBuf;
use std::time::Duration;

use crate::error::AppError;
use crate::model::{OutputFormat, PromptStyle};
use crate::split::HeadingRule;

/// Application configuration, loaded once at startup from environment
/// variables, validated eagerly and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct Config {
    /// Gemini API key. Required; absence is fatal before any network call.
    pub api_key: String,
    /// Generation model identifier, e.g. "gemini-2.5-flash".
    pub model: String,
    /// Directory where rendered artifacts are written.
    pub output_dir: PathBuf,
    /// Output document format.
    pub output_format: OutputFormat,
    /// Prompt style. `Html` is only valid together with the docx format.
    pub prompt_style: PromptStyle,
    /// Heading-recognition rule for plain-text content.
    pub heading_rule: HeadingRule,
    /// Overall deadline for one generation call. `None` disables the outer
    /// deadline (the HTTP client still applies its per-request timeout).
    pub generation_deadline: Option<Duration>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Required:
    /// - `GOOGLE_API_KEY`: Gemini API key
    ///
    /// Optional:
    /// - `BRD_MODEL`: model id (default "gemini-2.5-flash")
    /// - `BRD_OUTPUT_DIR`: artifact directory (default "files")
    /// - `BRD_OUTPUT_FORMAT`: text | docx | pdf (default docx)
    /// - `BRD_PROMPT_STYLE`: plain | html (default html for docx, plain otherwise)
    /// - `BRD_HEADING_RULE`: numbered | colon (default numbered)
    /// - `BRD_GENERATION_DEADLINE_SECS`: overall generation deadline
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_env_with(None, None)
    }

    /// Like [`Config::from_env`], with invocation-time overrides (CLI flags)
    /// taking precedence over the corresponding environment variables.
    pub fn from_env_with(
        format_override: Option<OutputFormat>,
        deadline_override: Option<Duration>,
    ) -> Result<Self, AppError> {
        let api_key = std::env::var("GOOGLE_API_KEY")
            .map_err(|_| AppError::Config("GOOGLE_API_KEY environment variable is required".to_string()))?;
        if api_key.trim().is_empty() {
            return Err(AppError::Config("GOOGLE_API_KEY must not be empty".to_string()));
        }

        let model = std::env::var("BRD_MODEL").unwrap_or_else(|_| "gemini-2.5-flash".to_string());

        let output_dir = std::env::var("BRD_OUTPUT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("files"));

        let output_format = match format_override {
            Some(format) => format,
            None => match std::env::var("BRD_OUTPUT_FORMAT") {
                Ok(raw) => raw.parse::<OutputFormat>().map_err(AppError::Config)?,
                Err(_) => OutputFormat::Docx,
            },
        };

        let prompt_style = match std::env::var("BRD_PROMPT_STYLE") {
            Ok(raw) => Some(raw.parse::<PromptStyle>().map_err(AppError::Config)?),
            Err(_) => None,
        };

        let heading_rule = match std::env::var("BRD_HEADING_RULE") {
            Ok(raw) => raw.parse::<HeadingRule>().map_err(AppError::Config)?,
            Err(_) => HeadingRule::Numbered,
        };

        let generation_deadline = deadline_override.or_else(|| {
            std::env::var("BRD_GENERATION_DEADLINE_SECS")
                .ok()
                .and_then(|s| s.parse::<u64>().ok())
                .map(Duration::from_secs)
        });

        Self::build(
            api_key,
            model,
            output_dir,
            output_format,
            prompt_style,
            heading_rule,
            generation_deadline,
        )
    }

    /// Resolve the prompt style against the output format and validate the
    /// combination. Only the docx renderer understands HTML content.
    pub fn build(
        api_key: String,
        model: String,
        output_dir: PathBuf,
        output_format: OutputFormat,
        prompt_style: Option<PromptStyle>,
        heading_rule: HeadingRule,
        generation_deadline: Option<Duration>,
    ) -> Result<Self, AppError> {
        let prompt_style = match (output_format, prompt_style) {
            (OutputFormat::Docx, None) => PromptStyle::Html,
            (_, None) => PromptStyle::Plain,
            (OutputFormat::Docx, Some(style)) => style,
            (format, Some(PromptStyle::Html)) => {
                return Err(AppError::Config(format!(
                    "prompt style html is only supported with the docx format, not {format}"
                )));
            }
            (_, Some(PromptStyle::Plain)) => PromptStyle::Plain,
        };

        Ok(Self {
            api_key,
            model,
            output_dir,
            output_format,
            prompt_style,
            heading_rule,
            generation_deadline,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(format: OutputFormat, style: Option<PromptStyle>) -> Result<Config, AppError> {
        Config::build(
            "test-key".to_string(),
            "gemini-2.5-flash".to_string(),
            PathBuf::from("files"),
            format,
            style,
            HeadingRule::Numbered,
            None,
        )
    }

    #[test]
    fn docx_defaults_to_html_prompt() {
        let config = build(OutputFormat::Docx, None).unwrap();
        assert_eq!(config.prompt_style, PromptStyle::Html);
    }

    #[test]
    fn pdf_defaults_to_plain_prompt() {
        let config = build(OutputFormat::Pdf, None).unwrap();
        assert_eq!(config.prompt_style, PromptStyle::Plain);
    }

    #[test]
    fn html_prompt_rejected_for_non_docx_formats() {
        assert!(build(OutputFormat::Pdf, Some(PromptStyle::Html)).is_err());
        assert!(build(OutputFormat::Text, Some(PromptStyle::Html)).is_err());
        assert!(build(OutputFormat::Docx, Some(PromptStyle::Html)).is_ok());
    }
}
