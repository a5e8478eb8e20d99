use tracing::{info, warn};

use crate::config::Config;
use crate::error::AppError;
use crate::generator::ContentGenerator;
use crate::html;
use crate::model::{GenerationRequest, GenerationResult, PipelineOutcome, PromptStyle};
use crate::{render, split, template, validate};

/// Run one BRD generation request end to end.
///
/// The pipeline is a plain ordered sequence with a single boolean branch
/// after validation: validate -> extract headings -> generate -> split ->
/// render. Invalid input terminates in `Rejected` before the template is
/// touched or the generation service is invoked.
pub async fn run(
    config: &Config,
    generator: &dyn ContentGenerator,
    request: &GenerationRequest,
) -> Result<PipelineOutcome, AppError> {
    info!(project = %request.project_name, "brd request received");

    if !validate::is_valid_description(&request.user_input) {
        warn!("project description rejected");
        return Ok(PipelineOutcome::Rejected {
            reason: validate::rejection_reason(),
        });
    }

    let headings = match &request.template_path {
        Some(path) => template::extract_headings(path)?,
        None => Vec::new(),
    };

    let raw = generate_with_deadline(config, generator, request, &headings).await?;

    let sections = match config.prompt_style {
        PromptStyle::Plain => split::split_plain(&raw, config.heading_rule),
        PromptStyle::Html => split::split_blocks(&html::parse_blocks(&raw)),
    };

    let result = GenerationResult {
        raw,
        sections,
        is_valid: true,
    };
    info!(
        sections = result.sections.len(),
        "generated content split into sections"
    );

    // rendering is CPU and filesystem bound; keep the caller's event loop free
    let project_name = request.project_name.clone();
    let style = config.prompt_style;
    let format = config.output_format;
    let output_dir = config.output_dir.clone();
    let artifact = tokio::task::spawn_blocking(move || {
        render::render(&project_name, &result, style, format, &output_dir)
    })
    .await
    .map_err(|e| AppError::Render(format!("render task failed: {e}")))??;

    Ok(PipelineOutcome::Artifact(artifact))
}

async fn generate_with_deadline(
    config: &Config,
    generator: &dyn ContentGenerator,
    request: &GenerationRequest,
    headings: &[String],
) -> Result<String, AppError> {
    match config.generation_deadline {
        Some(deadline) => tokio::time::timeout(deadline, generator.generate(request, headings))
            .await
            .map_err(|_| AppError::GenerationTimeout(deadline))?,
        None => generator.generate(request, headings).await,
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::time::Duration;

    use async_trait::async_trait;
    use docx_rs::{Docx, Paragraph, Run};

    use super::*;
    use crate::model::{OutputFormat, RenderedArtifact};
    use crate::split::HeadingRule;

    /// Returns a fixed body regardless of input.
    struct FixedGenerator(String);

    #[async_trait]
    impl ContentGenerator for FixedGenerator {
        async fn generate(
            &self,
            _request: &GenerationRequest,
            _headings: &[String],
        ) -> Result<String, AppError> {
            Ok(self.0.clone())
        }
    }

    /// Panics when invoked: proves a path never reached generation.
    struct UnreachableGenerator;

    #[async_trait]
    impl ContentGenerator for UnreachableGenerator {
        async fn generate(
            &self,
            _request: &GenerationRequest,
            _headings: &[String],
        ) -> Result<String, AppError> {
            panic!("generator must not be invoked");
        }
    }

    /// Emits one numbered section per supplied heading, like a well-behaved model.
    struct EchoGenerator;

    #[async_trait]
    impl ContentGenerator for EchoGenerator {
        async fn generate(
            &self,
            _request: &GenerationRequest,
            headings: &[String],
        ) -> Result<String, AppError> {
            let mut out = String::new();
            for (i, h) in headings.iter().enumerate() {
                out.push_str(&format!("{}. {}\nContent for {}.\n\n", i + 1, h, h));
            }
            Ok(out)
        }
    }

    struct SlowGenerator;

    #[async_trait]
    impl ContentGenerator for SlowGenerator {
        async fn generate(
            &self,
            _request: &GenerationRequest,
            _headings: &[String],
        ) -> Result<String, AppError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok("1. Scope\nlate\n".to_string())
        }
    }

    fn config_in(
        dir: &tempfile::TempDir,
        format: OutputFormat,
        deadline: Option<Duration>,
    ) -> Config {
        Config::build(
            "test-key".to_string(),
            "gemini-2.5-flash".to_string(),
            dir.path().to_path_buf(),
            format,
            None,
            HeadingRule::Numbered,
            deadline,
        )
        .unwrap()
    }

    fn request(input: &str, template: Option<PathBuf>) -> GenerationRequest {
        GenerationRequest {
            project_name: "Leave Tracker".to_string(),
            user_input: input.to_string(),
            template_path: template,
        }
    }

    fn artifact(outcome: PipelineOutcome) -> RenderedArtifact {
        match outcome {
            PipelineOutcome::Artifact(a) => a,
            PipelineOutcome::Rejected { reason } => panic!("unexpected rejection: {reason}"),
        }
    }

    #[tokio::test]
    async fn short_input_rejects_without_invoking_generation() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir, OutputFormat::Text, None);

        let outcome = run(&config, &UnreachableGenerator, &request("too short", None))
            .await
            .unwrap();

        assert!(matches!(outcome, PipelineOutcome::Rejected { .. }));
        // no artifact either
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn empty_input_rejects_without_invoking_generation() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir, OutputFormat::Text, None);

        let outcome = run(&config, &UnreachableGenerator, &request("", None))
            .await
            .unwrap();

        assert!(matches!(outcome, PipelineOutcome::Rejected { .. }));
    }

    #[tokio::test]
    async fn valid_input_produces_an_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir, OutputFormat::Text, None);
        let generator = FixedGenerator("1. Scope\nEverything.\n\n2. Risks\nNone.\n".to_string());

        let outcome = run(
            &config,
            &generator,
            &request(
                "Build an internal leave-request tracker for 50 employees with manager approval workflow",
                None,
            ),
        )
        .await
        .unwrap();

        let artifact = artifact(outcome);
        assert_eq!(artifact.format, OutputFormat::Text);
        assert!(artifact.file_path.exists());
        let content = std::fs::read_to_string(&artifact.file_path).unwrap();
        assert!(content.starts_with("1. Scope"));
    }

    #[tokio::test]
    async fn template_headings_round_trip_into_section_keys() {
        let dir = tempfile::tempdir().unwrap();
        let template_path = dir.path().join("template.docx");
        let docx = Docx::new()
            .add_paragraph(
                Paragraph::new()
                    .add_run(Run::new().add_text("Scope"))
                    .style("Heading1"),
            )
            .add_paragraph(
                Paragraph::new()
                    .add_run(Run::new().add_text("Risks"))
                    .style("Heading1"),
            );
        let file = std::fs::File::create(&template_path).unwrap();
        docx.build().pack(file).unwrap();

        let headings = template::extract_headings(&template_path).unwrap();
        assert_eq!(headings, vec!["Scope", "Risks"]);

        let raw = EchoGenerator
            .generate(&request("valid words one two three", None), &headings)
            .await
            .unwrap();
        let sections = split::split_plain(&raw, HeadingRule::Numbered);
        let keys: Vec<&str> = sections.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["Scope", "Risks"]);
    }

    #[tokio::test]
    async fn missing_template_is_fatal_for_the_request() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir, OutputFormat::Text, None);

        let err = run(
            &config,
            &UnreachableGenerator,
            &request(
                "a perfectly valid project description here",
                Some(PathBuf::from("/nonexistent/template.docx")),
            ),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::Template(_)));
    }

    #[tokio::test]
    async fn deadline_expiry_is_a_timeout_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir, OutputFormat::Text, Some(Duration::from_millis(20)));

        let err = run(
            &config,
            &SlowGenerator,
            &request("a perfectly valid project description here", None),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::GenerationTimeout(_)));
    }
}
