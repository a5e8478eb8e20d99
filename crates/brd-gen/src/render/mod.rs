mod docx;
mod pdf;
mod text;

use std::path::Path;
use std::sync::OnceLock;

use chrono::Local;
use regex::Regex;
use tracing::info;

use crate::error::AppError;
use crate::model::{GenerationResult, OutputFormat, PromptStyle, RenderedArtifact};

/// Render the generated content into the configured format and write it under
/// `output_dir` (created if absent). Write failures are fatal for the request
/// and reported, never retried.
pub fn render(
    project_name: &str,
    result: &GenerationResult,
    style: PromptStyle,
    format: OutputFormat,
    output_dir: &Path,
) -> Result<RenderedArtifact, AppError> {
    // rejected results never reach rendering; refuse if one does
    if !result.is_valid {
        return Err(AppError::Render(
            "refusing to render a rejected generation result".to_string(),
        ));
    }

    std::fs::create_dir_all(output_dir).map_err(|e| {
        AppError::Render(format!("failed to create {}: {e}", output_dir.display()))
    })?;

    let path = output_dir.join(output_file_name(project_name, format.extension()));
    match format {
        OutputFormat::Text => text::render(&result.raw, &path)?,
        OutputFormat::Docx => docx::render(result, style, &path)?,
        OutputFormat::Pdf => pdf::render(&result.raw, &path)?,
    }

    info!(path = %path.display(), format = %format, "artifact written");
    Ok(RenderedArtifact {
        file_path: path,
        format,
    })
}

/// `BRD_{sanitized project name}_{timestamp}.{ext}`: stable, collision
/// resistant across concurrent runs, safe as a file name.
fn output_file_name(project_name: &str, extension: &str) -> String {
    let timestamp = Local::now().format("%Y%m%d%H%M%S");
    format!("BRD_{}_{timestamp}.{extension}", sanitize_project_name(project_name))
}

fn sanitize_project_name(name: &str) -> String {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r#"[\\/*?:"<>|]"#).expect("valid regex"));
    let clean = re.replace_all(name.trim(), "_").to_string();
    if clean.is_empty() {
        "Project".to_string()
    } else {
        clean
    }
}
