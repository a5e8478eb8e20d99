use std::path::Path;

use docx_rs::{read_docx, DocumentChild, Paragraph, ParagraphChild, RunChild};
use regex::Regex;
use tracing::info;

use crate::error::AppError;

/// Style id of the paragraphs that count as section headings.
///
/// The canonical policy is level-1 headings only: lower-level headings in a
/// template are sub-structure the model is free to invent on its own.
const HEADING_STYLE_ID: &str = "Heading1";

/// Extract the ordered section headings from a `.docx` template.
///
/// Parenthetical annotations are stripped ("Scope (max 1 page)" -> "Scope")
/// and headings left blank by the stripping are skipped. A missing or
/// unparseable file is fatal for the request: without the template there is
/// no section scaffold to generate against.
pub fn extract_headings(path: &Path) -> Result<Vec<String>, AppError> {
    let bytes = std::fs::read(path)
        .map_err(|e| AppError::Template(format!("failed to read {}: {e}", path.display())))?;
    let headings = extract_headings_from_bytes(&bytes)
        .map_err(|e| AppError::Template(format!("failed to parse {}: {e}", path.display())))?;
    info!(path = %path.display(), count = headings.len(), "template headings extracted");
    Ok(headings)
}

fn extract_headings_from_bytes(bytes: &[u8]) -> Result<Vec<String>, String> {
    let docx = read_docx(bytes).map_err(|e| e.to_string())?;
    let annotation_re = Regex::new(r"\s*\([^)]*\)").expect("valid regex");

    let mut headings = Vec::new();
    for child in docx.document.children.iter() {
        let DocumentChild::Paragraph(para) = child else {
            continue;
        };
        let is_heading = para
            .property
            .style
            .as_ref()
            .map(|s| s.val == HEADING_STYLE_ID)
            .unwrap_or(false);
        if !is_heading {
            continue;
        }

        let text = paragraph_text(para);
        let clean = annotation_re.replace_all(&text, "").trim().to_string();
        if !clean.is_empty() {
            headings.push(clean);
        }
    }
    Ok(headings)
}

fn paragraph_text(para: &Paragraph) -> String {
    para.children
        .iter()
        .filter_map(|pc| {
            if let ParagraphChild::Run(run) = pc {
                Some(
                    run.children
                        .iter()
                        .filter_map(|rc| {
                            if let RunChild::Text(t) = rc {
                                Some(t.text.clone())
                            } else {
                                None
                            }
                        })
                        .collect::<Vec<_>>()
                        .join(""),
                )
            } else {
                None
            }
        })
        .collect::<Vec<_>>()
        .join("")
}
