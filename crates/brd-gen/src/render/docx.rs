use std::fs::File;
use std::path::Path;

use docx_rs::{Docx, Paragraph, Run, Style, StyleType, Table, TableCell, TableRow};

use crate::error::AppError;
use crate::html::{parse_blocks, Block, TableBlock};
use crate::model::{GenerationResult, PromptStyle};
use crate::split;

const TABLE_STYLE_ID: &str = "TableGrid";
const HEADING1_STYLE_ID: &str = "Heading1";
const HEADING2_STYLE_ID: &str = "Heading2";

/// Render generated content as a Word-compatible document.
///
/// HTML content is converted element by element into native document
/// elements; plain text uses the shared numbered-heading rule to decide
/// heading vs body formatting per line.
pub fn render(result: &GenerationResult, style: PromptStyle, path: &Path) -> Result<(), AppError> {
    let docx = match style {
        PromptStyle::Html => from_blocks(&parse_blocks(&result.raw)),
        PromptStyle::Plain => from_plain(&result.raw),
    };

    let file = File::create(path)
        .map_err(|e| AppError::Render(format!("failed to create {}: {e}", path.display())))?;
    docx.build()
        .pack(file)
        .map_err(|e| AppError::Render(format!("failed to write {}: {e}", path.display())))
}

fn base_docx() -> Docx {
    Docx::new()
        .add_style(
            Style::new(HEADING1_STYLE_ID, StyleType::Paragraph)
                .name("Heading 1")
                .size(32)
                .bold(),
        )
        .add_style(
            Style::new(HEADING2_STYLE_ID, StyleType::Paragraph)
                .name("Heading 2")
                .size(26)
                .bold(),
        )
        .add_style(Style::new(TABLE_STYLE_ID, StyleType::Table).name("Table Grid"))
}

fn from_blocks(blocks: &[Block]) -> Docx {
    let mut docx = base_docx();
    for block in blocks {
        match block {
            Block::Heading { level, text } => {
                let style = if *level <= 1 { HEADING1_STYLE_ID } else { HEADING2_STYLE_ID };
                docx = docx.add_paragraph(
                    Paragraph::new()
                        .add_run(Run::new().add_text(text.as_str()))
                        .style(style),
                );
            }
            Block::Paragraph(text) => {
                docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(text.as_str())));
            }
            Block::List { ordered, items } => {
                for (i, item) in items.iter().enumerate() {
                    let marker = if *ordered {
                        format!("{}. ", i + 1)
                    } else {
                        "\u{2022} ".to_string()
                    };
                    docx = docx.add_paragraph(
                        Paragraph::new().add_run(Run::new().add_text(format!("{marker}{item}"))),
                    );
                }
            }
            Block::Table(table) => {
                docx = docx.add_table(build_table(table));
            }
        }
    }
    docx
}

fn build_table(table: &TableBlock) -> Table {
    let rows: Vec<TableRow> = table
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let cells: Vec<TableCell> = row
                .iter()
                .map(|cell| {
                    let mut run = Run::new().add_text(cell.as_str());
                    if i == 0 && table.has_header {
                        run = run.bold();
                    }
                    TableCell::new().add_paragraph(Paragraph::new().add_run(run))
                })
                .collect();
            TableRow::new(cells)
        })
        .collect();
    Table::new(rows).style(TABLE_STYLE_ID)
}

fn from_plain(raw: &str) -> Docx {
    let mut docx = base_docx();
    for line in raw.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let paragraph = match split::numbered_heading(trimmed) {
            Some((1, _)) => Paragraph::new()
                .add_run(Run::new().add_text(trimmed))
                .style(HEADING1_STYLE_ID),
            Some((_, _)) => Paragraph::new()
                .add_run(Run::new().add_text(trimmed))
                .style(HEADING2_STYLE_ID),
            None => Paragraph::new().add_run(Run::new().add_text(trimmed)),
        };
        docx = docx.add_paragraph(paragraph);
    }
    docx
}

#[cfg(test)]
mod tests {
    use docx_rs::DocumentChild;
    use indexmap::IndexMap;

    use super::*;

    fn result_with(raw: &str) -> GenerationResult {
        GenerationResult {
            raw: raw.to_string(),
            sections: IndexMap::new(),
            is_valid: true,
        }
    }

    fn paragraph_style(child: &DocumentChild) -> Option<String> {
        match child {
            DocumentChild::Paragraph(p) => p.property.style.as_ref().map(|s| s.val.clone()),
            _ => None,
        }
    }

    #[test]
    fn html_tables_become_native_tables_one_to_one() {
        let html = "<h1>Risks</h1>\
<table><tr><th>Risk</th></tr><tr><td>Slip</td></tr></table>\
<p>between</p>\
<table><tr><td>Another</td></tr></table>";
        let docx = from_blocks(&parse_blocks(html));

        let tables = docx
            .document
            .children
            .iter()
            .filter(|c| matches!(c, DocumentChild::Table(_)))
            .count();
        assert_eq!(tables, 2);
    }

    #[test]
    fn html_headings_get_heading_styles() {
        let docx = from_blocks(&parse_blocks("<h1>Scope</h1><h2>Detail</h2><p>body</p>"));
        let styles: Vec<Option<String>> = docx.document.children.iter().map(paragraph_style).collect();
        assert_eq!(styles[0].as_deref(), Some(HEADING1_STYLE_ID));
        assert_eq!(styles[1].as_deref(), Some(HEADING2_STYLE_ID));
        assert_eq!(styles[2], None);
    }

    #[test]
    fn plain_text_heading_lines_are_styled() {
        let docx = from_plain("1. Scope\nbody text\n2.1 Detail\n");
        let styles: Vec<Option<String>> = docx.document.children.iter().map(paragraph_style).collect();
        assert_eq!(styles[0].as_deref(), Some(HEADING1_STYLE_ID));
        assert_eq!(styles[1], None);
        assert_eq!(styles[2].as_deref(), Some(HEADING2_STYLE_ID));
    }

    #[test]
    fn writes_a_readable_docx_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.docx");
        let result = result_with("<h1>Scope</h1><p>Everything.</p>");

        render(&result, PromptStyle::Html, &path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        let readback = docx_rs::read_docx(&bytes).unwrap();
        let has_scope = readback.document.children.iter().any(|c| {
            matches!(c, DocumentChild::Paragraph(p) if p.raw_text().contains("Scope"))
        });
        assert!(has_scope);
    }
}
