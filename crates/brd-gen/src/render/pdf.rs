use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference};

use crate::error::AppError;
use crate::split;

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 15.0;

const TITLE: &str = "Business Requirements Document";
const TITLE_SIZE: f32 = 16.0;
const HEADING_SIZE: f32 = 13.0;
const BODY_SIZE: f32 = 11.0;

const TITLE_LEAD_MM: f32 = 10.0;
const HEADING_LEAD_MM: f32 = 8.0;
const BODY_LEAD_MM: f32 = 6.0;
const BLANK_LEAD_MM: f32 = 3.0;

// Builtin Helvetica has no width metrics available here; wrap on a
// character count derived from the usable width instead.
const HEADING_WRAP_COLS: usize = 75;
const BODY_WRAP_COLS: usize = 95;

/// Render plain generated text as a paginated A4 PDF: centered title block,
/// bold headings per the shared numbered-heading rule, wrapped body
/// paragraphs, automatic page breaks at the bottom margin.
pub fn render(raw: &str, path: &Path) -> Result<(), AppError> {
    let (doc, page, layer) = PdfDocument::new(
        TITLE,
        Mm(PAGE_WIDTH_MM.into()),
        Mm(PAGE_HEIGHT_MM.into()),
        "content",
    );
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| AppError::Render(format!("failed to load builtin font: {e}")))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| AppError::Render(format!("failed to load builtin font: {e}")))?;

    let mut writer = PageWriter {
        doc: &doc,
        layer: doc.get_page(page).get_layer(layer),
        y_mm: PAGE_HEIGHT_MM - MARGIN_MM,
    };

    // title block
    let title_x = centered_x(TITLE, TITLE_SIZE);
    writer.advance(TITLE_LEAD_MM);
    writer.text_at(TITLE, TITLE_SIZE, &bold, title_x);
    writer.advance(HEADING_LEAD_MM);

    for line in raw.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            writer.advance(BLANK_LEAD_MM);
            continue;
        }

        let safe = latin1_lossy(trimmed);
        if split::numbered_heading(&safe).is_some() {
            writer.advance(BLANK_LEAD_MM);
            for chunk in textwrap::wrap(&safe, HEADING_WRAP_COLS) {
                writer.line(&chunk, HEADING_SIZE, &bold, HEADING_LEAD_MM);
            }
        } else {
            for chunk in textwrap::wrap(&safe, BODY_WRAP_COLS) {
                writer.line(&chunk, BODY_SIZE, &regular, BODY_LEAD_MM);
            }
        }
    }

    let file = File::create(path)
        .map_err(|e| AppError::Render(format!("failed to create {}: {e}", path.display())))?;
    doc.save(&mut BufWriter::new(file))
        .map_err(|e| AppError::Render(format!("failed to write {}: {e}", path.display())))
}

struct PageWriter<'a> {
    doc: &'a PdfDocumentReference,
    layer: PdfLayerReference,
    y_mm: f32,
}

impl PageWriter<'_> {
    /// Move the cursor down, breaking to a fresh page when the bottom margin
    /// would be crossed.
    fn advance(&mut self, lead_mm: f32) {
        if self.y_mm - lead_mm < MARGIN_MM {
            let (page, layer) = self.doc.add_page(
                Mm(PAGE_WIDTH_MM.into()),
                Mm(PAGE_HEIGHT_MM.into()),
                "content",
            );
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y_mm = PAGE_HEIGHT_MM - MARGIN_MM;
        } else {
            self.y_mm -= lead_mm;
        }
    }

    fn text_at(&mut self, text: &str, size: f32, font: &IndirectFontRef, x_mm: f32) {
        self.layer
            .use_text(text, size.into(), Mm(x_mm.into()), Mm(self.y_mm.into()), font);
    }

    fn line(&mut self, text: &str, size: f32, font: &IndirectFontRef, lead_mm: f32) {
        self.advance(lead_mm);
        self.text_at(text, size, font, MARGIN_MM);
    }
}

fn centered_x(text: &str, size_pt: f32) -> f32 {
    let width = approx_text_width_mm(text, size_pt);
    ((PAGE_WIDTH_MM - width) / 2.0).max(MARGIN_MM)
}

/// Rough Helvetica width estimate: average glyph is about half the font size.
fn approx_text_width_mm(text: &str, size_pt: f32) -> f32 {
    const PT_TO_MM: f32 = 0.352_778;
    text.chars().count() as f32 * size_pt * 0.5 * PT_TO_MM
}

/// Builtin fonts are WinAnsi encoded; substitute anything outside Latin-1
/// instead of failing the whole render.
fn latin1_lossy(text: &str) -> String {
    text.chars()
        .map(|c| if (c as u32) <= 0xFF { c } else { '?' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_latin1_characters_are_substituted() {
        assert_eq!(latin1_lossy("café"), "café");
        assert_eq!(latin1_lossy("approval \u{2192} done"), "approval ? done");
    }

    #[test]
    fn writes_a_pdf_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.pdf");
        render("1. Scope\nEverything in scope.\n\n2. Risks\nSchedule slip.\n", &path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn long_content_paginates_without_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("long.pdf");
        let mut raw = String::new();
        for i in 1..=40 {
            raw.push_str(&format!("{i}. Section {i}\n"));
            for _ in 0..10 {
                raw.push_str("A body line long enough to exercise wrapping and the page cursor.\n");
            }
            raw.push('\n');
        }
        render(&raw, &path).unwrap();
        assert!(std::fs::read(&path).unwrap().starts_with(b"%PDF"));
    }
}
