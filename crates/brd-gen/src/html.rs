use scraper::{ElementRef, Html, Selector};

/// Structural blocks extracted from model-produced HTML.
///
/// This is the bridge between the generated markup and the docx renderer:
/// format-agnostic, flat, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading { level: u8, text: String },
    Paragraph(String),
    List { ordered: bool, items: Vec<String> },
    Table(TableBlock),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableBlock {
    /// Row-major cell text, header row first when present.
    pub rows: Vec<Vec<String>>,
    /// Whether the first row came from `<th>` cells.
    pub has_header: bool,
}

/// Parse generated HTML into ordered blocks.
///
/// Models occasionally wrap their markup in a fenced code block; the fence is
/// stripped before parsing. Unknown elements are descended into so content
/// nested in `<div>`/`<section>`/`<body>` wrappers is not lost.
pub fn parse_blocks(html: &str) -> Vec<Block> {
    let cleaned = strip_code_fence(html);
    let fragment = Html::parse_fragment(cleaned);
    let mut blocks = Vec::new();
    collect_blocks(fragment.root_element(), &mut blocks);
    blocks
}

fn strip_code_fence(html: &str) -> &str {
    let trimmed = html.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // drop the info string ("html") up to the first newline
    let rest = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => rest,
    };
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

fn collect_blocks(element: ElementRef<'_>, blocks: &mut Vec<Block>) {
    for child in element.children() {
        let Some(el) = ElementRef::wrap(child) else {
            continue;
        };
        match el.value().name() {
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                let level = el.value().name().as_bytes()[1] - b'0';
                let text = element_text(el);
                if !text.is_empty() {
                    blocks.push(Block::Heading { level, text });
                }
            }
            "p" => {
                let text = element_text(el);
                if !text.is_empty() {
                    blocks.push(Block::Paragraph(text));
                }
            }
            "ul" | "ol" => {
                let ordered = el.value().name() == "ol";
                let items = list_items(el);
                if !items.is_empty() {
                    blocks.push(Block::List { ordered, items });
                }
            }
            "table" => {
                if let Some(table) = parse_table(el) {
                    blocks.push(Block::Table(table));
                }
            }
            // wrapper elements: keep walking
            _ => collect_blocks(el, blocks),
        }
    }
}

fn element_text(el: ElementRef<'_>) -> String {
    let text: String = el.text().collect::<Vec<_>>().join("");
    normalize_whitespace(&text)
}

fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn list_items(el: ElementRef<'_>) -> Vec<String> {
    let li = Selector::parse("li").expect("valid selector");
    el.select(&li)
        .map(element_text)
        .filter(|t| !t.is_empty())
        .collect()
}

fn parse_table(el: ElementRef<'_>) -> Option<TableBlock> {
    let tr = Selector::parse("tr").expect("valid selector");
    let cell = Selector::parse("th, td").expect("valid selector");
    let th = Selector::parse("th").expect("valid selector");

    let mut rows = Vec::new();
    let mut has_header = false;
    for (i, row) in el.select(&tr).enumerate() {
        let cells: Vec<String> = row.select(&cell).map(element_text).collect();
        if cells.is_empty() {
            continue;
        }
        if i == 0 && row.select(&th).next().is_some() {
            has_header = true;
        }
        rows.push(cells);
    }
    if rows.is_empty() {
        return None;
    }
    Some(TableBlock { rows, has_header })
}
