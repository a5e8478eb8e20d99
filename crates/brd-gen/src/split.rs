use std::str::FromStr;
use std::sync::OnceLock;

use indexmap::IndexMap;
use regex::Regex;

use crate::html::Block;

/// Synthetic key for text appearing before the first recognized heading.
/// Accumulating it keeps the splitter lossless instead of silently dropping
/// whatever the model emitted ahead of its first section.
pub const PREAMBLE_KEY: &str = "Preamble";

/// Heading-recognition rule for plain-text content. One rule is configured
/// per run; the numbered rule matches what the plain prompt asks the model
/// to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadingRule {
    /// "1. Title" opens a section; "1.1 Title" is sub-structure, kept as body.
    Numbered,
    /// A short line ending in ':' opens a section.
    Colon,
}

impl FromStr for HeadingRule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "numbered" => Ok(HeadingRule::Numbered),
            "colon" => Ok(HeadingRule::Colon),
            other => Err(format!("unknown heading rule: {other} (expected numbered or colon)")),
        }
    }
}

const MAX_COLON_HEADING_LEN: usize = 60;

fn numbered_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d+(?:\.\d+)*)[.)]?\s+(\S.*)$").expect("valid regex"))
}

/// Match a numeric-prefixed heading line, returning its depth ("2.1" has
/// depth 2) and its label with the prefix and any trailing colon stripped.
pub fn numbered_heading(line: &str) -> Option<(usize, &str)> {
    let caps = numbered_re().captures(line.trim())?;
    let depth = caps.get(1).map(|m| m.as_str().split('.').count())?;
    let label = caps.get(2)?.as_str().trim_end_matches(':').trim_end();
    if label.is_empty() {
        return None;
    }
    Some((depth, label))
}

fn colon_heading(line: &str) -> Option<&str> {
    let trimmed = line.trim();
    if trimmed.len() > MAX_COLON_HEADING_LEN || !trimmed.ends_with(':') {
        return None;
    }
    let label = trimmed.trim_end_matches(':').trim_end();
    // "12:30" or "http://..." style lines are not headings
    if label.is_empty() || label.contains(':') {
        return None;
    }
    Some(label)
}

/// Split plain generated text into an ordered heading -> body map.
///
/// Only top-level headings open sections; non-empty body lines append to the
/// open section with line breaks preserved. Text ahead of the first heading
/// lands under [`PREAMBLE_KEY`]. When no heading is recognized at all the map
/// is empty and the raw text remains the renderable source of truth.
pub fn split_plain(raw: &str, rule: HeadingRule) -> IndexMap<String, String> {
    let mut sections: IndexMap<String, String> = IndexMap::new();
    let mut preamble = String::new();
    let mut current: Option<String> = None;

    for line in raw.lines() {
        let heading = match rule {
            HeadingRule::Numbered => {
                numbered_heading(line).and_then(|(depth, label)| (depth == 1).then_some(label))
            }
            HeadingRule::Colon => colon_heading(line),
        };

        if let Some(label) = heading {
            if sections.is_empty() && !preamble.trim().is_empty() {
                sections.insert(PREAMBLE_KEY.to_string(), std::mem::take(&mut preamble));
            }
            sections.entry(label.to_string()).or_default();
            current = Some(label.to_string());
            continue;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        match &current {
            Some(key) => {
                let body = sections.entry(key.clone()).or_default();
                body.push_str(trimmed);
                body.push('\n');
            }
            None => {
                preamble.push_str(trimmed);
                preamble.push('\n');
            }
        }
    }

    trim_bodies(sections)
}

/// Section map for HTML content: `<h1>` blocks open sections, everything
/// else renders into the open section's body.
pub fn split_blocks(blocks: &[Block]) -> IndexMap<String, String> {
    let mut sections: IndexMap<String, String> = IndexMap::new();
    let mut preamble = String::new();
    let mut current: Option<String> = None;

    for block in blocks {
        if let Block::Heading { level: 1, text } = block {
            if sections.is_empty() && !preamble.trim().is_empty() {
                sections.insert(PREAMBLE_KEY.to_string(), std::mem::take(&mut preamble));
            }
            sections.entry(text.clone()).or_default();
            current = Some(text.clone());
            continue;
        }

        let body_text = block_text(block);
        if body_text.is_empty() {
            continue;
        }
        match &current {
            Some(key) => {
                let body = sections.entry(key.clone()).or_default();
                body.push_str(&body_text);
                body.push('\n');
            }
            None => {
                preamble.push_str(&body_text);
                preamble.push('\n');
            }
        }
    }

    trim_bodies(sections)
}

fn block_text(block: &Block) -> String {
    match block {
        Block::Heading { text, .. } => text.clone(),
        Block::Paragraph(text) => text.clone(),
        Block::List { items, .. } => items
            .iter()
            .map(|i| format!("- {i}"))
            .collect::<Vec<_>>()
            .join("\n"),
        Block::Table(table) => table
            .rows
            .iter()
            .map(|row| row.join(" | "))
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

fn trim_bodies(sections: IndexMap<String, String>) -> IndexMap<String, String> {
    sections
        .into_iter()
        .map(|(k, v)| (k, v.trim_end().to_string()))
        .collect()
}
