use crate::model::PromptStyle;

/// Canonical BRD outline, used whenever the caller supplies no template.
pub const CANONICAL_OUTLINE: &[&str] = &[
    "Document Control",
    "Introduction",
    "Functional Requirements",
    "Non-Functional Requirements",
    "Architecture",
    "Interfaces",
    "Data Requirements",
    "Assumptions",
    "Acceptance Criteria",
    "Glossary",
];

/// Assemble the generation instruction for one request.
///
/// `headings` is the template-derived list; when empty, the canonical outline
/// is used instead. The style decides whether the model is asked for numbered
/// plain-text sections or for HTML markup.
pub fn build_prompt(
    style: PromptStyle,
    project_name: &str,
    description: &str,
    headings: &[String],
) -> String {
    let effective = effective_headings(headings);
    match style {
        PromptStyle::Plain => plain_prompt(project_name, description, &effective),
        PromptStyle::Html => html_prompt(project_name, description, &effective),
    }
}

fn effective_headings(headings: &[String]) -> Vec<&str> {
    if headings.is_empty() {
        CANONICAL_OUTLINE.to_vec()
    } else {
        headings.iter().map(String::as_str).collect()
    }
}

fn numbered_list(headings: &[&str]) -> String {
    headings
        .iter()
        .enumerate()
        .map(|(i, h)| format!("{}. {}", i + 1, h))
        .collect::<Vec<_>>()
        .join("\n")
}

fn plain_prompt(project_name: &str, description: &str, headings: &[&str]) -> String {
    format!(
        "You are a professional Business Analyst.\n\n\
Generate a complete Business Requirements Document for the following project:\n\n\
PROJECT NAME: {project_name}\n\
PROJECT DESCRIPTION: {description}\n\n\
Generate a detailed section for each of these headings:\n\
{headings}\n\n\
Rules:\n\
- Keep it professional.\n\
- Keep sections concise but informative.\n\
- Output plain text only, no markdown.\n\
- Start each section with its numbered heading exactly as listed above.",
        headings = numbered_list(headings),
    )
}

fn html_prompt(project_name: &str, description: &str, headings: &[&str]) -> String {
    format!(
        "You are an expert Business Analyst. Generate a professional Business \
Requirements Document for the following project:\n\n\
PROJECT NAME: {project_name}\n\
PROJECT DESCRIPTION: {description}\n\n\
Use exactly these main headings, in this order: {headings}.\n\
Include numbered subheadings, bullet points, and tables where necessary.\n\
Output HTML using <h1>, <h2>, <h3>, <p>, <ul>, <li>, <table>, <tr>, <th>, <td>.\n\
Each main heading must be an <h1> element with the heading text only.\n\
Do not use markdown.\n\
Tables must include header rows.",
        headings = headings.join(", "),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_outline_used_without_template() {
        let prompt = build_prompt(PromptStyle::Plain, "User Project", "a leave tracker", &[]);
        assert!(prompt.contains("1. Document Control"));
        assert!(prompt.contains("10. Glossary"));
    }

    #[test]
    fn template_headings_numbered_in_order() {
        let headings = vec!["Scope".to_string(), "Risks".to_string()];
        let prompt = build_prompt(PromptStyle::Plain, "User Project", "a leave tracker", &headings);
        assert!(prompt.contains("1. Scope\n2. Risks"));
        assert!(!prompt.contains("Document Control"));
    }

    #[test]
    fn html_prompt_lists_allowed_tags_and_headings() {
        let headings = vec!["Scope".to_string(), "Risks".to_string()];
        let prompt = build_prompt(PromptStyle::Html, "User Project", "a leave tracker", &headings);
        assert!(prompt.contains("Scope, Risks"));
        assert!(prompt.contains("<table>"));
        assert!(prompt.contains("Do not use markdown."));
    }

    #[test]
    fn description_is_embedded() {
        let prompt = build_prompt(PromptStyle::Plain, "Tracker", "track employee leave requests", &[]);
        assert!(prompt.contains("PROJECT NAME: Tracker"));
        assert!(prompt.contains("track employee leave requests"));
    }
}
