/// Minimum whitespace-separated tokens for a usable project description.
pub const MIN_DESCRIPTION_WORDS: usize = 5;

/// Gate for the free-text project description: non-empty after trimming and
/// at least [`MIN_DESCRIPTION_WORDS`] tokens. Invalid input routes the
/// pipeline straight to its rejected terminal without invoking generation.
pub fn is_valid_description(input: &str) -> bool {
    let trimmed = input.trim();
    !trimmed.is_empty() && trimmed.split_whitespace().count() >= MIN_DESCRIPTION_WORDS
}

pub fn rejection_reason() -> String {
    format!(
        "please provide a project description of at least {MIN_DESCRIPTION_WORDS} words"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_whitespace_rejected() {
        assert!(!is_valid_description(""));
        assert!(!is_valid_description("   \n\t  "));
    }

    #[test]
    fn boundary_word_count() {
        assert!(!is_valid_description("internal leave request tracker"));
        assert!(is_valid_description("internal leave request tracker app"));
    }

    #[test]
    fn long_description_accepted() {
        assert!(is_valid_description(
            "Build an internal leave-request tracker for 50 employees with manager approval workflow"
        ));
    }
}
